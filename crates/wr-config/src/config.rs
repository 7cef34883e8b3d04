use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::config_merge::merge_toml_values;
use crate::memory::{ContextConfig, MemoryConfig};
use crate::paths;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub memory: MemoryConfig,
    pub context: ContextConfig,
}

impl ProjectConfig {
    /// Load config with fallback chain:
    ///
    /// 1. If both `.war-room/config.toml` (project) and `~/.config/war-room/config.toml` (user)
    ///    exist, deep-merge them with project settings overriding user settings.
    /// 2. If only one exists, use it directly.
    /// 3. If neither exists, use defaults.
    ///
    /// The memory log path is anchored at `project_root` when relative.
    pub fn load(project_root: &Path) -> Result<Self> {
        let project_path = paths::project_config_path(project_root);
        let user_path = paths::user_config_path();
        let mut config = Self::load_with_paths(user_path.as_deref(), &project_path)?;
        config.memory = config.memory.resolve_against(project_root);
        Ok(config)
    }

    /// Load config from explicit paths. Testable without global filesystem state.
    pub fn load_with_paths(user_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let user_path = user_path.filter(|p| p.exists());
        let project_exists = project_path.exists();

        match (user_path, project_exists) {
            (None, false) => {
                debug!("no war-room config found, using defaults");
                Ok(Self::default())
            }
            (Some(user), false) => Self::load_from_path(user),
            (None, true) => Self::load_from_path(project_path),
            (Some(user), true) => Self::load_merged(user, project_path),
        }
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        debug!(path = %path.display(), "loaded war-room config");
        Ok(config)
    }

    fn load_merged(base_path: &Path, overlay_path: &Path) -> Result<Self> {
        let base_str = std::fs::read_to_string(base_path)
            .with_context(|| format!("Failed to read user config: {}", base_path.display()))?;
        let overlay_str = std::fs::read_to_string(overlay_path).with_context(|| {
            format!("Failed to read project config: {}", overlay_path.display())
        })?;

        let base_val: toml::Value = toml::from_str(&base_str)
            .with_context(|| format!("Failed to parse user config: {}", base_path.display()))?;
        let overlay_val: toml::Value = toml::from_str(&overlay_str).with_context(|| {
            format!("Failed to parse project config: {}", overlay_path.display())
        })?;

        let merged = merge_toml_values(base_val, overlay_val);
        // Roundtrip through string for reliable deserialization
        let merged_str = toml::to_string(&merged).context("Failed to serialize merged config")?;
        let config: Self =
            toml::from_str(&merged_str).context("Failed to deserialize merged config")?;
        debug!(
            user = %base_path.display(),
            project = %overlay_path.display(),
            "loaded merged war-room config"
        );
        Ok(config)
    }
}
