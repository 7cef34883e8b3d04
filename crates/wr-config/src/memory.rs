use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MEMORY_FILE: &str = "PROJECT_MEMORY.md";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Log file path. Relative paths resolve against the project root.
    pub path: PathBuf,
    /// Total append attempts before giving up.
    pub max_retries: u32,
    /// Delay before the second attempt; doubles after every failure.
    pub initial_backoff_ms: u64,
    /// Default character budget for `fetch_context`.
    pub tail_char_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MEMORY_FILE),
            max_retries: 5,
            initial_backoff_ms: 100,
            tail_char_limit: 4000,
        }
    }
}

impl MemoryConfig {
    /// Config for a log file at `path`, other settings at their defaults.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Anchor a relative `path` at `root`. Absolute paths are kept.
    pub fn resolve_against(mut self, root: &Path) -> Self {
        if self.path.is_relative() {
            self.path = root.join(&self.path);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Maximum directory entries named before the `...` marker.
    pub listing_limit: usize,
    /// Character budget of the memory section.
    pub memory_char_limit: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            listing_limit: 50,
            memory_char_limit: 3000,
        }
    }
}

impl ContextConfig {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct Envelope {
        #[serde(default)]
        memory: MemoryConfig,
        #[serde(default)]
        context: ContextConfig,
    }

    #[test]
    fn test_memory_config_defaults() {
        let parsed: Envelope = toml::from_str("[memory]\n").unwrap();
        assert_eq!(parsed.memory.path, PathBuf::from("PROJECT_MEMORY.md"));
        assert_eq!(parsed.memory.max_retries, 5);
        assert_eq!(parsed.memory.initial_backoff_ms, 100);
        assert_eq!(parsed.memory.tail_char_limit, 4000);
        assert!(parsed.memory.is_default());
        assert!(parsed.context.is_default());
    }

    #[test]
    fn test_memory_config_full() {
        let toml = r#"
[memory]
path = "logs/shared.md"
max_retries = 8
initial_backoff_ms = 50
tail_char_limit = 1200

[context]
listing_limit = 10
memory_char_limit = 500
"#;
        let parsed: Envelope = toml::from_str(toml).unwrap();
        assert_eq!(parsed.memory.path, PathBuf::from("logs/shared.md"));
        assert_eq!(parsed.memory.max_retries, 8);
        assert_eq!(parsed.memory.initial_backoff_ms, 50);
        assert_eq!(parsed.memory.tail_char_limit, 1200);
        assert_eq!(parsed.context.listing_limit, 10);
        assert_eq!(parsed.context.memory_char_limit, 500);
    }

    #[test]
    fn test_resolve_against_relative() {
        let config = MemoryConfig::default().resolve_against(Path::new("/work/proj"));
        assert_eq!(config.path, PathBuf::from("/work/proj/PROJECT_MEMORY.md"));
    }

    #[test]
    fn test_resolve_against_keeps_absolute() {
        let config = MemoryConfig::at("/var/log/memory.md").resolve_against(Path::new("/work"));
        assert_eq!(config.path, PathBuf::from("/var/log/memory.md"));
    }
}
