use std::path::{Path, PathBuf};

/// XDG app name used for user-level config.
pub const APP_NAME: &str = "war-room";
/// Project-local config directory, relative to the project root.
pub const PROJECT_CONFIG_DIR: &str = ".war-room";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// User-level config file (`~/.config/war-room/config.toml` on Linux).
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Project-level config file under `project_root`.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root
        .join(PROJECT_CONFIG_DIR)
        .join(CONFIG_FILE_NAME)
}
