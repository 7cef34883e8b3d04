//! Memory store configuration loading and validation (.war-room/config.toml).

pub mod config;
mod config_merge;
pub mod memory;
pub mod paths;
pub mod validate;

pub use config::ProjectConfig;
pub use memory::{ContextConfig, DEFAULT_MEMORY_FILE, MemoryConfig};
pub use validate::validate_config;
