use anyhow::{Result, bail};

use crate::config::ProjectConfig;

/// Reject settings that would make the memory store unusable.
pub fn validate_config(config: &ProjectConfig) -> Result<()> {
    let memory = &config.memory;
    if memory.path.as_os_str().is_empty() {
        bail!("memory.path cannot be empty");
    }
    if memory.max_retries == 0 {
        bail!("memory.max_retries must be > 0 (got 0)");
    }
    if memory.tail_char_limit == 0 {
        bail!("memory.tail_char_limit must be > 0 (got 0)");
    }
    if config.context.memory_char_limit == 0 {
        bail!("context.memory_char_limit must be > 0 (got 0)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProjectConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_retries_rejected() {
        let mut config = ProjectConfig::default();
        config.memory.max_retries = 0;
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("memory.max_retries"), "{err}");
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut config = ProjectConfig::default();
        config.memory.path = PathBuf::new();
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("memory.path"), "{err}");
    }

    #[test]
    fn test_zero_char_limits_rejected() {
        let mut config = ProjectConfig::default();
        config.memory.tail_char_limit = 0;
        assert!(validate_config(&config).is_err());

        let mut config = ProjectConfig::default();
        config.context.memory_char_limit = 0;
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("context.memory_char_limit"), "{err}");
    }

    #[test]
    fn test_zero_listing_limit_allowed() {
        let mut config = ProjectConfig::default();
        config.context.listing_limit = 0;
        assert!(validate_config(&config).is_ok());
    }
}
