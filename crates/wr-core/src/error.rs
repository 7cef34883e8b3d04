use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum MemoryError {
    /// Raised once the append retry budget is spent. Carries the last I/O failure.
    #[error("Failed to write to {} after {attempts} attempt(s): {source}", path.display())]
    Persistence {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read memory log {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MemoryError {
    /// Path of the log file the failing operation targeted.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Persistence { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_display_persistence_names_file_and_attempts() {
        let err = MemoryError::Persistence {
            path: PathBuf::from("PROJECT_MEMORY.md"),
            attempts: 5,
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to write to PROJECT_MEMORY.md after 5 attempt(s): denied"
        );
    }

    #[test]
    fn test_display_read() {
        let err = MemoryError::Read {
            path: PathBuf::from("/tmp/log.md"),
            source: io::Error::new(io::ErrorKind::InvalidData, "bad utf-8"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read memory log /tmp/log.md: bad utf-8"
        );
    }

    #[test]
    fn test_persistence_keeps_source() {
        use std::error::Error;

        let err = MemoryError::Persistence {
            path: PathBuf::from("x.md"),
            attempts: 1,
            source: io::Error::other("disk full"),
        };
        let source = err.source().expect("source should be preserved");
        assert_eq!(source.to_string(), "disk full");
        assert_eq!(err.path(), std::path::Path::new("x.md"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryError>();
    }
}
