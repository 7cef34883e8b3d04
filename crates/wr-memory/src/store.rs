use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};
use wr_config::MemoryConfig;
use wr_core::MemoryError;
use wr_lock::{FileLock, platform_lock};

use crate::entry::{Entry, LOG_HEADER, parse_entries};
use crate::tail::{TailWindow, tail_chars};

const READ_ERROR_TAG: &str = "[MEMORY READ ERROR]";

/// Outcome of a tail read. Collapses to plain text only when embedded in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryTail {
    Ok(String),
    /// The read failed; the text is a diagnostic marker naming the cause.
    Degraded(String),
}

impl MemoryTail {
    fn degraded(error: &io::Error) -> Self {
        Self::Degraded(format!("{READ_ERROR_TAG}: {error}"))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Ok(text) | Self::Degraded(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Ok(text) | Self::Degraded(text) => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

impl fmt::Display for MemoryTail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only project memory log shared by every agent process.
#[derive(Debug)]
pub struct MemoryStore {
    config: MemoryConfig,
    lock: Box<dyn FileLock>,
}

impl MemoryStore {
    pub fn new(config: MemoryConfig) -> Self {
        Self::with_lock(config, platform_lock())
    }

    pub fn with_lock(config: MemoryConfig, lock: Box<dyn FileLock>) -> Self {
        Self { config, lock }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn exists(&self) -> bool {
        self.config.path.exists()
    }

    /// Durably append one entry.
    ///
    /// Creates the log (with its header) on first use. Each attempt is
    /// retried with exponential backoff; once `max_retries` attempts have
    /// failed the last I/O error is returned as [`MemoryError::Persistence`].
    pub fn append_log(
        &self,
        source: &str,
        content: &str,
        category: &str,
    ) -> Result<Entry, MemoryError> {
        let entry = Entry::new(source, content, category);
        self.append_entry(&entry)?;
        Ok(entry)
    }

    pub fn append_entry(&self, entry: &Entry) -> Result<(), MemoryError> {
        let record = entry.render();
        let attempts = self.config.max_retries.max(1);
        let mut delay = Duration::from_millis(self.config.initial_backoff_ms);
        let mut attempt = 1;

        loop {
            match self.try_append(record.as_bytes()) {
                Ok(()) => {
                    info!(
                        path = %self.config.path.display(),
                        source = %entry.source,
                        category = %entry.category,
                        bytes = record.len(),
                        "Memory updated in {}",
                        self.config.path.display()
                    );
                    return Ok(());
                }
                Err(source) if attempt >= attempts => {
                    warn!(
                        path = %self.config.path.display(),
                        attempts,
                        error = %source,
                        "giving up on memory append"
                    );
                    return Err(MemoryError::Persistence {
                        path: self.config.path.clone(),
                        attempts,
                        source,
                    });
                }
                Err(error) => {
                    warn!(
                        path = %self.config.path.display(),
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        %error,
                        "memory append failed, retrying"
                    );
                    thread::sleep(delay);
                    delay = delay.saturating_mul(2);
                    attempt += 1;
                }
            }
        }
    }

    fn try_append(&self, record: &[u8]) -> io::Result<()> {
        self.ensure_header()?;

        let file = OpenOptions::new().append(true).open(&self.config.path)?;
        let _guard = self.lock.lock_exclusive(&file)?;
        let mut writer = &file;
        writer.write_all(record)?;
        writer.flush()?;
        file.sync_all()
    }

    /// Create the log with its header as one durable step.
    ///
    /// The header is written to a sibling temp file and linked into place
    /// without clobbering, so racing creators cannot duplicate it and no
    /// writer can observe the log before the header is in it.
    fn ensure_header(&self) -> io::Result<()> {
        let path = &self.config.path;
        if path.exists() {
            return Ok(());
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(LOG_HEADER.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;

        match tmp.persist_noclobber(path) {
            Ok(_) => {
                debug!(path = %path.display(), "created memory log");
                Ok(())
            }
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "memory log created concurrently");
                Ok(())
            }
            Err(e) => Err(e.error),
        }
    }

    /// Last `char_limit` characters of the log, not aligned to entry boundaries.
    ///
    /// A missing log yields an empty string. Read failures never propagate;
    /// they come back as [`MemoryTail::Degraded`].
    pub fn fetch_context(&self, char_limit: usize) -> MemoryTail {
        match self.read_tail(char_limit) {
            Ok(window) => MemoryTail::Ok(window.text),
            Err(tail) => tail,
        }
    }

    /// Like [`fetch_context`](Self::fetch_context), minus the partial leading line.
    pub fn fetch_context_aligned(&self, char_limit: usize) -> MemoryTail {
        match self.read_tail(char_limit) {
            Ok(window) => MemoryTail::Ok(window.aligned()),
            Err(tail) => tail,
        }
    }

    fn read_tail(&self, char_limit: usize) -> Result<TailWindow, MemoryTail> {
        let path = &self.config.path;
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(TailWindow {
                    text: String::new(),
                    truncated: false,
                });
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "memory log unreadable");
                return Err(MemoryTail::degraded(&e));
            }
        };

        tail_chars(&mut file, char_limit).map_err(|e| {
            warn!(path = %path.display(), error = %e, "memory tail read failed");
            MemoryTail::degraded(&e)
        })
    }

    /// Parse every entry in the log, oldest first.
    pub fn entries(&self) -> Result<Vec<Entry>, MemoryError> {
        match fs::read_to_string(&self.config.path) {
            Ok(text) => Ok(parse_entries(&text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(source) => Err(MemoryError::Read {
                path: self.config.path.clone(),
                source,
            }),
        }
    }
}
