//! Advisory file locking for the shared memory log.
//! Independent crate with no internal war-room dependencies.
//!
//! Locking is a capability, not a guarantee: on Unix the log file's own
//! descriptor is locked with `flock(2)`, elsewhere [`NoopLock`] is used and
//! the caller's retry loop is the only protection.
//!
//! As in other raw-`flock` code, the guard only borrows the `File` that owns
//! the fd; `Drop` calls `flock(fd, LOCK_UN)` for deterministic release.

use std::fmt;
use std::fs::File;
use std::io;

#[cfg(unix)]
mod flock;

#[cfg(unix)]
pub use flock::FlockLock;

/// Strategy for taking an exclusive lock on an open file.
pub trait FileLock: Send + Sync + fmt::Debug {
    /// Block until an exclusive lock on `file` is held.
    ///
    /// The lock is released when the returned guard is dropped.
    fn lock_exclusive<'a>(&self, file: &'a File) -> io::Result<LockGuard<'a>>;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Guard for a held lock. Unlocks on drop; a no-op guard holds nothing.
pub struct LockGuard<'a> {
    file: Option<&'a File>,
}

impl<'a> LockGuard<'a> {
    #[cfg(unix)]
    pub(crate) fn held(file: &'a File) -> Self {
        Self { file: Some(file) }
    }

    pub(crate) fn none() -> Self {
        Self { file: None }
    }

    /// Whether this guard releases a real OS lock on drop.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

impl fmt::Debug for LockGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockGuard")
            .field("held", &self.is_held())
            .finish()
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            if let Some(file) = self.file.take() {
                flock::unlock(file);
            }
        }
    }
}

/// Lock strategy for platforms without advisory locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLock;

impl FileLock for NoopLock {
    fn lock_exclusive<'a>(&self, _file: &'a File) -> io::Result<LockGuard<'a>> {
        Ok(LockGuard::none())
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// Pick the best lock strategy for the running platform.
pub fn platform_lock() -> Box<dyn FileLock> {
    #[cfg(unix)]
    {
        Box::new(FlockLock)
    }
    #[cfg(not(unix))]
    {
        tracing::debug!("advisory locking unavailable, relying on append retries");
        Box::new(NoopLock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempfile;

    #[test]
    fn test_noop_lock_holds_nothing() {
        let file = tempfile().expect("Failed to create temp file");
        let guard = NoopLock.lock_exclusive(&file).expect("noop lock never fails");
        assert!(!guard.is_held());
        assert_eq!(NoopLock.name(), "noop");
    }

    #[test]
    fn test_noop_lock_reentrant() {
        let file = tempfile().expect("Failed to create temp file");
        let _first = NoopLock.lock_exclusive(&file).unwrap();
        let second = NoopLock.lock_exclusive(&file);
        assert!(second.is_ok(), "noop locks never conflict");
    }

    #[test]
    fn test_platform_lock_name() {
        let lock = platform_lock();
        if cfg!(unix) {
            assert_eq!(lock.name(), "flock");
        } else {
            assert_eq!(lock.name(), "noop");
        }
    }

    #[test]
    fn test_guard_debug_format() {
        let file = tempfile().unwrap();
        let guard = NoopLock.lock_exclusive(&file).unwrap();
        let debug = format!("{guard:?}");
        assert!(debug.contains("LockGuard"));
        assert!(debug.contains("held: false"));
    }
}
