//! `flock(2)` lock strategy.

use std::fs::File;
use std::io;
use std::os::unix::io::AsRawFd;

use tracing::{debug, warn};

use crate::{FileLock, LockGuard};

/// Exclusive advisory lock via `flock(fd, LOCK_EX)`.
///
/// `flock` locks belong to the open file description, so two independent
/// `open()` calls on the same path conflict even inside one process.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlockLock;

impl FileLock for FlockLock {
    fn lock_exclusive<'a>(&self, file: &'a File) -> io::Result<LockGuard<'a>> {
        let fd = file.as_raw_fd();
        loop {
            // SAFETY: `fd` is a valid file descriptor borrowed from `file`,
            // which outlives the returned guard. `LOCK_EX` blocks until the
            // exclusive lock is granted.
            let ret = unsafe { libc::flock(fd, libc::LOCK_EX) };
            if ret == 0 {
                debug!(fd, "acquired exclusive flock");
                return Ok(LockGuard::held(file));
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    fn name(&self) -> &'static str {
        "flock"
    }
}

pub(crate) fn unlock(file: &File) {
    let fd = file.as_raw_fd();
    // SAFETY: `fd` is a valid file descriptor owned by `file`.
    // If the call fails the lock is still released when the fd is closed.
    let ret = unsafe { libc::flock(fd, libc::LOCK_UN) };
    if ret != 0 {
        warn!(fd, error = %io::Error::last_os_error(), "failed to release flock");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::path::Path;
    use tempfile::tempdir;

    fn open(path: &Path) -> File {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Failed to open test file")
    }

    fn try_lock_nb(file: &File) -> bool {
        // SAFETY: valid fd owned by `file`; non-blocking probe.
        let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if ret == 0 {
            // SAFETY: same fd, releasing the probe lock.
            unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
            true
        } else {
            false
        }
    }

    #[test]
    fn test_lock_excludes_second_description() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("PROJECT_MEMORY.md");
        let holder = open(&path);
        let contender = open(&path);

        let guard = FlockLock.lock_exclusive(&holder).expect("lock should succeed");
        assert!(guard.is_held());
        assert!(
            !try_lock_nb(&contender),
            "second open file description must not get the lock"
        );
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("PROJECT_MEMORY.md");
        let holder = open(&path);
        let contender = open(&path);

        {
            let _guard = FlockLock.lock_exclusive(&holder).unwrap();
            assert!(!try_lock_nb(&contender));
        }

        assert!(try_lock_nb(&contender), "lock should be free after drop");
    }

    #[test]
    fn test_lock_blocks_until_released() {
        use std::sync::mpsc;
        use std::time::{Duration, Instant};

        let dir = tempdir().unwrap();
        let path = dir.path().join("PROJECT_MEMORY.md");
        let holder = open(&path);
        let guard = FlockLock.lock_exclusive(&holder).unwrap();

        let (tx, rx) = mpsc::channel();
        let waiter_path = path.clone();
        let waiter = std::thread::spawn(move || {
            let file = open(&waiter_path);
            let start = Instant::now();
            let _guard = FlockLock.lock_exclusive(&file).unwrap();
            tx.send(start.elapsed()).unwrap();
        });

        std::thread::sleep(Duration::from_millis(150));
        drop(guard);

        let waited = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        waiter.join().unwrap();
        assert!(waited >= Duration::from_millis(100), "waited {waited:?}");
    }
}
