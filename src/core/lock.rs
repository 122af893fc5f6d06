//! Host-wide execution lock
//!
//! Only one reconciliation run may be active on a machine at a time. The
//! lock is an OS file lock on a well-known file (`flock` on unix,
//! `LockFileEx` on windows), so it covers every process on the host and the
//! OS drops it if the holder dies. A run that finds the lock taken does no
//! work and exits successfully.

use crate::types::ConsultaError;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// File name of the lock inside the system temp directory
pub const LOCK_FILE_NAME: &str = "consulta.lock";

/// Held execution lock, released on drop
#[derive(Debug)]
pub struct ExecutionLock {
    file: File,
    path: PathBuf,
}

impl ExecutionLock {
    /// Default lock location shared by every run on the host
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(LOCK_FILE_NAME)
    }

    /// Try to take the lock without waiting
    ///
    /// # Returns
    ///
    /// * `Ok(Some(lock))` - this run owns the lock until `lock` is dropped
    /// * `Ok(None)` - another run holds the lock
    /// * `Err(_)` - the lock file could not be opened
    pub fn acquire(path: &Path) -> Result<Option<Self>, ConsultaError> {
        match try_lock_file(path) {
            Ok(Some(file)) => {
                tracing::debug!(path = %path.display(), "execution lock acquired");
                Ok(Some(ExecutionLock {
                    file,
                    path: path.to_path_buf(),
                }))
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "execution lock busy");
                Ok(None)
            }
            Err(e) => Err(ConsultaError::Io {
                message: format!("Failed to open lock file '{}': {}", path.display(), e),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Open (or create) the lock file and try to take an exclusive lock on it
///
/// The file itself is never removed; a file left behind by a dead run is not
/// a held lock.
fn try_lock_file(path: &Path) -> io::Result<Option<File>> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(path)?;

    if sys::try_lock(&file)? {
        Ok(Some(file))
    } else {
        Ok(None)
    }
}

#[cfg(unix)]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;

    pub fn try_lock(file: &File) -> io::Result<bool> {
        // SAFETY: the descriptor belongs to `file`, which is alive for the call.
        let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
        if rc == 0 {
            return Ok(true);
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
            Ok(false)
        } else {
            Err(err)
        }
    }

    pub fn unlock(file: &File) {
        // SAFETY: the descriptor belongs to `file`, which is alive for the call.
        unsafe {
            libc::flock(file.as_raw_fd(), libc::LOCK_UN);
        }
    }
}

#[cfg(windows)]
mod sys {
    use std::fs::File;
    use std::io;
    use std::os::windows::io::AsRawHandle;
    use winapi::shared::winerror::ERROR_LOCK_VIOLATION;
    use winapi::um::fileapi::{LockFileEx, UnlockFileEx};
    use winapi::um::minwinbase::{LOCKFILE_EXCLUSIVE_LOCK, LOCKFILE_FAIL_IMMEDIATELY, OVERLAPPED};

    pub fn try_lock(file: &File) -> io::Result<bool> {
        // SAFETY: the handle belongs to `file`, which is alive for the call,
        // and a zeroed OVERLAPPED locks from offset 0.
        let rc = unsafe {
            let mut overlapped: OVERLAPPED = std::mem::zeroed();
            LockFileEx(
                file.as_raw_handle() as _,
                LOCKFILE_EXCLUSIVE_LOCK | LOCKFILE_FAIL_IMMEDIATELY,
                0,
                1,
                0,
                &mut overlapped,
            )
        };
        if rc != 0 {
            return Ok(true);
        }

        let err = io::Error::last_os_error();
        if err.raw_os_error() == Some(ERROR_LOCK_VIOLATION as i32) {
            Ok(false)
        } else {
            Err(err)
        }
    }

    pub fn unlock(file: &File) {
        // SAFETY: same handle and range as `try_lock`.
        unsafe {
            let mut overlapped: OVERLAPPED = std::mem::zeroed();
            UnlockFileEx(file.as_raw_handle() as _, 0, 1, 0, &mut overlapped);
        }
    }
}

impl Drop for ExecutionLock {
    fn drop(&mut self) {
        sys::unlock(&self.file);
        tracing::debug!(path = %self.path.display(), "execution lock released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_free_lock() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        let lock = ExecutionLock::acquire(&path).unwrap();
        assert!(lock.is_some());
        assert_eq!(lock.unwrap().path(), path.as_path());
    }

    #[test]
    fn test_second_acquire_is_busy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        let _held = ExecutionLock::acquire(&path).unwrap().unwrap();
        assert!(ExecutionLock::acquire(&path).unwrap().is_none());
    }

    #[test]
    fn test_lock_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        {
            let _held = ExecutionLock::acquire(&path).unwrap().unwrap();
        }
        assert!(ExecutionLock::acquire(&path).unwrap().is_some());
    }

    #[test]
    fn test_leftover_lock_file_is_not_a_held_lock() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let lock = ExecutionLock::acquire(&path).unwrap();
        assert!(lock.is_some());
    }

    #[test]
    fn test_lock_file_survives_release() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LOCK_FILE_NAME);

        drop(ExecutionLock::acquire(&path).unwrap().unwrap());
        assert!(path.exists());
        assert!(ExecutionLock::acquire(&path).unwrap().is_some());
    }

    #[test]
    fn test_unopenable_lock_path_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join(LOCK_FILE_NAME);

        assert!(matches!(
            ExecutionLock::acquire(&path),
            Err(ConsultaError::Io { .. })
        ));
    }
}
