//! Guaranteed removal of temporary uploads.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Deletes a temporary upload when dropped.
///
/// Removal happens exactly once: on [`TempUpload::reap`], or on drop if it
/// was never reaped explicitly. Drop also runs while unwinding and when an
/// async task holding the guard is cancelled. A file that is already gone is
/// not an error; any other removal failure is logged and swallowed.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    reaped: bool,
}

impl TempUpload {
    /// Take ownership of the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reaped: false,
        }
    }

    /// Path of the guarded file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now. Returns `true` if this call deleted it.
    pub fn reap(&mut self) -> bool {
        if self.reaped {
            return false;
        }
        self.reaped = true;

        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed temporary upload {}", self.path.display());
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Temporary upload {} already removed", self.path.display());
                false
            }
            Err(e) => {
                warn!(
                    "Failed to remove temporary upload {}: {}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }

    /// Run `body` on the file, then remove it whatever the outcome.
    pub fn run<T>(self, body: impl FnOnce(&Path) -> T) -> T {
        body(&self.path)
    }

    /// Async form of [`TempUpload::run`].
    pub async fn run_async<T, F, Fut>(self, body: F) -> T
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = T>,
    {
        body(self.path.clone()).await
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        self.reap();
    }
}

/// Run `body` on the upload at `path` and delete the file afterwards,
/// whether `body` returns, fails or panics.
pub fn with_temporary_upload<T>(path: impl Into<PathBuf>, body: impl FnOnce(&Path) -> T) -> T {
    TempUpload::new(path).run(body)
}
