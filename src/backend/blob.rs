use crate::backend::BackendError;
use async_trait::async_trait;

/// File storage for dish and restaurant images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Uploads `bytes` to `path`, replacing what was there, and returns the
    /// public download URL.
    ///
    /// `on_progress` receives the percentage sent so far, in `0.0..=100.0`.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        on_progress: &(dyn Fn(f64) + Send + Sync),
    ) -> Result<String, BackendError>;
}

/// Progress callback that ignores every report.
pub fn no_progress(_percent: f64) {}
