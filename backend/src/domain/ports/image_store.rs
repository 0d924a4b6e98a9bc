//! Port for storing uploaded recipe images.
use async_trait::async_trait;

use crate::domain::ImagePath;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Writing the file failed.
        Io {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "image store write failed: {message}",
    }
}

/// Blob storage keyed by relative [`ImagePath`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `bytes` at `path`, creating parent directories as needed.
    async fn store(&self, path: &ImagePath, bytes: &[u8]) -> Result<(), ImageStoreError>;
}
