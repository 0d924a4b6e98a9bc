//! `ImageStore` adapter writing beneath a capability-scoped media root.
//!
//! All paths are resolved through a `cap_std` [`Dir`], so a stored path can
//! never escape the media root even if it contains `..` components. Files are
//! written to a hidden temporary name and renamed into place, so readers never
//! observe a partially written image.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ImagePath;
use crate::domain::ports::{ImageStore, ImageStoreError};

/// Image store rooted at a local directory.
#[derive(Clone)]
pub struct LocalImageStore {
    root: Arc<Dir>,
    root_path: PathBuf,
}

impl LocalImageStore {
    /// Open (creating if needed) the media root directory.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root_path = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root_path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root_path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
            root_path,
        })
    }

    /// Directory the store writes beneath.
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

fn discard_staging(dir: &Dir, staging: &Path) {
    if let Err(error) = dir.remove_file(staging) {
        warn!(path = %staging.display(), %error, "failed to remove staging file");
    }
}

fn write_atomically(dir: &Dir, relative: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = relative
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "image path has no file name"))?;
    let parent = relative.parent().unwrap_or_else(|| Path::new(""));
    if !parent.as_os_str().is_empty() {
        dir.create_dir_all(parent)?;
    }

    let staging = parent.join(format!(
        ".{}.tmp.{}",
        file_name.to_string_lossy(),
        Uuid::new_v4().simple()
    ));
    if let Err(error) = dir.write(&staging, bytes) {
        discard_staging(dir, &staging);
        return Err(error);
    }
    dir.rename(&staging, dir, relative)
        .inspect_err(|_| discard_staging(dir, &staging))
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, path: &ImagePath, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let dir = Arc::clone(&self.root);
        let relative = PathBuf::from(path.as_str());
        let content = bytes.to_vec();
        let size = content.len();

        tokio::task::spawn_blocking(move || write_atomically(&dir, &relative, &content))
            .await
            .map_err(|err| ImageStoreError::io(format!("image write task failed: {err}")))?
            .map_err(|err| ImageStoreError::io(format!("{path}: {err}")))?;

        debug!(%path, size, "stored image");
        Ok(())
    }
}
