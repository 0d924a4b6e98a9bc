//! Filesystem storage for uploaded media.

mod local_image_store;

pub use local_image_store::LocalImageStore;
