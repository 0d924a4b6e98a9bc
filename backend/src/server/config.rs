//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use recipe_backend::outbound::persistence::DbPool;

/// Everything `create_server` needs beyond the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) media_root: PathBuf,
}

impl ServerConfig {
    /// Bundle the listen address, pool and media directory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, media_root: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            db_pool,
            media_root: media_root.into(),
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Directory uploaded images are written under.
    #[must_use]
    pub fn media_root(&self) -> &Path {
        &self.media_root
    }
}
