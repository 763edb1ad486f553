//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};

use courseware::domain::{FeatureFlags, StaticAssets};
use courseware::settings::CoursewareSettings;

/// Everything [`super::create_server`] needs to build the application.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) content_root: PathBuf,
    pub(crate) assets: StaticAssets,
    pub(crate) flags: FeatureFlags,
    pub(crate) accounts_seed: Option<PathBuf>,
}

impl ServerConfig {
    /// Combine session preferences with the loaded settings.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        settings: &CoursewareSettings,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr: settings.bind_addr(),
            content_root: settings.content_root(),
            assets: settings.static_assets(),
            flags: settings.flags(),
            accounts_seed: settings.accounts_seed.clone(),
        }
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
