//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `COURSEWARE_*` environment variables, configuration files,
//! and command-line flags, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{FeatureFlags, STATIC_PREFIX, StaticAssets};

const DEFAULT_CONTENT_ROOT: &str = "content";
const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);

/// Configuration for the courseware server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COURSEWARE")]
pub struct CoursewareSettings {
    /// Directory holding one sub-directory per course.
    pub content_root: Option<PathBuf>,
    /// Base URL that static course assets are served from.
    pub static_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// Treat every course as started.
    #[ortho_config(default = false)]
    pub disable_start_dates: bool,
    /// Allow browsing the wiki outside a course.
    #[ortho_config(default = false)]
    pub allow_wiki_root_access: bool,
    /// Limit the catalogue to courses the viewer can staff.
    #[ortho_config(default = false)]
    pub enable_lms_migration: bool,
    /// JSON file of accounts to provision at start-up.
    pub accounts_seed: Option<PathBuf>,
}

impl CoursewareSettings {
    /// Configured content root, defaulting to `./content`.
    pub fn content_root(&self) -> PathBuf {
        self.content_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_ROOT))
    }

    /// Static asset resolver for the configured base URL.
    pub fn static_assets(&self) -> StaticAssets {
        StaticAssets::new(self.static_url.as_deref().unwrap_or(STATIC_PREFIX))
    }

    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Feature flags handed to the domain services.
    pub fn flags(&self) -> FeatureFlags {
        FeatureFlags {
            disable_start_dates: self.disable_start_dates,
            allow_wiki_root_access: self.allow_wiki_root_access,
            enable_lms_migration: self.enable_lms_migration,
        }
    }
}
