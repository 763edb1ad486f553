//! Courseware entry-point: loads settings, wires adapters, and serves HTTP.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::env;
use std::io;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use courseware::inbound::http::health::HealthState;
use courseware::settings::CoursewareSettings;
use server::{ServerConfig, create_server};

const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = CoursewareSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let key = session_key()?;
    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let config = ServerConfig::new(key, cookie_secure, SameSite::Lax, &settings);
    info!(
        bind_addr = %config.bind_addr(),
        content_root = %settings.content_root().display(),
        "starting courseware"
    );

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config).await?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

/// Session signing key from `SESSION_KEY_FILE`, or an ephemeral key in
/// development.
fn session_key() -> io::Result<Key> {
    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| DEFAULT_SESSION_KEY_FILE.into());
    match read_key_file(&key_path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )))
            }
        }
    }
}

fn read_key_file(path: &str) -> io::Result<Vec<u8>> {
    use cap_std::{ambient_authority, fs::Dir};
    use std::path::Path;

    let path = Path::new(path);
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "key path names no file"))?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read(file_name)
}
