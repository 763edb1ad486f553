//! Start-up wiring of adapters into the shared HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use courseware::domain::AccountService;
use courseware::inbound::http::state::{HttpState, HttpStatePorts};
use courseware::outbound::accounts_seed::seed_accounts;
use courseware::outbound::content::FsCourseStore;
use courseware::outbound::memory::{
    InMemoryAccountRepository, InMemoryEnrollmentRepository, InMemoryWikiRepository,
};

use super::ServerConfig;

/// Shared state plus the number of courses that loaded.
pub(super) struct BuiltState {
    pub(super) http_state: web::Data<HttpState>,
    pub(super) course_count: usize,
}

/// Open the content root, provision seeded accounts, and build the state.
///
/// # Errors
/// Fails when the content root cannot be read or the seed file is invalid.
pub(super) async fn build_http_state(config: &ServerConfig) -> io::Result<BuiltState> {
    let store = Arc::new(FsCourseStore::open(&config.content_root).map_err(io::Error::other)?);
    let course_count = store.course_count();
    let accounts = Arc::new(InMemoryAccountRepository::new());

    if let Some(seed) = &config.accounts_seed {
        seed_accounts(seed, &AccountService::new(accounts.clone()))
            .await
            .map_err(io::Error::other)?;
    }

    let ports = HttpStatePorts {
        courses: store.clone(),
        resources: store,
        accounts,
        enrollments: Arc::new(InMemoryEnrollmentRepository::new()),
        wiki: Arc::new(InMemoryWikiRepository::new()),
        clock: Arc::new(DefaultClock),
    };
    let state = HttpState::new(ports, config.flags, config.assets.clone());
    Ok(BuiltState {
        http_state: web::Data::new(state),
        course_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::{Key, SameSite};
    use courseware::domain::{FeatureFlags, StaticAssets};
    use courseware::test_support::cap_fs::write_file;
    use courseware::test_support::fixtures::ContentFixture;
    use rstest::rstest;
    use std::path::PathBuf;

    fn config(content_root: PathBuf, accounts_seed: Option<PathBuf>) -> ServerConfig {
        ServerConfig {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            content_root,
            assets: StaticAssets::default(),
            flags: FeatureFlags::default(),
            accounts_seed,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn builds_state_from_content_and_seed() {
        let fixture = ContentFixture::create().expect("content fixture");
        let seed = fixture.root().join("accounts.json");
        write_file(
            &seed,
            br#"[{"username": "staff@test.com", "password": "foo", "is_staff": true}]"#,
        )
        .expect("write seed");

        let built = build_http_state(&config(fixture.root().to_path_buf(), Some(seed)))
            .await
            .expect("state");
        assert_eq!(built.course_count, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_content_root_fails() {
        let fixture = ContentFixture::create().expect("content fixture");
        let result = build_http_state(&config(fixture.root().join("nowhere"), None)).await;
        assert!(result.is_err());
    }
}
