//! Account registration, activation, and login.

use std::fmt;
use std::sync::Arc;

use serde_json::json;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{info, warn};
use uuid::Uuid;

use super::ports::{AccountRepository, AccountRepositoryError};
use super::{Account, Error, LoginCredentials, UserId, Username, Viewer};

/// One-time key that activates a freshly registered account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivationKey(String);

impl ActivationKey {
    /// Generate a new random key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap a key received from a client; blank keys are rejected.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_request("activation key must not be empty"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex SHA-256 digest binding a password to its username.
///
/// The username acts as the only salt and the hash is fast, so this scheme
/// is fit for development and test deployments only. A production account
/// store needs a slow, per-account salted KDF in its place.
#[must_use]
pub fn password_digest(username: &Username, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_str().as_bytes());
    hasher.update([0_u8]);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare digests without short-circuiting on the first differing byte.
fn digests_match(stored: &str, candidate: &str) -> bool {
    stored.as_bytes().ct_eq(candidate.as_bytes()).into()
}

fn repository_error(err: AccountRepositoryError) -> Error {
    match err {
        AccountRepositoryError::Conflict { username } => {
            Error::invalid_request("an account with this username already exists")
                .with_details(json!({ "field": "username", "username": username }))
        }
        AccountRepositoryError::Backend { message } => {
            Error::internal(format!("account repository failed: {message}"))
        }
    }
}

/// Account lifecycle use-cases.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    /// Build the service over an account repository.
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Create an inactive account and return the key that activates it.
    pub async fn register(&self, credentials: &LoginCredentials) -> Result<ActivationKey, Error> {
        let username = credentials.username().clone();
        let digest = password_digest(&username, credentials.password());
        let account = Account::new(UserId::random(), username, digest);
        let user = account.id();
        self.accounts
            .insert(account)
            .await
            .map_err(repository_error)?;
        let key = ActivationKey::generate();
        self.accounts
            .save_activation(&key, user)
            .await
            .map_err(repository_error)?;
        info!(user = %user, "account registered");
        Ok(key)
    }

    /// Activate the account `key` was issued for.
    pub async fn activate(&self, key: &ActivationKey) -> Result<Account, Error> {
        let user = self
            .accounts
            .take_activation(key)
            .await
            .map_err(repository_error)?
            .ok_or_else(|| Error::not_found("activation key not recognised"))?;
        let account = self
            .accounts
            .find_by_id(user)
            .await
            .map_err(repository_error)?
            .ok_or_else(|| Error::internal(format!("activation key refers to unknown user {user}")))?
            .with_active(true);
        self.accounts
            .update(account.clone())
            .await
            .map_err(repository_error)?;
        info!(user = %user, "account activated");
        Ok(account)
    }

    /// Check credentials and return the matching active account.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Account, Error> {
        let account = self
            .accounts
            .find_by_username(credentials.username())
            .await
            .map_err(repository_error)?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        let digest = password_digest(credentials.username(), credentials.password());
        if !digests_match(account.password_digest(), &digest) {
            return Err(Error::unauthorized("invalid credentials"));
        }
        if !account.is_active() {
            return Err(Error::forbidden("account has not been activated"));
        }
        Ok(account)
    }

    /// Insert a pre-built account, used for start-up provisioning.
    pub async fn provision(&self, account: Account) -> Result<(), Error> {
        self.accounts
            .insert(account)
            .await
            .map_err(repository_error)
    }

    /// Viewer for a session's user id. Unknown ids degrade to anonymous.
    pub async fn viewer(&self, user: Option<UserId>) -> Result<Viewer, Error> {
        let Some(user) = user else {
            return Ok(Viewer::Anonymous);
        };
        let account = self
            .accounts
            .find_by_id(user)
            .await
            .map_err(repository_error)?;
        match account {
            Some(account) if account.is_active() => Ok(Viewer::Authenticated(account)),
            Some(_) | None => {
                warn!(user = %user, "session refers to an unknown or inactive account");
                Ok(Viewer::Anonymous)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockAccountRepository;
    use rstest::rstest;

    fn creds(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid credentials")
    }

    fn stored(username: &str, password: &str, active: bool) -> Account {
        let name = Username::new(username).expect("name");
        let digest = password_digest(&name, password);
        Account::new(UserId::random(), name, digest).with_active(active)
    }

    fn service_finding(account: Option<Account>) -> AccountService {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username()
            .returning(move |_| Ok(account.clone()));
        AccountService::new(Arc::new(repo))
    }

    #[rstest]
    fn digests_depend_on_the_username() {
        let a = password_digest(&Username::new("u1").expect("name"), "foo");
        let b = password_digest(&Username::new("u2").expect("name"), "foo");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[rstest]
    #[case("abc", "abc", true)]
    #[case("abc", "abd", false)]
    #[case("abc", "ab", false)]
    #[case("", "", true)]
    fn digest_comparison(#[case] stored: &str, #[case] candidate: &str, #[case] expected: bool) {
        assert_eq!(digests_match(stored, candidate), expected);
    }

    #[rstest]
    #[case(None, "foo", ErrorCode::Unauthorized)]
    #[case(Some(stored("u1", "foo", true)), "bar", ErrorCode::Unauthorized)]
    #[case(Some(stored("u1", "foo", false)), "foo", ErrorCode::Forbidden)]
    #[tokio::test]
    async fn authentication_failures(
        #[case] account: Option<Account>,
        #[case] password: &str,
        #[case] expected: ErrorCode,
    ) {
        let service = service_finding(account);
        let err = service
            .authenticate(&creds("u1", password))
            .await
            .expect_err("must fail");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn authentication_succeeds_for_active_accounts() {
        let account = stored("u1", "foo", true);
        let service = service_finding(Some(account.clone()));
        let found = service
            .authenticate(&creds("u1", "foo"))
            .await
            .expect("authenticated");
        assert_eq!(found, account);
    }

    #[tokio::test]
    async fn duplicate_registration_is_an_invalid_request() {
        let mut repo = MockAccountRepository::new();
        repo.expect_insert()
            .returning(|account| Err(AccountRepositoryError::conflict(account.username().as_str())));
        let service = AccountService::new(Arc::new(repo));
        let err = service
            .register(&creds("u1", "foo"))
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn unknown_activation_keys_are_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_take_activation().returning(|_| Ok(None));
        let service = AccountService::new(Arc::new(repo));
        let err = service
            .activate(&ActivationKey::generate())
            .await
            .expect_err("unknown key");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn missing_session_user_is_anonymous() {
        let service = AccountService::new(Arc::new(MockAccountRepository::new()));
        assert_eq!(service.viewer(None).await.expect("viewer"), Viewer::Anonymous);
    }

    #[tokio::test]
    async fn inactive_session_user_is_anonymous() {
        let account = stored("u1", "foo", false);
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(account.clone())));
        let service = AccountService::new(Arc::new(repo));
        let viewer = service
            .viewer(Some(UserId::random()))
            .await
            .expect("viewer");
        assert_eq!(viewer, Viewer::Anonymous);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_activation_keys_are_rejected(#[case] raw: &str) {
        let err = ActivationKey::parse(raw).expect_err("blank");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
