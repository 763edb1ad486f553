//! Start-up account provisioning from a JSON seed file.
//!
//! The seed file is a JSON array:
//!
//! ```json
//! [
//!   {"username": "instructor", "password": "secret", "is_staff": false,
//!    "groups": ["staff_toy"]}
//! ]
//! ```
//!
//! Seeded accounts are active unless `"active": false` is given.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::domain::{
    Account, AccountService, Capabilities, GroupName, UserId, UserValidationError, Username,
    password_digest,
};

/// Errors raised while loading or applying an account seed file.
#[derive(Debug, Error)]
pub enum AccountSeedError {
    /// The file could not be read.
    #[error("failed to read account seed at {path}: {source}")]
    Read {
        /// Seed file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not a valid seed document.
    #[error("account seed is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A seeded username is invalid.
    #[error("account seed has an invalid username: {0}")]
    Username(#[from] UserValidationError),
    /// Provisioning an account failed.
    #[error("failed to provision seeded account {username}: {message}")]
    Provision {
        /// Account that failed.
        username: String,
        /// Reason reported by the account service.
        message: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedAccount {
    username: String,
    password: String,
    #[serde(default)]
    is_staff: bool,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    groups: Vec<String>,
}

const fn default_active() -> bool {
    true
}

impl SeedAccount {
    fn into_account(self) -> Result<Account, UserValidationError> {
        let username = Username::new(&self.username)?;
        let digest = password_digest(&username, &self.password);
        let capabilities: Capabilities = self.groups.into_iter().map(GroupName::new).collect();
        Ok(Account::new(UserId::random(), username, digest)
            .with_staff(self.is_staff)
            .with_active(self.active)
            .with_capabilities(capabilities))
    }
}

/// Parse a seed document into accounts.
pub fn parse_seed(contents: &str) -> Result<Vec<Account>, AccountSeedError> {
    let seeds: Vec<SeedAccount> = serde_json::from_str(contents)?;
    seeds
        .into_iter()
        .map(|seed| seed.into_account().map_err(AccountSeedError::from))
        .collect()
}

/// Read the seed file at `path`.
pub fn load_seed(path: &Path) -> Result<Vec<Account>, AccountSeedError> {
    let read_error = |source| AccountSeedError::Read {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let contents = dir.read_to_string(Path::new(file_name)).map_err(read_error)?;
    parse_seed(&contents)
}

/// Load the seed file and provision every account through `service`.
pub async fn seed_accounts(path: &Path, service: &AccountService) -> Result<usize, AccountSeedError> {
    let accounts = load_seed(path)?;
    let count = accounts.len();
    for account in accounts {
        let username = account.username().as_str().to_owned();
        service
            .provision(account)
            .await
            .map_err(|err| AccountSeedError::Provision {
                username,
                message: err.message().to_owned(),
            })?;
    }
    info!(path = %path.display(), count, "seeded accounts");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_staff_and_groups() {
        let accounts = parse_seed(
            r#"[
                {"username": "admin", "password": "pw", "is_staff": true},
                {"username": "u2", "password": "foo", "groups": ["staff_toy"]},
                {"username": "pending", "password": "foo", "active": false}
            ]"#,
        )
        .expect("seed");
        assert_eq!(accounts.len(), 3);
        assert!(accounts[0].is_staff());
        assert!(
            accounts[1]
                .capabilities()
                .contains(&GroupName::new("staff_toy"))
        );
        assert!(accounts[1].is_active());
        assert!(!accounts[2].is_active());
        assert_eq!(
            accounts[1].password_digest(),
            password_digest(accounts[1].username(), "foo")
        );
    }

    #[rstest]
    #[case(r#"{"username": "u1"}"#)]
    #[case(r#"[{"username": "u1", "password": "x", "role": "admin"}]"#)]
    fn rejects_malformed_documents(#[case] raw: &str) {
        assert!(matches!(parse_seed(raw), Err(AccountSeedError::Parse(_))));
    }

    #[rstest]
    fn rejects_blank_usernames() {
        let err = parse_seed(r#"[{"username": "  ", "password": "x"}]"#).expect_err("blank");
        assert!(matches!(err, AccountSeedError::Username(_)));
    }

    #[rstest]
    fn reads_seed_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("accounts.json");
        Dir::open_ambient_dir(dir.path(), ambient_authority())
            .expect("open")
            .write("accounts.json", r#"[{"username": "u1", "password": "foo"}]"#)
            .expect("write");
        let accounts = load_seed(&path).expect("load");
        assert_eq!(accounts[0].username().as_str(), "u1");
    }
}
