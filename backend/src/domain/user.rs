//! Learner and staff accounts.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::access::Capabilities;

/// Validation errors for account identity fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`] characters.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
}

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 64;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An account known to the service.
///
/// ## Invariants
/// - `password_digest` is the hex digest produced by
///   [`crate::domain::accounts::password_digest`], never the raw password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: UserId,
    username: Username,
    password_digest: String,
    is_staff: bool,
    is_active: bool,
    capabilities: Capabilities,
}

impl Account {
    /// Create an inactive, non-staff account with no group memberships.
    pub fn new(id: UserId, username: Username, password_digest: impl Into<String>) -> Self {
        Self {
            id,
            username,
            password_digest: password_digest.into(),
            is_staff: false,
            is_active: false,
            capabilities: Capabilities::default(),
        }
    }

    /// Mark the account as global staff.
    #[must_use]
    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    /// Set whether the account may log in.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Replace the account's group memberships.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Account identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored password digest.
    #[must_use]
    pub fn password_digest(&self) -> &str {
        &self.password_digest
    }

    /// Global administrator flag.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }

    /// Whether the account has been activated.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Group memberships.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_values(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn user_id_round_trips_through_strings() {
        let id = UserId::random();
        assert_eq!(UserId::new(id.to_string()), Ok(id));
    }

    #[rstest]
    #[case("  view@test.com ", "view@test.com")]
    #[case("u1", "u1")]
    fn username_is_trimmed(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(Username::new(raw).expect("valid").as_str(), expected);
    }

    #[rstest]
    fn username_rejects_blank_and_long_values() {
        assert_eq!(Username::new("   "), Err(UserValidationError::EmptyUsername));
        let long = "x".repeat(USERNAME_MAX + 1);
        assert_eq!(
            Username::new(long),
            Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
        );
    }

    #[rstest]
    fn new_accounts_are_inactive_learners() {
        let account = Account::new(
            UserId::random(),
            Username::new("u1").expect("valid"),
            "digest",
        );
        assert!(!account.is_active());
        assert!(!account.is_staff());
        assert!(account.capabilities().is_empty());
    }
}
