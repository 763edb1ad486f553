//! Login credentials.
//!
//! Handlers convert request payloads into [`LoginCredentials`] before they
//! reach the account service, so validation happens once at the edge.

use zeroize::Zeroizing;

use super::{UserValidationError, Username};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing, blank, or too long.
    #[error("invalid username: {0}")]
    Username(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` satisfies [`Username`] validation.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use courseware::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" view@test.com ", "foo").unwrap();
/// assert_eq!(creds.username().as_str(), "view@test.com");
/// assert_eq!(creds.password(), "foo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validated username.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password as supplied.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::Username(UserValidationError::EmptyUsername))]
    #[case("   ", "pw", LoginValidationError::Username(UserValidationError::EmptyUsername))]
    #[case("u1", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("u1", " secret ").expect("valid");
        assert_eq!(creds.password(), " secret ");
    }
}
