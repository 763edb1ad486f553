//! Port for storing accounts and pending activations.

use async_trait::async_trait;

use crate::domain::{Account, ActivationKey, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Failures raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// An account with the username already exists.
        Conflict { username: String } => "account {username} already exists",
        /// The backing store failed.
        Backend { message: String } => "account repository failed: {message}",
    }
}

/// Persistence for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; fails with `Conflict` on a duplicate username.
    async fn insert(&self, account: Account) -> Result<(), AccountRepositoryError>;

    /// Replace an existing account record.
    async fn update(&self, account: Account) -> Result<(), AccountRepositoryError>;

    /// Look an account up by login name.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Look an account up by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, AccountRepositoryError>;

    /// Remember that `key` activates `user`.
    async fn save_activation(
        &self,
        key: &ActivationKey,
        user: UserId,
    ) -> Result<(), AccountRepositoryError>;

    /// Remove and return the account an activation key belongs to.
    async fn take_activation(
        &self,
        key: &ActivationKey,
    ) -> Result<Option<UserId>, AccountRepositoryError>;
}
