//! In-memory `AccountRepository`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{Account, ActivationKey, UserId, Username};

use super::POISONED;

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<UserId, Account>,
    activations: HashMap<String, UserId>,
}

/// Account store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    state: RwLock<State>,
}

impl InMemoryAccountRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: Account) -> Result<(), AccountRepositoryError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| AccountRepositoryError::backend(POISONED))?;
        if state
            .accounts
            .values()
            .any(|existing| existing.username() == account.username())
        {
            return Err(AccountRepositoryError::conflict(account.username().as_str()));
        }
        state.accounts.insert(account.id(), account);
        Ok(())
    }

    async fn update(&self, account: Account) -> Result<(), AccountRepositoryError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| AccountRepositoryError::backend(POISONED))?;
        match state.accounts.get_mut(&account.id()) {
            Some(slot) => {
                *slot = account;
                Ok(())
            }
            None => Err(AccountRepositoryError::backend(format!(
                "no account with id {}",
                account.id()
            ))),
        }
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self
            .state
            .read()
            .map_err(|_| AccountRepositoryError::backend(POISONED))?;
        Ok(state
            .accounts
            .values()
            .find(|account| account.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let state = self
            .state
            .read()
            .map_err(|_| AccountRepositoryError::backend(POISONED))?;
        Ok(state.accounts.get(&id).cloned())
    }

    async fn save_activation(
        &self,
        key: &ActivationKey,
        user: UserId,
    ) -> Result<(), AccountRepositoryError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| AccountRepositoryError::backend(POISONED))?;
        state.activations.insert(key.as_str().to_owned(), user);
        Ok(())
    }

    async fn take_activation(
        &self,
        key: &ActivationKey,
    ) -> Result<Option<UserId>, AccountRepositoryError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| AccountRepositoryError::backend(POISONED))?;
        Ok(state.activations.remove(key.as_str()))
    }
}
