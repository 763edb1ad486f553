//! Viewer resolution for HTTP handlers.
//!
//! Handlers ask for the current [`Viewer`] here rather than reading the
//! session and account store themselves.

use crate::domain::{Account, Error, Viewer};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// The viewer behind the request's session; anonymous when there is none.
pub async fn current_viewer(state: &HttpState, session: &SessionContext) -> ApiResult<Viewer> {
    let user = session.user_id()?;
    state.accounts.viewer(user).await
}

/// The logged-in account, or `401 Unauthorized`.
pub async fn require_account(state: &HttpState, session: &SessionContext) -> ApiResult<Account> {
    match current_viewer(state, session).await? {
        Viewer::Authenticated(account) => Ok(account),
        Viewer::Anonymous => Err(Error::unauthorized("login required")),
    }
}
