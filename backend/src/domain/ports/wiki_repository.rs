//! Port for wiki articles.

use async_trait::async_trait;

use crate::domain::{WikiArticle, WikiPath};

use super::define_port_error;

define_port_error! {
    /// Failures raised by wiki adapters.
    pub enum WikiRepositoryError {
        /// The backing store failed.
        Backend { message: String } => "wiki repository failed: {message}",
    }
}

/// Persistence for wiki articles keyed by path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WikiRepository: Send + Sync {
    /// Fetch the article at `path`.
    async fn find(&self, path: &WikiPath) -> Result<Option<WikiArticle>, WikiRepositoryError>;

    /// Store `article` unless one already exists at its path, returning the
    /// stored article either way.
    async fn create_if_missing(
        &self,
        article: WikiArticle,
    ) -> Result<WikiArticle, WikiRepositoryError>;
}
