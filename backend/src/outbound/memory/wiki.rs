//! In-memory `WikiRepository`.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{WikiRepository, WikiRepositoryError};
use crate::domain::{WikiArticle, WikiPath};

use super::POISONED;

/// Wiki articles held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryWikiRepository {
    articles: RwLock<BTreeMap<WikiPath, WikiArticle>>,
}

impl InMemoryWikiRepository {
    /// Create an empty wiki.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WikiRepository for InMemoryWikiRepository {
    async fn find(&self, path: &WikiPath) -> Result<Option<WikiArticle>, WikiRepositoryError> {
        let articles = self
            .articles
            .read()
            .map_err(|_| WikiRepositoryError::backend(POISONED))?;
        Ok(articles.get(path).cloned())
    }

    async fn create_if_missing(
        &self,
        article: WikiArticle,
    ) -> Result<WikiArticle, WikiRepositoryError> {
        let mut articles = self
            .articles
            .write()
            .map_err(|_| WikiRepositoryError::backend(POISONED))?;
        Ok(articles
            .entry(article.path().clone())
            .or_insert(article)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn existing_articles_are_kept() {
        let repo = InMemoryWikiRepository::new();
        let path = WikiPath::parse("toy");
        let first = repo
            .create_if_missing(WikiArticle::new(path.clone(), "Toy"))
            .await
            .expect("create");
        let second = repo
            .create_if_missing(WikiArticle::new(path.clone(), "Renamed"))
            .await
            .expect("create");
        assert_eq!(first, second);
        assert_eq!(second.title(), "Toy");
        assert_eq!(repo.find(&path).await.expect("find"), Some(first));
        assert_eq!(repo.find(&WikiPath::parse("other")).await.expect("find"), None);
    }
}
