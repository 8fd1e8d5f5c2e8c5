use async_trait::async_trait;
use crate::types::{ArticleRecord, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Whether a record with this link is already stored
    async fn contains_link(&self, link: &str) -> Result<bool>;

    /// Insert every record whose link is not stored yet, in one atomic unit.
    /// Returns how many rows were added.
    async fn insert_batch(&self, articles: &[NewArticle]) -> Result<usize>;

    /// Insert a single record if its link is absent
    async fn insert(&self, article: &NewArticle) -> Result<bool> {
        Ok(self.insert_batch(std::slice::from_ref(article)).await? == 1)
    }

    /// All records, oldest first
    async fn all(&self) -> Result<Vec<ArticleRecord>>;

    /// Records whose title contains `keyword` (case-insensitive), oldest first
    async fn with_title_containing(&self, keyword: &str) -> Result<Vec<ArticleRecord>>;

    async fn count(&self) -> Result<usize>;
}
