use async_trait::async_trait;
use std::fmt;
use crate::types::{SearchHit, SearchRequest};
use crate::Result;

#[async_trait]
pub trait SearchProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Whether the provider honours `SearchRequest::window`
    fn supports_recency(&self) -> bool;

    /// Run one search. Zero results is `Ok(vec![])`, never an error.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>>;
}
