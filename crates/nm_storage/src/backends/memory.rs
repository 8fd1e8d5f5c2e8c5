use async_trait::async_trait;
use nm_core::{ArticleRecord, ArticleStore, NewArticle, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

pub struct MemoryStore {
    records: Vec<ArticleRecord>,
    links: HashSet<String>,
    next_id: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            links: HashSet::new(),
            next_id: 1,
        }
    }

    pub fn insert(&mut self, article: &NewArticle) -> bool {
        if !self.links.insert(article.link.clone()) {
            return false;
        }
        self.records.push(ArticleRecord::from_new(self.next_id, article));
        self.next_id += 1;
        true
    }

    pub fn contains_link(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }
}

/// Process-local store, used for dry runs and tests.
pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn open(_path: &Path) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStore for MemoryStorage {
    async fn contains_link(&self, link: &str) -> Result<bool> {
        Ok(self.store.read().await.contains_link(link))
    }

    async fn insert_batch(&self, articles: &[NewArticle]) -> Result<usize> {
        let mut store = self.store.write().await;
        Ok(articles.iter().filter(|a| store.insert(a)).count())
    }

    async fn all(&self) -> Result<Vec<ArticleRecord>> {
        Ok(self.store.read().await.records().to_vec())
    }

    async fn with_title_containing(&self, keyword: &str) -> Result<Vec<ArticleRecord>> {
        let needle = keyword.to_lowercase();
        Ok(self.store.read().await.records()
            .iter()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.store.read().await.records().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(link: &str, title: &str) -> NewArticle {
        NewArticle {
            search_timestamp: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            final_query: "유엔난민기구".to_string(),
            title: title.to_string(),
            link: link.to_string(),
            description: None,
            published_date: None,
            publisher: None,
            sentiment_score: 0.1,
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        let inserted = storage
            .insert_batch(&[article("http://a.com/1", "First"), article("http://a.com/2", "Second")])
            .await
            .unwrap();
        assert_eq!(inserted, 2);
        assert!(storage.contains_link("http://a.com/1").await.unwrap());
        assert!(!storage.contains_link("http://a.com/3").await.unwrap());

        // same link again is ignored
        assert!(!storage.insert(&article("http://a.com/1", "Changed")).await.unwrap());
        let all = storage.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "First");
        assert_eq!(all[1].id, 2);
    }

    #[test]
    fn test_default_store_numbers_from_one() {
        let mut store = MemoryStore::default();
        assert!(store.insert(&article("http://a.com/1", "First")));
        assert!(!store.insert(&article("http://a.com/1", "Again")));
        assert!(store.insert(&article("http://a.com/2", "Second")));
        let ids: Vec<i64> = store.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_title_filter_ignores_case() {
        let storage = MemoryStorage::new();
        storage
            .insert_batch(&[article("http://a.com/1", "UNHCR appeal"), article("http://a.com/2", "Other news")])
            .await
            .unwrap();
        let matches = storage.with_title_containing("unhcr").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].link, "http://a.com/1");
    }
}
