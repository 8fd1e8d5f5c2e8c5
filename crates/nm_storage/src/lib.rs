use async_trait::async_trait;
use nm_core::{ArticleStore, Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn get_error_message() -> &'static str;
    async fn open(path: &Path) -> Result<Self> where Self: Sized;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    Memory,
}

impl Default for StoreKind {
    fn default() -> Self {
        Self::Sqlite
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Sqlite => f.write_str("sqlite"),
            StoreKind::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

async fn open_backend<T: StorageBackend + ArticleStore + 'static>(path: &Path) -> Result<Arc<dyn ArticleStore>> {
    match T::open(path).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(e) => Err(Error::Storage(format!("{} ({})", e, T::get_error_message()))),
    }
}

/// Open the configured article store. The path is ignored by the memory backend.
pub async fn create_store(kind: StoreKind, path: &Path) -> Result<Arc<dyn ArticleStore>> {
    let store = match kind {
        StoreKind::Sqlite => open_backend::<SQLiteStorage>(path).await?,
        StoreKind::Memory => open_backend::<MemoryStorage>(path).await?,
    };
    let count = store.count().await?;
    info!("💾 Article store ready ({}, {} records)", kind, count);
    Ok(store)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_store, StorageBackend, StoreKind};
}
