use async_trait::async_trait;
use chrono::NaiveDateTime;
use nm_core::{ArticleRecord, ArticleStore, Error, NewArticle, Result, TIMESTAMP_FORMAT};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::StorageBackend;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        search_timestamp TEXT NOT NULL,
        final_query TEXT NOT NULL,
        title TEXT NOT NULL,
        description TEXT,
        link TEXT NOT NULL UNIQUE,
        published_date TEXT,
        sentiment_score REAL NOT NULL,
        publisher TEXT
    )
    "#,
    // Add future migrations here
];

const SELECT_COLUMNS: &str = "SELECT id, search_timestamp, final_query, title, description, link, \
     published_date, sentiment_score, publisher FROM articles";

fn db_error(context: &str, e: sqlx::Error) -> Error {
    Error::Storage(format!("{}: {}", context, e))
}

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database path should be writable"
    }

    async fn open(path: &Path) -> Result<Self> {
        Self::new_with_path(path).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        // one connection: every unit of work acquires and releases it in turn
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| db_error(&format!("Failed to run migration {}", i), e))?;
        }

        Ok(Self {
            pool,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    fn row_to_record(row: &SqliteRow) -> Result<ArticleRecord> {
        let timestamp: String = row.try_get("search_timestamp")
            .map_err(|e| db_error("Failed to read search_timestamp", e))?;
        let search_timestamp = NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| Error::Storage(format!("Failed to parse timestamp {:?}: {}", timestamp, e)))?;

        Ok(ArticleRecord {
            id: row.try_get("id").map_err(|e| db_error("Failed to read id", e))?,
            search_timestamp,
            final_query: row.try_get("final_query").map_err(|e| db_error("Failed to read final_query", e))?,
            title: row.try_get("title").map_err(|e| db_error("Failed to read title", e))?,
            link: row.try_get("link").map_err(|e| db_error("Failed to read link", e))?,
            description: row.try_get("description").map_err(|e| db_error("Failed to read description", e))?,
            published_date: row.try_get("published_date").map_err(|e| db_error("Failed to read published_date", e))?,
            publisher: row.try_get("publisher").map_err(|e| db_error("Failed to read publisher", e))?,
            sentiment_score: row.try_get("sentiment_score").map_err(|e| db_error("Failed to read sentiment_score", e))?,
        })
    }
}

#[async_trait]
impl ArticleStore for SQLiteStorage {
    async fn contains_link(&self, link: &str) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM articles WHERE link = ?")
            .bind(link)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to look up link", e))?;
        Ok(row.is_some())
    }

    async fn insert_batch(&self, articles: &[NewArticle]) -> Result<usize> {
        let mut tx = self.pool.begin().await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let mut inserted = 0usize;
        for article in articles {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO articles
                (search_timestamp, final_query, title, description, link, published_date, sentiment_score, publisher)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(article.search_timestamp.format(TIMESTAMP_FORMAT).to_string())
            .bind(&article.final_query)
            .bind(&article.title)
            .bind(article.description.as_deref())
            .bind(&article.link)
            .bind(article.published_date.as_deref())
            .bind(article.sentiment_score)
            .bind(article.publisher.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to store article", e))?;

            if result.rows_affected() == 0 {
                debug!(link = %article.link, "Link already stored; ignored");
            }
            inserted += result.rows_affected() as usize;
        }

        tx.commit().await.map_err(|e| db_error("Failed to commit articles", e))?;
        Ok(inserted)
    }

    async fn all(&self) -> Result<Vec<ArticleRecord>> {
        let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to read articles", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn with_title_containing(&self, keyword: &str) -> Result<Vec<ArticleRecord>> {
        let rows = sqlx::query(&format!(
            "{} WHERE instr(lower(title), lower(?)) > 0 ORDER BY id",
            SELECT_COLUMNS
        ))
        .bind(keyword)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to filter articles", e))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn count(&self) -> Result<usize> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count articles", e))?;
        Ok(total as usize)
    }
}
