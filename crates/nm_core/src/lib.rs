pub mod error;
pub mod models;
pub mod search;
pub mod storage;
pub mod types;

pub use error::Error;
pub use models::{SentimentModel, Tokenizer, Translator};
pub use search::SearchProvider;
pub use storage::ArticleStore;
pub use types::*;

pub type Result<T> = std::result::Result<T, Error>;
