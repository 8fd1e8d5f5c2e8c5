use async_trait::async_trait;
use std::fmt;
use crate::types::{SentimentScores, Token};
use crate::Result;

#[async_trait]
pub trait Translator: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Translate `text` from `source` to `target` (ISO 639-1 codes)
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

pub trait SentimentModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Score a piece of text. Must be deterministic for identical input.
    fn polarity_scores(&self, text: &str) -> SentimentScores;
}

pub trait Tokenizer: Send + Sync + fmt::Debug {
    /// Split text into ordered tokens tagged with a part of speech
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn nouns(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(Token::is_noun)
            .map(|t| t.text)
            .collect()
    }
}
