use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format used for `search_timestamp` in storage and reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An article record that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub search_timestamp: NaiveDateTime,
    pub final_query: String,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub publisher: Option<String>,
    pub sentiment_score: f64,
}

/// A stored article record. `link` is unique across the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: i64,
    pub search_timestamp: NaiveDateTime,
    pub final_query: String,
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub publisher: Option<String>,
    pub sentiment_score: f64,
}

impl ArticleRecord {
    pub fn from_new(id: i64, article: &NewArticle) -> Self {
        Self {
            id,
            search_timestamp: article.search_timestamp,
            final_query: article.final_query.clone(),
            title: article.title.clone(),
            link: article.link.clone(),
            description: article.description.clone(),
            published_date: article.published_date.clone(),
            publisher: article.publisher.clone(),
            sentiment_score: article.sentiment_score,
        }
    }
}

/// One article as returned by a search provider. Title and description may
/// still carry presentation markup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub published: Option<String>,
    pub publisher: Option<String>,
}

/// Time span a search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecencyWindow {
    Week,
    Month,
    Unbounded,
}

impl RecencyWindow {
    pub fn days(&self) -> Option<u32> {
        match self {
            RecencyWindow::Week => Some(7),
            RecencyWindow::Month => Some(30),
            RecencyWindow::Unbounded => None,
        }
    }

    /// Next wider window, or `None` when already unbounded.
    pub fn widen(&self) -> Option<RecencyWindow> {
        match self {
            RecencyWindow::Week => Some(RecencyWindow::Month),
            RecencyWindow::Month => Some(RecencyWindow::Unbounded),
            RecencyWindow::Unbounded => None,
        }
    }
}

impl Default for RecencyWindow {
    fn default() -> Self {
        Self::Week
    }
}

impl fmt::Display for RecencyWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days() {
            Some(days) => write!(f, "{}d", days),
            None => write!(f, "all"),
        }
    }
}

impl FromStr for RecencyWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" | "week" => Ok(RecencyWindow::Week),
            "30d" | "month" => Ok(RecencyWindow::Month),
            "all" | "none" | "unbounded" => Ok(RecencyWindow::Unbounded),
            other => Err(format!("Invalid recency window: {} (expected 7d, 30d or all)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
    pub window: RecencyWindow,
}

/// Output of a sentiment model. `compound` is always within [-1.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.05 {
            SentimentLabel::Positive
        } else if score < -0.05 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Number,
    Foreign,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Normalized form (particles stripped for nouns).
    pub text: String,
    pub pos: PartOfSpeech,
}

impl Token {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech) -> Self {
        Self { text: text.into(), pos }
    }

    pub fn is_noun(&self) -> bool {
        self.pos == PartOfSpeech::Noun
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}
