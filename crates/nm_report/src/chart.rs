use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Articles collected on one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub count: usize,
    pub mean_sentiment: f64,
}

/// Daily mention counts and mean sentiment, oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChart {
    pub keyword: Option<String>,
    pub days: Vec<DailyStat>,
}

impl TrendChart {
    pub fn title(&self) -> String {
        match &self.keyword {
            Some(keyword) => format!("Daily mentions and sentiment: {}", keyword),
            None => "Daily mentions and sentiment".to_string(),
        }
    }

    pub fn total_articles(&self) -> usize {
        self.days.iter().map(|d| d.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSentiment {
    pub keyword: String,
    pub mean_sentiment: f64,
    /// Records mentioning the keyword
    pub articles: usize,
}

/// Mean sentiment per top keyword, most positive first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordChart {
    pub bars: Vec<KeywordSentiment>,
}

impl KeywordChart {
    pub fn title(&self) -> String {
        "Mean sentiment by keyword".to_string()
    }
}
