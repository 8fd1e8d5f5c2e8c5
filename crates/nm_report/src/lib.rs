use chrono::NaiveDate;
use nm_core::{ArticleRecord, ArticleStore, Result};
use nm_inference::KeywordExtractor;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

pub mod chart;
pub mod render;

pub use chart::{DailyStat, KeywordChart, KeywordSentiment, TrendChart};
pub use render::{create_renderer, ChartFormat, ChartRenderer, JsonRenderer, SvgRenderer};

/// Aggregates stored articles into chart series.
pub struct Reporter {
    store: Arc<dyn ArticleStore>,
    keywords: KeywordExtractor,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("keywords", &self.keywords)
            .finish()
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn mentions(record: &ArticleRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record
            .description
            .as_deref()
            .map(|d| d.to_lowercase().contains(needle))
            .unwrap_or(false)
}

impl Reporter {
    pub fn new(store: Arc<dyn ArticleStore>, keywords: KeywordExtractor) -> Self {
        Self { store, keywords }
    }

    /// Per-day count and mean sentiment, optionally limited to titles
    /// containing `keyword`. `None` when there is nothing to plot.
    pub async fn trend(&self, keyword: Option<&str>) -> Result<Option<TrendChart>> {
        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let records = match keyword {
            Some(k) => self.store.with_title_containing(k).await?,
            None => self.store.all().await?,
        };
        if records.is_empty() {
            info!("📭 No stored articles to chart");
            return Ok(None);
        }

        let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for record in &records {
            by_day
                .entry(record.search_timestamp.date())
                .or_default()
                .push(record.sentiment_score);
        }

        let days = by_day
            .into_iter()
            .map(|(date, scores)| DailyStat {
                date,
                count: scores.len(),
                mean_sentiment: mean(scores.into_iter()),
            })
            .collect::<Vec<_>>();
        info!("📈 Trend over {} days from {} articles", days.len(), records.len());

        Ok(Some(TrendChart {
            keyword: keyword.map(str::to_string),
            days,
        }))
    }

    /// Mean sentiment of the articles mentioning each of the store's top
    /// keywords. `None` when the store is empty or yields no keywords.
    pub async fn keyword_sentiment(&self) -> Result<Option<KeywordChart>> {
        let records = self.store.all().await?;
        if records.is_empty() {
            info!("📭 No stored articles to chart");
            return Ok(None);
        }

        let text = records
            .iter()
            .map(|r| match &r.description {
                Some(d) => format!("{} {}", r.title, d),
                None => r.title.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n");
        let top = self.keywords.top_keywords(&text);
        if top.is_empty() {
            info!("📭 No keywords found in stored articles");
            return Ok(None);
        }

        let mut bars: Vec<KeywordSentiment> = top
            .into_iter()
            .filter_map(|k| {
                let needle = k.keyword.to_lowercase();
                let scores: Vec<f64> = records
                    .iter()
                    .filter(|r| mentions(r, &needle))
                    .map(|r| r.sentiment_score)
                    .collect();
                // a keyword can come from a particle-stripped form that never appears verbatim
                (!scores.is_empty()).then(|| KeywordSentiment {
                    articles: scores.len(),
                    mean_sentiment: mean(scores.into_iter()),
                    keyword: k.keyword,
                })
            })
            .collect();
        if bars.is_empty() {
            return Ok(None);
        }
        bars.sort_by(|a, b| b.mean_sentiment.total_cmp(&a.mean_sentiment));

        Ok(Some(KeywordChart { bars }))
    }
}
