use chrono::{Local, NaiveDateTime};
use nm_core::{
    ArticleStore, KeywordCount, NewArticle, Result, SearchHit, SentimentLabel, SentimentModel, Translator,
};
use nm_inference::KeywordExtractor;
use scraper::Html;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub source_lang: String,
    /// Language of the sentiment lexicon
    pub target_lang: String,
    pub max_translate_chars: usize,
    /// Score the untranslated text when translation fails
    pub translation_fallback: bool,
    /// Pause after each scored article
    pub pause: Duration,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            source_lang: "ko".to_string(),
            target_lang: "en".to_string(),
            max_translate_chars: 500,
            translation_fallback: false,
            pause: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingLink,
    MissingTitle,
    AlreadyStored,
    DuplicateInBatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::MissingLink => "missing link",
            SkipReason::MissingTitle => "missing title",
            SkipReason::AlreadyStored => "already stored",
            SkipReason::DuplicateInBatch => "duplicate in batch",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Added { link: String, title: String, score: f64 },
    Skipped { link: String, reason: SkipReason },
    Failed { link: String, reason: String },
}

impl IngestOutcome {
    pub fn link(&self) -> &str {
        match self {
            IngestOutcome::Added { link, .. }
            | IngestOutcome::Skipped { link, .. }
            | IngestOutcome::Failed { link, .. } => link,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, IngestOutcome::Added { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub fetched: usize,
    pub outcomes: Vec<IngestOutcome>,
    /// Rows the store actually gained
    pub inserted: usize,
    /// Mean compound score of the articles scored in this run
    pub average_sentiment: f64,
    pub top_keywords: Vec<KeywordCount>,
}

impl IngestReport {
    pub fn label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.average_sentiment)
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, IngestOutcome::Skipped { .. })).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| matches!(o, IngestOutcome::Failed { .. })).count()
    }
}

/// Text content of an HTML fragment with entities decoded and whitespace
/// collapsed.
pub fn strip_markup(raw: &str) -> String {
    let fragment = Html::parse_fragment(raw);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

pub struct IngestPipeline {
    store: Arc<dyn ArticleStore>,
    translator: Arc<dyn Translator>,
    sentiment: Arc<dyn SentimentModel>,
    keywords: KeywordExtractor,
    options: IngestOptions,
}

impl fmt::Debug for IngestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestPipeline")
            .field("translator", &self.translator.name())
            .field("sentiment", &self.sentiment.name())
            .field("options", &self.options)
            .finish()
    }
}

impl IngestPipeline {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        translator: Arc<dyn Translator>,
        sentiment: Arc<dyn SentimentModel>,
        keywords: KeywordExtractor,
        options: IngestOptions,
    ) -> Self {
        Self { store, translator, sentiment, keywords, options }
    }

    async fn score(&self, text: &str) -> std::result::Result<f64, String> {
        let excerpt = truncate_chars(text, self.options.max_translate_chars);
        let translated = match self
            .translator
            .translate(excerpt, &self.options.source_lang, &self.options.target_lang)
            .await
        {
            Ok(translated) => translated,
            Err(e) if self.options.translation_fallback => {
                warn!(error = %e, "Translation failed; scoring the original text");
                excerpt.to_string()
            }
            Err(e) => return Err(e.to_string()),
        };
        Ok(self.sentiment.polarity_scores(&translated).compound)
    }

    /// Score and store every hit whose link is not stored yet. Per-article
    /// failures become `Failed` outcomes; store errors abort the run.
    pub async fn ingest(&self, final_query: &str, hits: Vec<SearchHit>) -> Result<IngestReport> {
        let search_timestamp: NaiveDateTime = Local::now().naive_local();
        let fetched = hits.len();
        let mut outcomes = Vec::with_capacity(fetched);
        let mut records: Vec<NewArticle> = Vec::new();
        let mut scores: Vec<f64> = Vec::new();
        let mut buffer: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        info!("📥 Ingesting {} articles for {:?}", fetched, final_query);

        for hit in hits {
            let link = hit.link.trim().to_string();
            if link.is_empty() {
                outcomes.push(IngestOutcome::Skipped { link, reason: SkipReason::MissingLink });
                continue;
            }
            let title = strip_markup(&hit.title);
            if title.is_empty() {
                outcomes.push(IngestOutcome::Skipped { link, reason: SkipReason::MissingTitle });
                continue;
            }
            if seen.contains(&link) {
                outcomes.push(IngestOutcome::Skipped { link, reason: SkipReason::DuplicateInBatch });
                continue;
            }
            if self.store.contains_link(&link).await? {
                debug!(link = %link, "Already stored");
                seen.insert(link.clone());
                outcomes.push(IngestOutcome::Skipped { link, reason: SkipReason::AlreadyStored });
                continue;
            }
            seen.insert(link.clone());

            let description = hit.description.as_deref().map(strip_markup).filter(|d| !d.is_empty());
            let text = description.clone().unwrap_or_else(|| title.clone());

            let score = match self.score(&text).await {
                Ok(score) => score,
                Err(reason) => {
                    warn!(link = %link, %reason, "Skipping article");
                    outcomes.push(IngestOutcome::Failed { link, reason });
                    continue;
                }
            };
            debug!(link = %link, score, "Scored article");

            buffer.push(text);
            scores.push(score);
            records.push(NewArticle {
                search_timestamp,
                final_query: final_query.to_string(),
                title: title.clone(),
                link: link.clone(),
                description,
                published_date: hit.published,
                publisher: hit.publisher,
                sentiment_score: score,
            });
            outcomes.push(IngestOutcome::Added { link, title, score });

            if !self.options.pause.is_zero() {
                sleep(self.options.pause).await;
            }
        }

        let inserted = if records.is_empty() {
            0
        } else {
            self.store.insert_batch(&records).await?
        };
        if inserted < records.len() {
            warn!("{} articles were stored concurrently and not inserted", records.len() - inserted);
        }

        let average_sentiment = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        let top_keywords = if buffer.is_empty() {
            Vec::new()
        } else {
            self.keywords.top_keywords(&buffer.join("\n"))
        };

        info!("💾 {} new articles saved ({} fetched)", inserted, fetched);
        Ok(IngestReport {
            fetched,
            outcomes,
            inserted,
            average_sentiment,
            top_keywords,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<b>유엔난민기구</b> 긴급&quot;구호&quot;"), "유엔난민기구 긴급\"구호\"");
        assert_eq!(strip_markup("  plain   text "), "plain text");
        assert_eq!(strip_markup("<a href=\"https://x\">링크</a>&amp;"), "링크&");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("난민지원", 2), "난민");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_report_label() {
        let report = IngestReport {
            fetched: 0,
            outcomes: vec![IngestOutcome::Skipped { link: String::new(), reason: SkipReason::MissingLink }],
            inserted: 0,
            average_sentiment: -0.2,
            top_keywords: Vec::new(),
        };
        assert_eq!(report.label(), SentimentLabel::Negative);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(SkipReason::AlreadyStored.to_string(), "already stored");
    }
}
