use async_trait::async_trait;
use nm_collect::{FetchPolicy, Fetcher, IngestOptions, IngestOutcome, IngestPipeline, SkipReason};
use nm_core::{
    ArticleStore, Error, RecencyWindow, Result, SearchHit, SearchProvider, SearchRequest, SentimentModel,
    Translator,
};
use nm_inference::{KeywordExtractor, KoreanTokenizer, LexiconSentiment};
use nm_storage::backends::{MemoryStorage, SQLiteStorage};
use std::sync::Arc;
use tempfile::tempdir;

const QUERY: &str = "\"유엔난민기구\" AND (정책 OR 법률 OR 제도 OR 권리 OR 정부)";

/// Knows two phrases and fails on everything else.
#[derive(Debug)]
struct PhraseTranslator;

#[async_trait]
impl Translator for PhraseTranslator {
    fn name(&self) -> &str {
        "phrases"
    }

    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        match text {
            "좋은 지원" => Ok("good support".to_string()),
            "심각한 위기" => Ok("serious crisis".to_string()),
            other => Err(Error::Translation(format!("no translation for {:?}", other))),
        }
    }
}

fn hit(link: &str, title: &str, description: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        link: link.to_string(),
        description: Some(description.to_string()),
        published: Some("Mon, 03 Mar 2025 10:00:00 +0900".to_string()),
        publisher: Some("news.example.com".to_string()),
    }
}

fn pipeline(store: Arc<dyn ArticleStore>, options: IngestOptions) -> IngestPipeline {
    IngestPipeline::new(
        store,
        Arc::new(PhraseTranslator),
        Arc::new(LexiconSentiment::new()),
        KeywordExtractor::new(Arc::new(KoreanTokenizer::new())),
        options,
    )
}

fn compound(text: &str) -> f64 {
    LexiconSentiment::new().polarity_scores(text).compound
}

#[tokio::test]
async fn test_two_new_articles_are_scored_and_stored() {
    let store: Arc<dyn ArticleStore> = Arc::new(MemoryStorage::new());
    let pipeline = pipeline(store.clone(), IngestOptions::default());

    let report = pipeline
        .ingest(
            QUERY,
            vec![
                hit("https://a.example/1", "<b>유엔난민기구</b> 지원", "좋은 지원"),
                hit("https://a.example/2", "난민 위기", "<i>심각한</i> 위기"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.inserted, 2);
    assert_eq!(store.count().await.unwrap(), 2);

    let expected = (compound("good support") + compound("serious crisis")) / 2.0;
    assert!((report.average_sentiment - expected).abs() < 1e-9);
    assert!(compound("good support") > 0.05);
    assert!(compound("serious crisis") < -0.05);

    let records = store.all().await.unwrap();
    assert_eq!(records[0].title, "유엔난민기구 지원");
    assert_eq!(records[0].final_query, QUERY);
    assert_eq!(records[1].description.as_deref(), Some("심각한 위기"));
    assert!(records[1].sentiment_score < 0.0);

    let keywords: Vec<&str> = report.top_keywords.iter().map(|k| k.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["지원", "위기"]);
}

#[tokio::test]
async fn test_reingesting_same_batch_adds_nothing() {
    let temp_dir = tempdir().unwrap();
    let store: Arc<dyn ArticleStore> = Arc::new(SQLiteStorage::new_with_path(&temp_dir.path().join("news.db")).await.unwrap());
    let pipeline = pipeline(store.clone(), IngestOptions::default());
    let batch = || {
        vec![
            hit("https://a.example/1", "첫번째", "좋은 지원"),
            hit("https://a.example/2", "두번째", "심각한 위기"),
        ]
    };

    let first = pipeline.ingest(QUERY, batch()).await.unwrap();
    assert_eq!(first.inserted, 2);

    let second = pipeline.ingest(QUERY, batch()).await.unwrap();
    assert_eq!(second.inserted, 0);
    assert_eq!(second.average_sentiment, 0.0);
    assert!(second.top_keywords.is_empty());
    assert!(second
        .outcomes
        .iter()
        .all(|o| matches!(o, IngestOutcome::Skipped { reason: SkipReason::AlreadyStored, .. })));
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_one_seen_and_one_new_link() {
    let store: Arc<dyn ArticleStore> = Arc::new(MemoryStorage::new());
    let pipeline = pipeline(store.clone(), IngestOptions::default());

    pipeline
        .ingest(QUERY, vec![hit("https://a.example/1", "첫번째", "좋은 지원")])
        .await
        .unwrap();
    let before = store.all().await.unwrap();

    let report = pipeline
        .ingest(
            "다른 검색어",
            vec![
                hit("https://a.example/1", "바뀐 제목", "심각한 위기"),
                hit("https://a.example/3", "세번째", "심각한 위기"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.inserted, 1);
    let after = store.all().await.unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1].link, "https://a.example/3");
}

#[tokio::test]
async fn test_zero_fetched_articles() {
    let store: Arc<dyn ArticleStore> = Arc::new(MemoryStorage::new());
    let report = pipeline(store.clone(), IngestOptions::default())
        .ingest(QUERY, Vec::new())
        .await
        .unwrap();

    assert_eq!(report.fetched, 0);
    assert_eq!(report.inserted, 0);
    assert_eq!(report.average_sentiment, 0.0);
    assert!(report.top_keywords.is_empty());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_bad_items_do_not_abort_the_batch() {
    let store: Arc<dyn ArticleStore> = Arc::new(MemoryStorage::new());
    let report = pipeline(store.clone(), IngestOptions::default())
        .ingest(
            QUERY,
            vec![
                hit("", "링크 없음", "좋은 지원"),
                hit("https://a.example/1", "  ", "좋은 지원"),
                hit("https://a.example/2", "번역 불가", "번역할 수 없는 문장"),
                hit("https://a.example/3", "정상", "좋은 지원"),
                hit("https://a.example/3", "중복", "좋은 지원"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 3);
    assert!(matches!(report.outcomes[0], IngestOutcome::Skipped { reason: SkipReason::MissingLink, .. }));
    assert!(matches!(report.outcomes[1], IngestOutcome::Skipped { reason: SkipReason::MissingTitle, .. }));
    assert!(matches!(report.outcomes[2], IngestOutcome::Failed { .. }));
    assert!(report.outcomes[3].is_added());
    assert!(matches!(report.outcomes[4], IngestOutcome::Skipped { reason: SkipReason::DuplicateInBatch, .. }));
    assert!(!store.contains_link("https://a.example/2").await.unwrap());
}

#[tokio::test]
async fn test_translation_fallback_scores_original_text() {
    let store: Arc<dyn ArticleStore> = Arc::new(MemoryStorage::new());
    let options = IngestOptions {
        translation_fallback: true,
        ..IngestOptions::default()
    };
    let report = pipeline(store.clone(), options)
        .ingest(QUERY, vec![hit("https://a.example/9", "영문 기사", "great relief")])
        .await
        .unwrap();

    assert_eq!(report.inserted, 1);
    assert!(report.average_sentiment > 0.0);
}

/// Empty for the narrow window, two hits once widened.
#[derive(Debug)]
struct WideningProvider;

#[async_trait]
impl SearchProvider for WideningProvider {
    fn name(&self) -> &str {
        "widening"
    }

    fn supports_recency(&self) -> bool {
        true
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        if request.window == RecencyWindow::Week {
            return Ok(Vec::new());
        }
        Ok(vec![
            hit("https://b.example/1", "한달 기사", "좋은 지원"),
            hit("https://b.example/2", "또 다른 기사", "심각한 위기"),
        ])
    }
}

#[tokio::test]
async fn test_widened_fetch_feeds_the_pipeline() {
    let policy = FetchPolicy::immediate(3);
    let fetcher = Fetcher::new(Arc::new(WideningProvider), policy.clone());
    let report = fetcher.fetch(QUERY, 20, RecencyWindow::Week).await;

    assert_eq!(report.hits.len(), 2);
    assert_eq!(report.window, RecencyWindow::Month);
    assert!(report.attempts <= policy.max_attempts);

    let store: Arc<dyn ArticleStore> = Arc::new(MemoryStorage::new());
    let ingested = pipeline(store, IngestOptions::default())
        .ingest(QUERY, report.hits)
        .await
        .unwrap();
    assert_eq!(ingested.inserted, 2);
}
