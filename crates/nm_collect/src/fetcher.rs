//! Search with bounded retries.
//!
//! Two ladders share one attempt budget. An empty result widens the recency
//! window one step (7d, 30d, unbounded); a provider error keeps the window
//! and tries again. Every retry waits `backoff_step * attempts_so_far`.

use nm_core::{RecencyWindow, SearchHit, SearchProvider, SearchRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct FetchPolicy {
    pub max_attempts: usize,
    pub backoff_step: Duration,
    /// Pause between candidates while probing
    pub probe_pause: Duration,
    pub probe_results: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(2),
            probe_pause: Duration::from_secs(1),
            probe_results: 20,
        }
    }
}

impl FetchPolicy {
    /// No sleeping at all
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            backoff_step: Duration::ZERO,
            probe_pause: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub hits: Vec<SearchHit>,
    /// Provider calls made
    pub attempts: usize,
    /// Window of the last call
    pub window: RecencyWindow,
}

impl FetchReport {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Fetcher {
    provider: Arc<dyn SearchProvider>,
    policy: FetchPolicy,
}

impl Fetcher {
    pub fn new(provider: Arc<dyn SearchProvider>, policy: FetchPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn provider(&self) -> &Arc<dyn SearchProvider> {
        &self.provider
    }

    /// Fetch up to `max_results` hits for `query`. Running out of attempts
    /// yields an empty report rather than an error.
    pub async fn fetch(&self, query: &str, max_results: usize, window: RecencyWindow) -> FetchReport {
        let mut window = window;
        let mut attempts = 0;

        while attempts < self.policy.max_attempts {
            if attempts > 0 {
                sleep(self.policy.backoff_step * attempts as u32).await;
            }
            attempts += 1;

            let request = SearchRequest {
                query: query.to_string(),
                max_results,
                window,
            };
            info!("🔎 Searching {} for {:?} (window {}, attempt {}/{})",
                self.provider.name(), query, window, attempts, self.policy.max_attempts);

            match self.provider.search(&request).await {
                Ok(hits) if !hits.is_empty() => {
                    info!("📰 {} articles found", hits.len());
                    return FetchReport { hits, attempts, window };
                }
                Ok(_) => {
                    let budget_left = attempts < self.policy.max_attempts;
                    let wider = if budget_left && self.provider.supports_recency() { window.widen() } else { None };
                    match wider {
                        Some(next) => {
                            info!("📭 No results in {}, widening to {}", window, next);
                            window = next;
                        }
                        None => {
                            info!("📭 No results found for {:?}", query);
                            break;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, attempt = attempts, "Search request failed");
                }
            }
        }

        FetchReport { hits: Vec::new(), attempts, window }
    }

    /// Fetch each candidate once and rank them by hit count, highest first.
    /// Equal counts keep candidate order. Failed candidates count as zero.
    pub async fn probe(&self, candidates: &[String], window: RecencyWindow) -> Vec<(String, usize)> {
        let mut ranked = Vec::with_capacity(candidates.len());

        for (i, candidate) in candidates.iter().enumerate() {
            if i > 0 && !self.policy.probe_pause.is_zero() {
                sleep(self.policy.probe_pause).await;
            }
            let request = SearchRequest {
                query: candidate.clone(),
                max_results: self.policy.probe_results,
                window,
            };
            let count = match self.provider.search(&request).await {
                Ok(hits) => hits.len(),
                Err(e) => {
                    warn!(error = %e, query = %candidate, "Probe search failed");
                    0
                }
            };
            info!("🧪 {:?}: {} results", candidate, count);
            ranked.push((candidate.clone(), count));
        }

        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nm_core::{Error, Result};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays scripted answers and records each request's window.
    #[derive(Debug)]
    struct Scripted {
        answers: Mutex<VecDeque<Result<usize>>>,
        windows: Mutex<Vec<RecencyWindow>>,
        called_at: Mutex<Vec<Instant>>,
        recency: bool,
    }

    impl Scripted {
        fn new(answers: Vec<Result<usize>>, recency: bool) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                windows: Mutex::new(Vec::new()),
                called_at: Mutex::new(Vec::new()),
                recency,
            })
        }

        fn windows(&self) -> Vec<RecencyWindow> {
            self.windows.lock().unwrap().clone()
        }
    }

    fn hits(n: usize) -> Vec<SearchHit> {
        (0..n)
            .map(|i| SearchHit {
                title: format!("title {}", i),
                link: format!("https://example.com/{}", i),
                ..SearchHit::default()
            })
            .collect()
    }

    #[async_trait]
    impl SearchProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn supports_recency(&self) -> bool {
            self.recency
        }

        async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
            self.windows.lock().unwrap().push(request.window);
            self.called_at.lock().unwrap().push(Instant::now());
            let answer = self.answers.lock().unwrap().pop_front();
            match answer {
                Some(Ok(n)) => Ok(hits(n)),
                Some(Err(e)) => Err(e),
                None => Ok(Vec::new()),
            }
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success() {
        let provider = Scripted::new(vec![Ok(3)], true);
        let fetcher = Fetcher::new(provider.clone(), FetchPolicy::immediate(3));
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert_eq!(report.hits.len(), 3);
        assert_eq!(report.attempts, 1);
        assert_eq!(provider.windows(), vec![RecencyWindow::Week]);
    }

    #[tokio::test]
    async fn test_empty_results_widen_the_window() {
        let provider = Scripted::new(vec![Ok(0), Ok(2)], true);
        let fetcher = Fetcher::new(provider.clone(), FetchPolicy::immediate(3));
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert_eq!(report.hits.len(), 2);
        assert_eq!(report.attempts, 2);
        assert_eq!(report.window, RecencyWindow::Month);
        assert_eq!(provider.windows(), vec![RecencyWindow::Week, RecencyWindow::Month]);
    }

    #[tokio::test]
    async fn test_gives_up_when_window_cannot_widen() {
        let provider = Scripted::new(vec![Ok(0), Ok(0), Ok(0)], true);
        let fetcher = Fetcher::new(provider.clone(), FetchPolicy::immediate(5));
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert!(report.is_empty());
        assert_eq!(report.attempts, 3);
        assert_eq!(report.window, RecencyWindow::Unbounded);
    }

    #[tokio::test]
    async fn test_no_widening_without_recency_support() {
        let provider = Scripted::new(vec![Ok(0), Ok(4)], false);
        let fetcher = Fetcher::new(provider.clone(), FetchPolicy::immediate(3));
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert!(report.is_empty());
        assert_eq!(report.attempts, 1);
    }

    #[tokio::test]
    async fn test_errors_retry_same_window_within_budget() {
        let provider = Scripted::new(
            vec![Err(Error::Search("boom".into())), Err(Error::Search("boom".into())), Ok(1)],
            true,
        );
        let fetcher = Fetcher::new(provider.clone(), FetchPolicy::immediate(3));
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.attempts, 3);
        assert_eq!(provider.windows(), vec![RecencyWindow::Week; 3]);

        let fetcher = Fetcher::new(Scripted::new(vec![Ok(1)], true), FetchPolicy::immediate(0));
        assert_eq!(fetcher.fetch("q", 10, RecencyWindow::Week).await.attempts, 0);
    }

    #[tokio::test]
    async fn test_budget_is_shared_between_ladders() {
        let provider = Scripted::new(vec![Err(Error::Search("boom".into())), Ok(0), Ok(5)], true);
        let fetcher = Fetcher::new(provider.clone(), FetchPolicy::immediate(2));
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert!(report.is_empty());
        assert_eq!(report.attempts, 2);
        assert_eq!(report.window, RecencyWindow::Week);
    }

    #[tokio::test]
    async fn test_last_attempt_does_not_widen() {
        let provider = Scripted::new(vec![Ok(0), Ok(0)], true);
        let fetcher = Fetcher::new(provider.clone(), FetchPolicy::immediate(2));
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert!(report.is_empty());
        assert_eq!(report.attempts, 2);
        assert_eq!(report.window, RecencyWindow::Month);
        assert_eq!(provider.windows(), vec![RecencyWindow::Week, RecencyWindow::Month]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_grows_with_each_attempt() {
        let step = Duration::from_millis(50);
        let provider = Scripted::new(Vec::new(), true);
        let policy = FetchPolicy {
            backoff_step: step,
            ..FetchPolicy::immediate(3)
        };
        let fetcher = Fetcher::new(provider.clone(), policy);

        let started = Instant::now();
        let report = fetcher.fetch("q", 10, RecencyWindow::Week).await;
        assert!(report.is_empty());
        assert_eq!(report.attempts, 3);

        let called_at = provider.called_at.lock().unwrap().clone();
        assert_eq!(called_at.len(), 3);
        assert_eq!(called_at[0] - started, Duration::ZERO);
        assert_eq!(called_at[1] - called_at[0], step);
        assert_eq!(called_at[2] - called_at[1], step * 2);
        assert_eq!(started.elapsed(), step * 3);
    }

    #[tokio::test]
    async fn test_probe_ranks_candidates() {
        let provider = Scripted::new(vec![Ok(2), Err(Error::Search("boom".into())), Ok(5), Ok(2)], true);
        let fetcher = Fetcher::new(provider, FetchPolicy::immediate(3));
        let candidates: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let ranked = fetcher.probe(&candidates, RecencyWindow::Week).await;
        assert_eq!(
            ranked,
            vec![("c".to_string(), 5), ("a".to_string(), 2), ("d".to_string(), 2), ("b".to_string(), 0)]
        );
    }
}
