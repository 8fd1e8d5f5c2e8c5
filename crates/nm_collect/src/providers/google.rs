use async_trait::async_trait;
use nm_core::{Error, Result, SearchHit, SearchProvider, SearchRequest};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://news.google.com";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; news-monitor/0.1)";

/// Google News RSS search.
pub struct GoogleNewsProvider {
    client: Client,
    base_url: String,
    excluded_domains: Vec<String>,
}

impl fmt::Debug for GoogleNewsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleNewsProvider")
            .field("base_url", &self.base_url)
            .field("excluded_domains", &self.excluded_domains)
            .finish()
    }
}

impl GoogleNewsProvider {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            excluded_domains: vec!["youtube.com".to_string(), "facebook.com".to_string()],
        })
    }

    pub fn with_excluded_domains(mut self, domains: Vec<String>) -> Self {
        self.excluded_domains = domains;
        self
    }

    fn search_url(&self, request: &SearchRequest) -> Result<Url> {
        let q = match request.window.days() {
            Some(days) => format!("{} when:{}d", request.query, days),
            None => request.query.clone(),
        };
        Url::parse_with_params(
            &format!("{}/rss/search", self.base_url),
            &[("q", q.as_str()), ("hl", "ko"), ("gl", "KR"), ("ceid", "KR:ko")],
        )
        .map_err(|e| Error::Config(format!("Invalid Google News URL: {}", e)))
    }

    fn is_excluded(&self, source_url: &str) -> bool {
        self.excluded_domains.iter().any(|d| source_url.contains(d.as_str()))
    }

    fn parse_channel(&self, channel: &rss::Channel) -> Vec<SearchHit> {
        channel
            .items()
            .iter()
            .filter_map(|item| {
                let source = item.source();
                if source.map(|s| self.is_excluded(s.url())).unwrap_or(false) {
                    return None;
                }
                Some(SearchHit {
                    title: item.title().unwrap_or_default().to_string(),
                    link: item.link().unwrap_or_default().to_string(),
                    description: item.description().map(str::to_string),
                    published: item.pub_date().map(str::to_string),
                    publisher: source.and_then(|s| s.title()).map(str::to_string),
                })
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for GoogleNewsProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn supports_recency(&self) -> bool {
        true
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let url = self.search_url(request)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Search(format!("Google News returned status {}", status)));
        }

        let content = response.bytes().await?;
        let channel = rss::Channel::read_from(&content[..])
            .map_err(|e| Error::Search(format!("Failed to parse Google News RSS: {}", e)))?;

        let mut hits = self.parse_channel(&channel);
        debug!(query = %request.query, window = %request.window, items = hits.len(), "Google News answered");
        hits.truncate(request.max_results);
        Ok(hits)
    }
}
