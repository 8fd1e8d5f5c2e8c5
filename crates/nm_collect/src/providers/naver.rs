use async_trait::async_trait;
use nm_core::{Error, Result, SearchHit, SearchProvider, SearchRequest};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::NaverCredentials;

const DEFAULT_BASE_URL: &str = "https://openapi.naver.com";
/// The API rejects `display` above this
const MAX_DISPLAY: usize = 100;

#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
struct NaverItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    originallink: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

impl NaverItem {
    fn into_hit(self) -> SearchHit {
        // originallink points at the publisher; link may be a naver.com mirror
        let link = if self.originallink.trim().is_empty() {
            self.link
        } else {
            self.originallink
        };
        let publisher = Url::parse(&link)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()));
        SearchHit {
            title: self.title,
            description: (!self.description.is_empty()).then_some(self.description),
            published: self.pub_date,
            publisher,
            link,
        }
    }
}

/// Naver News Search API (JSON).
pub struct NaverNewsProvider {
    client: Client,
    credentials: NaverCredentials,
    base_url: String,
}

impl fmt::Debug for NaverNewsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaverNewsProvider")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NaverNewsProvider {
    pub fn new(credentials: NaverCredentials, timeout: Duration) -> Result<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(credentials: NaverCredentials, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SearchProvider for NaverNewsProvider {
    fn name(&self) -> &str {
        "naver"
    }

    fn supports_recency(&self) -> bool {
        false
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let display = request.max_results.clamp(1, MAX_DISPLAY).to_string();
        let url = Url::parse_with_params(
            &format!("{}/v1/search/news.json", self.base_url),
            &[
                ("query", request.query.as_str()),
                ("display", display.as_str()),
                ("sort", "date"),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid Naver URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .header("X-Naver-Client-Id", &self.credentials.client_id)
            .header("X-Naver-Client-Secret", &self.credentials.client_secret)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!("Naver search returned {}: {}", status, body.trim())));
        }

        let parsed: NaverResponse = response.json().await?;
        debug!(query = %request.query, items = parsed.items.len(), "Naver search answered");
        Ok(parsed.items.into_iter().map(NaverItem::into_hit).collect())
    }
}
