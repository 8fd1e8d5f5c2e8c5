use async_trait::async_trait;
use nm_core::{Error, Result, Translator};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// Client for the public Google Translate web endpoint.
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleTranslator {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_url(&self, text: &str, source: &str, target: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/translate_a/single", self.base_url),
            &[
                ("client", "gtx"),
                ("sl", source),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid translator URL: {}", e)))
    }
}

/// The endpoint answers with nested arrays; the first element holds one
/// `[translated, original, ...]` entry per sentence.
fn parse_response(body: &Value) -> Result<String> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| Error::Translation("Unexpected translation response shape".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(Value::as_str))
        .collect();

    if translated.trim().is_empty() {
        return Err(Error::Translation("Translation response was empty".to_string()));
    }
    Ok(translated)
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn name(&self) -> &str {
        "google"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let url = self.request_url(text, source, target)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Translation(format!("Translation request failed with status {}", status)));
        }

        let body: Value = response.json().await?;
        let translated = parse_response(&body)?;
        debug!(source, target, chars = text.chars().count(), "Translated text");
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_joins_sentences() {
        let body = json!([[["Good support. ", "좋은 지원.", null, null, 10], ["Thanks.", "감사.", null, null, 10]], null, "ko"]);
        assert_eq!(parse_response(&body).unwrap(), "Good support. Thanks.");
        assert!(parse_response(&json!({"error": "x"})).is_err());
        assert!(parse_response(&json!([[]])).is_err());
    }

    #[tokio::test]
    async fn test_translate_against_mock_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("sl", "ko"))
            .and(query_param("tl", "en"))
            .and(query_param("q", "심각한 위기"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[["serious crisis", "심각한 위기", null, null, 10]], null, "ko"])))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap();
        let translated = translator.translate("심각한 위기", "ko", "en").await.unwrap();
        assert_eq!(translated, "serious crisis");
    }

    #[tokio::test]
    async fn test_server_error_is_translation_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::with_base_url(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = translator.translate("지원", "ko", "en").await.unwrap_err();
        assert!(matches!(err, Error::Translation(_)));
    }
}
