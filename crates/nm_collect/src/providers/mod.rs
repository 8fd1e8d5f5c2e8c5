use nm_core::{Error, Result, SearchProvider};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub mod google;
pub mod naver;

pub use google::GoogleNewsProvider;
pub use naver::NaverNewsProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Naver,
    Google,
}

impl ProviderKind {
    /// Results requested per search when the operator does not say otherwise
    pub fn default_max_results(&self) -> usize {
        match self {
            ProviderKind::Naver => 20,
            ProviderKind::Google => 100,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Naver => write!(f, "naver"),
            ProviderKind::Google => write!(f, "google"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "naver" => Ok(ProviderKind::Naver),
            "google" => Ok(ProviderKind::Google),
            other => Err(Error::Config(format!("Unknown search provider: {}", other))),
        }
    }
}

#[derive(Clone, Default)]
pub struct NaverCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for NaverCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NaverCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub naver: Option<NaverCredentials>,
    pub timeout: Duration,
}

pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn SearchProvider>> {
    match config.kind {
        ProviderKind::Naver => {
            let credentials = config
                .naver
                .clone()
                .ok_or_else(|| Error::Config("Naver search needs a client id and secret".to_string()))?;
            Ok(Arc::new(NaverNewsProvider::new(credentials, config.timeout)?))
        }
        ProviderKind::Google => Ok(Arc::new(GoogleNewsProvider::new(config.timeout)?)),
    }
}
