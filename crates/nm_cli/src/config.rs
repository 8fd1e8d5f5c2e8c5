use clap::Parser;
use nm_collect::{FetchPolicy, IngestOptions, NaverCredentials, ProviderConfig, ProviderKind, QueryExpansion};
use nm_core::{Error, RecencyWindow, Result};
use nm_inference::TranslatorKind;
use nm_report::ChartFormat;
use nm_storage::StoreKind;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Collect, score and chart news coverage of a topic", long_about = None)]
pub struct Cli {
    /// Search provider: naver or google
    #[arg(long, env = "NM_PROVIDER", default_value = "naver")]
    pub provider: ProviderKind,

    #[arg(long, env = "NAVER_CLIENT_ID", hide_env_values = true)]
    pub naver_client_id: Option<String>,

    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub naver_client_secret: Option<String>,

    /// Article store: sqlite or memory
    #[arg(long, env = "NM_STORAGE", default_value = "sqlite")]
    pub storage: StoreKind,

    #[arg(long, env = "NM_DB", default_value = "news_monitoring.db")]
    pub db: PathBuf,

    /// Results per search (default: 20 for naver, 100 for google)
    #[arg(long, env = "NM_MAX_RESULTS")]
    pub max_results: Option<usize>,

    /// Initial recency window: 7d, 30d or all
    #[arg(long, env = "NM_WINDOW", default_value = "7d")]
    pub window: RecencyWindow,

    #[arg(long, env = "NM_MAX_ATTEMPTS", default_value_t = 3)]
    pub max_attempts: usize,

    /// Backoff step between search attempts
    #[arg(long, env = "NM_BACKOFF_SECS", default_value_t = 2)]
    pub backoff_secs: u64,

    /// Pause after each scored article
    #[arg(long, env = "NM_PAUSE_MS", default_value_t = 500)]
    pub pause_ms: u64,

    /// Score untranslated text when translation fails
    #[arg(long, env = "NM_TRANSLATION_FALLBACK")]
    pub translation_fallback: bool,

    /// Translator: google or identity
    #[arg(long, env = "NM_TRANSLATOR", default_value = "google")]
    pub translator: TranslatorKind,

    /// Replace the built-in sentiment lexicon (token<TAB>valence per line)
    #[arg(long, env = "NM_LEXICON")]
    pub lexicon: Option<PathBuf>,

    /// Chart output: svg or json
    #[arg(long, env = "NM_CHART_FORMAT", default_value = "svg")]
    pub chart_format: ChartFormat,

    #[arg(long, env = "NM_CHART_DIR", default_value = "charts")]
    pub chart_dir: PathBuf,

    #[arg(long, env = "NM_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub provider: ProviderConfig,
    pub storage: StoreKind,
    pub db_path: PathBuf,
    pub max_results: usize,
    pub window: RecencyWindow,
    pub fetch: FetchPolicy,
    pub ingest: IngestOptions,
    pub inference: nm_inference::Config,
    pub chart_format: ChartFormat,
    pub chart_dir: PathBuf,
}

fn credential(value: Option<&str>, name: &str) -> Result<String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() || value.to_uppercase().starts_with("YOUR_") {
        return Err(Error::Config(format!(
            "{} is missing; set it with --{} or the {} environment variable",
            name,
            name.to_lowercase().replace('_', "-"),
            name
        )));
    }
    Ok(value.to_string())
}

impl MonitorConfig {
    pub fn validate(cli: Cli) -> Result<Self> {
        if cli.max_attempts == 0 {
            return Err(Error::Config("--max-attempts must be at least 1".to_string()));
        }
        let max_results = cli.max_results.unwrap_or_else(|| cli.provider.default_max_results());
        if max_results == 0 {
            return Err(Error::Config("--max-results must be at least 1".to_string()));
        }

        let naver = match cli.provider {
            ProviderKind::Naver => Some(NaverCredentials {
                client_id: credential(cli.naver_client_id.as_deref(), "NAVER_CLIENT_ID")?,
                client_secret: credential(cli.naver_client_secret.as_deref(), "NAVER_CLIENT_SECRET")?,
            }),
            ProviderKind::Google => None,
        };

        let http_timeout = Duration::from_secs(cli.http_timeout_secs);
        Ok(Self {
            provider: ProviderConfig {
                kind: cli.provider,
                naver,
                timeout: http_timeout,
            },
            storage: cli.storage,
            db_path: cli.db,
            max_results,
            window: cli.window,
            fetch: FetchPolicy {
                max_attempts: cli.max_attempts,
                backoff_step: Duration::from_secs(cli.backoff_secs),
                ..FetchPolicy::default()
            },
            ingest: IngestOptions {
                translation_fallback: cli.translation_fallback,
                pause: Duration::from_millis(cli.pause_ms),
                ..IngestOptions::default()
            },
            inference: nm_inference::Config {
                translator: cli.translator,
                lexicon_path: cli.lexicon,
                http_timeout,
                nouns: QueryExpansion::default().vocabulary(),
            },
            chart_format: cli.chart_format,
            chart_dir: cli.chart_dir,
        })
    }
}
