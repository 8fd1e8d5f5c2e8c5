use nm_core::{Result, SentimentModel, Tokenizer, Translator};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod keywords;
pub mod sentiment;
pub mod tokenize;
pub mod translate;

pub use keywords::KeywordExtractor;
pub use sentiment::LexiconSentiment;
pub use tokenize::KoreanTokenizer;
pub use translate::{create_translator, TranslatorKind};

/// Settings for the text models used during ingestion.
#[derive(Debug, Clone)]
pub struct Config {
    pub translator: TranslatorKind,
    /// Replaces the embedded sentiment lexicon when set
    pub lexicon_path: Option<PathBuf>,
    pub http_timeout: Duration,
    /// Extra nouns the tokenizer keeps whole
    pub nouns: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translator: TranslatorKind::default(),
            lexicon_path: None,
            http_timeout: Duration::from_secs(30),
            nouns: Vec::new(),
        }
    }
}

pub fn create_sentiment_model(config: &Config) -> Result<Arc<dyn SentimentModel>> {
    let analyzer = match &config.lexicon_path {
        Some(path) => LexiconSentiment::load(path)?,
        None => LexiconSentiment::new(),
    };
    info!("🧠 Sentiment lexicon loaded ({} entries)", analyzer.len());
    Ok(Arc::new(analyzer))
}

pub fn create_tokenizer(config: &Config) -> Arc<dyn Tokenizer> {
    Arc::new(KoreanTokenizer::new().with_nouns(&config.nouns))
}

/// Translator, sentiment model and keyword extractor built from one config.
#[derive(Debug, Clone)]
pub struct Models {
    pub translator: Arc<dyn Translator>,
    pub sentiment: Arc<dyn SentimentModel>,
    pub keywords: KeywordExtractor,
}

impl Models {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            translator: create_translator(config.translator, config.http_timeout)?,
            sentiment: create_sentiment_model(config)?,
            keywords: KeywordExtractor::new(create_tokenizer(config)),
        })
    }
}

pub mod prelude {
    pub use super::{create_sentiment_model, create_tokenizer, create_translator};
    pub use super::{Config, KeywordExtractor, Models, TranslatorKind};
    pub use nm_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_from_default_config() {
        let config = Config {
            translator: TranslatorKind::Identity,
            ..Config::default()
        };
        let models = Models::from_config(&config).unwrap();
        assert_eq!(models.translator.name(), "identity");
        assert_eq!(models.sentiment.name(), "lexicon");
        assert_eq!(models.keywords.top_keywords("난민 난민 지원")[0].keyword, "난민");
    }

    #[test]
    fn test_configured_nouns_reach_the_tokenizer() {
        let config = Config {
            nouns: vec!["코로나".to_string()],
            ..Config::default()
        };
        assert_eq!(create_tokenizer(&config).nouns("코로나 확산"), vec!["코로나", "확산"]);
        assert_eq!(create_tokenizer(&Config::default()).nouns("코로나 확산"), vec!["코로", "확산"]);
    }

    #[test]
    fn test_missing_lexicon_file_is_an_error() {
        let config = Config {
            lexicon_path: Some(PathBuf::from("/nonexistent/lexicon.tsv")),
            ..Config::default()
        };
        assert!(create_sentiment_model(&config).is_err());
    }

    #[test]
    fn test_translator_kind_parse() {
        assert_eq!("google".parse::<TranslatorKind>().unwrap(), TranslatorKind::Google);
        assert_eq!("None".parse::<TranslatorKind>().unwrap(), TranslatorKind::Identity);
        assert!("deepl".parse::<TranslatorKind>().is_err());
    }
}
