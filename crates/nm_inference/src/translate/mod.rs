use nm_core::{Error, Result, Translator};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub mod google;
pub mod identity;

pub use google::GoogleTranslator;
pub use identity::IdentityTranslator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslatorKind {
    #[default]
    Google,
    Identity,
}

impl FromStr for TranslatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(TranslatorKind::Google),
            "identity" | "none" => Ok(TranslatorKind::Identity),
            other => Err(Error::Config(format!("Unknown translator: {}", other))),
        }
    }
}

pub fn create_translator(kind: TranslatorKind, timeout: Duration) -> Result<Arc<dyn Translator>> {
    match kind {
        TranslatorKind::Google => Ok(Arc::new(GoogleTranslator::new(timeout)?)),
        TranslatorKind::Identity => Ok(Arc::new(IdentityTranslator)),
    }
}
