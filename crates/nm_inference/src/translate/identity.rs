use async_trait::async_trait;
use nm_core::{Result, Translator};

/// Returns its input unchanged. Useful when the source text is already in
/// the sentiment lexicon's language.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

#[async_trait]
impl Translator for IdentityTranslator {
    fn name(&self) -> &str {
        "identity"
    }

    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String> {
        Ok(text.to_string())
    }
}
