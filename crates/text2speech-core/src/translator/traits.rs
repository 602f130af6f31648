use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Lang;
use crate::error::Result;

/// Information about a translator backend
#[derive(Debug, Clone)]
pub struct TranslatorInfo {
    /// Human-readable name
    pub name: &'static str,
}

/// Trait for general-purpose translation services
#[async_trait]
pub trait Translator: Send + Sync {
    /// Get information about this translator
    fn info(&self) -> TranslatorInfo;

    /// Get the translator name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate text from source language to target language
    async fn translate(
        &self,
        text: &str,
        source: &Lang,
        target: &Lang,
    ) -> Result<String>;
}

/// A model that translates one fixed language pair.
#[async_trait]
pub trait PairwiseModel: Send + Sync {
    /// Model identifier, e.g. `Helsinki-NLP/opus-mt-en-fr`
    fn id(&self) -> &str;

    /// Run inference on `text`
    async fn generate(&self, text: &str) -> Result<String>;
}

/// Lookup of pairwise models by language pair.
///
/// A pair without a model is reported as `Error::BackendUnavailable`.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    async fn acquire(&self, source: &Lang, target: &Lang) -> Result<Arc<dyn PairwiseModel>>;
}
