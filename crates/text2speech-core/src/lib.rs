//! Text2Speech Core Library
//!
//! This library provides the core functionality for speaking translated text:
//! - Source language detection
//! - Translation via pairwise neural models (direct or chained through a
//!   pivot language) with fallback to a generic translation service
//! - Speech synthesis of the translated text

pub mod config;
pub mod detect;
pub mod error;
mod http;
pub mod language;
pub mod speech;
pub mod translator;
pub mod util;

pub use crate::config::{
    AppConfig, GenericServiceConfig, Lang, NeuralConfig, RegistryConfig, SpeechConfig,
    DEFAULT_PIVOT_LANG, DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG,
};
pub use detect::{LanguageDetector, WhatlangDetector};
pub use error::{Error, Result, Stage};
pub use language::{LanguageOption, language_name, source_languages, target_languages};
pub use speech::{SpeechSynthesizer, create_synthesizer};
pub use translator::{
    ModelRegistry, Orchestrator, PairwiseModel, PathwayKind, Resolver, Translation,
    TranslationMethod, TranslationPathway, TranslationRequest, Translator, create_orchestrator,
};

use std::sync::Arc;
use tracing::{debug, info};

/// Detection, translation and speech synthesis for one request at a time
pub struct SpeechPipeline {
    detector: Arc<dyn LanguageDetector>,
    orchestrator: Orchestrator,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    config: AppConfig,
}

/// Result of a full text-to-speech run
#[derive(Debug, Clone)]
pub struct SpeechOutput {
    /// Source language used for translation
    pub source_lang: Lang,
    /// Whether `source_lang` came from detection
    pub detected: bool,
    pub translation: Translation,
    /// Encoded audio of the translated text
    pub audio: Vec<u8>,
    /// MIME type of `audio`
    pub mime_type: &'static str,
}

impl SpeechPipeline {
    /// Create a pipeline with the configured backends
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate()?;
        let orchestrator = create_orchestrator(&config)?;
        let synthesizer = create_synthesizer(&config.speech)?;
        let detector = Arc::new(WhatlangDetector::from_config(&config.detection));

        Ok(Self {
            detector,
            orchestrator,
            synthesizer,
            config,
        })
    }

    /// Create with custom components
    pub fn with_components(
        config: AppConfig,
        detector: Arc<dyn LanguageDetector>,
        orchestrator: Orchestrator,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            detector,
            orchestrator,
            synthesizer,
            config,
        }
    }

    /// Best-guess language of `text`
    pub fn detect_language(&self, text: &str) -> Option<Lang> {
        let detected = self.detector.detect(text);
        debug!("Detected language: {:?}", detected);
        detected
    }

    /// Build a validated request, resolving `auto` through detection.
    ///
    /// Returns the request and whether its source language was detected.
    pub fn prepare(
        &self,
        text: &str,
        source: &Lang,
        target: &Lang,
        method: TranslationMethod,
    ) -> Result<(TranslationRequest, bool)> {
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }

        let (source, detected) = if source.is_auto() {
            let lang = self.detect_language(text).ok_or(Error::DetectionFailed)?;
            (lang, true)
        } else {
            (source.clone(), false)
        };

        for lang in [&source, target] {
            if !language::is_known(lang.as_str()) {
                return Err(Error::UnsupportedLanguage(lang.to_string()));
            }
        }

        let request = TranslationRequest::new(text, source, target.clone(), method)?;
        Ok((request, detected))
    }

    /// Translate a prepared request
    pub async fn translate(&self, request: &TranslationRequest) -> Result<Translation> {
        self.orchestrator.translate(request).await
    }

    /// Speak `text` in `lang`
    pub async fn synthesize(&self, text: &str, lang: &Lang) -> Result<Vec<u8>> {
        info!("Generating audio with {}", self.synthesizer.name());
        self.synthesizer
            .synthesize(text, lang)
            .await
            .map_err(|e| match e {
                Error::SynthesisFailed(_) => e,
                other => Error::SynthesisFailed(other.to_string()),
            })
    }

    /// Detect, translate and speak. Nothing is returned unless every stage succeeds.
    pub async fn run(
        &self,
        text: &str,
        source: &Lang,
        target: &Lang,
        method: TranslationMethod,
    ) -> Result<SpeechOutput> {
        let (request, detected) = self.prepare(text, source, target, method)?;
        let translation = self.translate(&request).await?;
        let audio = self.synthesize(&translation.text, request.target()).await?;

        Ok(SpeechOutput {
            source_lang: request.source().clone(),
            detected,
            translation,
            audio,
            mime_type: self.synthesizer.mime_type(),
        })
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub const fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}
