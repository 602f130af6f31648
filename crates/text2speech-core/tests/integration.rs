//! Integration tests for text2speech-core
//!
//! These tests verify the end-to-end workflow with mock backends:
//! - Pathway resolution (direct, chained through the pivot, failures)
//! - Orchestration and the single neural -> generic fallback
//! - Request validation, detection and speech synthesis in the pipeline

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use text2speech_core::{
    AppConfig, Error, Lang, LanguageDetector, ModelRegistry, Orchestrator, PairwiseModel,
    PathwayKind, Resolver, Result, SpeechPipeline, SpeechSynthesizer, Stage, TranslationMethod,
    TranslationPathway, TranslationRequest, Translator, translator::TranslatorInfo,
};

// =============================================================================
// Mock Backends
// =============================================================================

/// Pairwise model that tags its output with its id, e.g. `[en-fr] Hello`.
struct MockModel {
    id: String,
    broken: bool,
    inputs: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PairwiseModel for MockModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, text: &str) -> Result<String> {
        self.inputs.lock().unwrap().push(text.to_string());
        if self.broken {
            return Err(Error::ExecutionFailed {
                backend: self.id.clone(),
                reason: "inference crashed".to_string(),
            });
        }
        Ok(format!("[{}] {}", self.id, text))
    }
}

/// Registry over a fixed set of pairs, recording every acquisition.
#[derive(Default)]
struct MockRegistry {
    /// Pair -> whether the model fails at inference
    models: HashMap<(String, String), bool>,
    acquisitions: Mutex<Vec<String>>,
    inputs: Arc<Mutex<Vec<String>>>,
}

impl MockRegistry {
    fn with_model(mut self, source: &str, target: &str) -> Self {
        self.models.insert((source.to_string(), target.to_string()), false);
        self
    }

    fn with_broken_model(mut self, source: &str, target: &str) -> Self {
        self.models.insert((source.to_string(), target.to_string()), true);
        self
    }

    fn acquisitions(&self) -> Vec<String> {
        self.acquisitions.lock().unwrap().clone()
    }

    fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelRegistry for MockRegistry {
    async fn acquire(&self, source: &Lang, target: &Lang) -> Result<Arc<dyn PairwiseModel>> {
        let id = format!("{source}-{target}");
        self.acquisitions.lock().unwrap().push(id.clone());

        let key = (source.as_str().to_string(), target.as_str().to_string());
        match self.models.get(&key) {
            Some(&broken) => Ok(Arc::new(MockModel {
                id,
                broken,
                inputs: Arc::clone(&self.inputs),
            })),
            None => Err(Error::BackendUnavailable {
                backend: id,
                reason: "no such model".to_string(),
            }),
        }
    }
}

/// Generic service returning `<generic:src-tgt> text`, or failing.
struct MockTranslator {
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranslator {
    fn new() -> Self {
        Self {
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            should_fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "mock",
        }
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            return Err(Error::ExecutionFailed {
                backend: "mock".to_string(),
                reason: "service down".to_string(),
            });
        }
        Ok(format!("<generic:{source}-{target}> {text}"))
    }
}

struct MockDetector(Option<&'static str>);

impl LanguageDetector for MockDetector {
    fn detect(&self, _text: &str) -> Option<Lang> {
        self.0.map(Lang::new)
    }
}

struct MockSynthesizer {
    should_fail: bool,
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn synthesize(&self, text: &str, lang: &Lang) -> Result<Vec<u8>> {
        if self.should_fail {
            return Err(Error::SynthesisFailed("speaker unplugged".to_string()));
        }
        Ok(format!("MP3[{lang}]:{text}").into_bytes())
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

fn pivot() -> Lang {
    Lang::new("en")
}

fn request(text: &str, source: &str, target: &str, method: TranslationMethod) -> TranslationRequest {
    TranslationRequest::new(text, Lang::new(source), Lang::new(target), method).unwrap()
}

fn orchestrator(
    registry: &Arc<MockRegistry>,
    generic: &Arc<MockTranslator>,
) -> Orchestrator {
    let resolver = Resolver::new(registry.clone(), pivot());
    Orchestrator::new(resolver, generic.clone())
}

fn pipeline(
    registry: &Arc<MockRegistry>,
    detected: Option<&'static str>,
    synth_fails: bool,
) -> SpeechPipeline {
    SpeechPipeline::with_components(
        AppConfig::default(),
        Arc::new(MockDetector(detected)),
        orchestrator(registry, &Arc::new(MockTranslator::new())),
        Arc::new(MockSynthesizer {
            should_fail: synth_fails,
        }),
    )
}

// =============================================================================
// Resolver Tests
// =============================================================================

#[tokio::test]
async fn test_resolve_direct_when_model_exists() {
    let registry = Arc::new(MockRegistry::default().with_model("en", "fr"));
    let resolver = Resolver::new(registry.clone(), pivot());

    let pathway = resolver.resolve(&Lang::new("en"), &Lang::new("fr")).await.unwrap();

    assert_eq!(pathway.kind(), PathwayKind::Direct);
    assert_eq!(pathway.model_ids(), vec!["en-fr"]);
    assert_eq!(registry.acquisitions(), vec!["en-fr"]);
}

#[tokio::test]
async fn test_resolve_chains_through_pivot() {
    let registry = Arc::new(
        MockRegistry::default()
            .with_model("xx", "en")
            .with_model("en", "yy"),
    );
    let resolver = Resolver::new(registry.clone(), pivot());

    let pathway = resolver.resolve(&Lang::new("xx"), &Lang::new("yy")).await.unwrap();

    assert_eq!(pathway.kind(), PathwayKind::Chained);
    assert_eq!(pathway.model_ids(), vec!["xx-en", "en-yy"]);
    assert_eq!(registry.acquisitions(), vec!["xx-yy", "xx-en", "en-yy"]);
}

#[tokio::test]
async fn test_resolve_missing_first_leg_is_fatal() {
    let registry = Arc::new(MockRegistry::default().with_model("en", "yy"));
    let resolver = Resolver::new(registry.clone(), pivot());

    let err = resolver
        .resolve(&Lang::new("xx"), &Lang::new("yy"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BackendUnavailable { ref backend, .. } if backend == "xx-en"));
    // No second leg is attempted once the first one is missing
    assert_eq!(registry.acquisitions(), vec!["xx-yy", "xx-en"]);
}

#[tokio::test]
async fn test_resolve_missing_second_leg_is_fatal() {
    let registry = Arc::new(MockRegistry::default().with_model("xx", "en"));
    let resolver = Resolver::new(registry, pivot());

    let err = resolver
        .resolve(&Lang::new("xx"), &Lang::new("yy"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BackendUnavailable { ref backend, .. } if backend == "en-yy"));
}

#[tokio::test]
async fn test_resolve_does_not_chain_pivot_pairs() {
    let registry = Arc::new(MockRegistry::default().with_model("en", "zz"));
    let resolver = Resolver::new(registry.clone(), pivot());

    let err = resolver
        .resolve(&Lang::new("en"), &Lang::new("qq"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BackendUnavailable { ref backend, .. } if backend == "en-qq"));
    assert_eq!(registry.acquisitions(), vec!["en-qq"]);
}

#[tokio::test]
async fn test_resolve_rejects_empty_language() {
    let registry = Arc::new(MockRegistry::default());
    let resolver = Resolver::new(registry.clone(), pivot());

    let err = resolver.resolve(&Lang::new(""), &Lang::new("fr")).await.unwrap_err();

    assert!(matches!(err, Error::InvalidLanguage(_)));
    assert!(registry.acquisitions().is_empty());
}

// =============================================================================
// Orchestrator Tests
// =============================================================================

#[tokio::test]
async fn test_neural_direct_translation() {
    let registry = Arc::new(MockRegistry::default().with_model("en", "fr"));
    let generic = Arc::new(MockTranslator::new());

    let translation = orchestrator(&registry, &generic)
        .translate(&request("Hello", "en", "fr", TranslationMethod::NeuralPairwise))
        .await
        .unwrap();

    assert_eq!(translation.text, "[en-fr] Hello");
    assert_eq!(translation.method, TranslationMethod::NeuralPairwise);
    assert_eq!(translation.pathway, Some(PathwayKind::Direct));
    assert!(!translation.fell_back);
    assert_eq!(generic.calls(), 0);
}

#[tokio::test]
async fn test_neural_chained_translation_passes_text_verbatim() {
    let registry = Arc::new(
        MockRegistry::default()
            .with_model("xx", "en")
            .with_model("en", "yy"),
    );
    let generic = Arc::new(MockTranslator::new());

    let translation = orchestrator(&registry, &generic)
        .translate(&request("Hello", "xx", "yy", TranslationMethod::NeuralPairwise))
        .await
        .unwrap();

    assert_eq!(translation.text, "[en-yy] [xx-en] Hello");
    assert_eq!(translation.pathway, Some(PathwayKind::Chained));
    assert_eq!(registry.inputs(), vec!["Hello", "[xx-en] Hello"]);
    assert_eq!(generic.calls(), 0);
}

#[tokio::test]
async fn test_fallback_matches_direct_generic_call() {
    let registry = Arc::new(MockRegistry::default());
    let generic = Arc::new(MockTranslator::new());
    let orchestrator = orchestrator(&registry, &generic);

    let neural = request("Hello", "en", "fr", TranslationMethod::NeuralPairwise);
    let fallback = orchestrator.translate(&neural).await.unwrap();
    let direct = orchestrator
        .translate(&neural.with_method(TranslationMethod::GenericService))
        .await
        .unwrap();

    assert_eq!(fallback.text, direct.text);
    assert_eq!(fallback.method, TranslationMethod::GenericService);
    assert!(fallback.fell_back);
    assert!(!direct.fell_back);
    assert_eq!(generic.calls(), 2);
}

#[tokio::test]
async fn test_inference_failure_falls_back() {
    let registry = Arc::new(MockRegistry::default().with_broken_model("en", "fr"));
    let generic = Arc::new(MockTranslator::new());

    let translation = orchestrator(&registry, &generic)
        .translate(&request("Hello", "en", "fr", TranslationMethod::NeuralPairwise))
        .await
        .unwrap();

    assert_eq!(translation.text, "<generic:en-fr> Hello");
    assert!(translation.fell_back);
    assert_eq!(generic.calls(), 1);
}

#[tokio::test]
async fn test_broken_second_leg_falls_back() {
    let registry = Arc::new(
        MockRegistry::default()
            .with_model("xx", "en")
            .with_broken_model("en", "yy"),
    );
    let generic = Arc::new(MockTranslator::new());

    let translation = orchestrator(&registry, &generic)
        .translate(&request("Hello", "xx", "yy", TranslationMethod::NeuralPairwise))
        .await
        .unwrap();

    assert_eq!(translation.text, "<generic:xx-yy> Hello");
    assert!(translation.fell_back);
}

#[tokio::test]
async fn test_generic_failure_never_reaches_neural() {
    let registry = Arc::new(MockRegistry::default().with_model("en", "fr"));
    let generic = Arc::new(MockTranslator::failing());

    let err = orchestrator(&registry, &generic)
        .translate(&request("Hello", "en", "fr", TranslationMethod::GenericService))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::GenericService));
    assert!(registry.acquisitions().is_empty());
    assert_eq!(generic.calls(), 1);
}

#[tokio::test]
async fn test_everything_unavailable_is_terminal_generic_failure() {
    let registry = Arc::new(MockRegistry::default());
    let generic = Arc::new(MockTranslator::failing());
    let orchestrator = orchestrator(&registry, &generic);
    let neural = request("Hello", "en", "fr", TranslationMethod::NeuralPairwise);

    let first = orchestrator.translate(&neural).await.unwrap_err();
    let second = orchestrator.translate(&neural).await.unwrap_err();

    assert!(matches!(first, Error::TranslationFailed { stage: Stage::GenericService, .. }));
    assert_eq!(first.stage(), second.stage());
    // One generic attempt per request, never retried
    assert_eq!(generic.calls(), 2);
    // Same resolution steps both times
    assert_eq!(registry.acquisitions(), vec!["en-fr", "en-fr"]);
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_pipeline_run_with_detected_source() {
    let registry = Arc::new(MockRegistry::default().with_model("fr", "de"));
    let pipeline = pipeline(&registry, Some("fr"), false);

    let output = pipeline
        .run("Bonjour", &Lang::auto(), &Lang::new("de"), TranslationMethod::NeuralPairwise)
        .await
        .unwrap();

    assert_eq!(output.source_lang.as_str(), "fr");
    assert!(output.detected);
    assert_eq!(output.translation.text, "[fr-de] Bonjour");
    assert_eq!(output.audio, b"MP3[de]:[fr-de] Bonjour");
    assert_eq!(output.mime_type, "audio/mpeg");
}

#[tokio::test]
async fn test_pipeline_explicit_source_skips_detection() {
    let registry = Arc::new(MockRegistry::default());
    let pipeline = pipeline(&registry, None, false);

    let output = pipeline
        .run("Hello", &Lang::new("en"), &Lang::new("fr"), TranslationMethod::GenericService)
        .await
        .unwrap();

    assert!(!output.detected);
    assert_eq!(output.translation.text, "<generic:en-fr> Hello");
}

#[tokio::test]
async fn test_pipeline_undetectable_source_requires_manual_selection() {
    let registry = Arc::new(MockRegistry::default());
    let pipeline = pipeline(&registry, None, false);

    let err = pipeline
        .run("???", &Lang::auto(), &Lang::new("fr"), TranslationMethod::NeuralPairwise)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DetectionFailed));
    assert!(err.is_request_error());
    assert!(registry.acquisitions().is_empty());
}

#[tokio::test]
async fn test_pipeline_rejects_same_language_before_core() {
    let registry = Arc::new(MockRegistry::default().with_model("en", "en"));
    let pipeline = pipeline(&registry, Some("en"), false);

    let err = pipeline
        .run("Hello", &Lang::auto(), &Lang::new("en"), TranslationMethod::NeuralPairwise)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SameLanguage(_)));
    assert!(registry.acquisitions().is_empty());
}

#[tokio::test]
async fn test_pipeline_rejects_unknown_language() {
    let registry = Arc::new(MockRegistry::default());
    let pipeline = pipeline(&registry, None, false);

    let err = pipeline
        .prepare("Hello", &Lang::new("en"), &Lang::new("tlh"), TranslationMethod::GenericService)
        .unwrap_err();

    assert!(matches!(err, Error::UnsupportedLanguage(ref code) if code == "tlh"));
}

#[tokio::test]
async fn test_pipeline_synthesis_failure_reports_audio_stage() {
    let registry = Arc::new(MockRegistry::default().with_model("en", "fr"));
    let pipeline = pipeline(&registry, None, true);

    let err = pipeline
        .run("Hello", &Lang::new("en"), &Lang::new("fr"), TranslationMethod::NeuralPairwise)
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Synthesis));
}

#[test]
fn test_same_language_request_is_rejected() {
    let err = TranslationRequest::new(
        "Hello",
        Lang::new("en"),
        Lang::new("en"),
        TranslationMethod::NeuralPairwise,
    )
    .unwrap_err();

    assert!(matches!(err, Error::SameLanguage(_)));
}

#[test]
fn test_pathway_debug_lists_models() {
    let inputs = Arc::new(Mutex::new(Vec::new()));
    let model = |id: &str| -> Arc<dyn PairwiseModel> {
        Arc::new(MockModel {
            id: id.to_string(),
            broken: false,
            inputs: Arc::clone(&inputs),
        })
    };
    let pathway = TranslationPathway::Chained {
        first: model("xx-en"),
        second: model("en-yy"),
    };

    let debug = format!("{pathway:?}");
    assert!(debug.contains("Chained"));
    assert!(debug.contains("xx-en"));
}
