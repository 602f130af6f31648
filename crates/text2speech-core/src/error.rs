use std::fmt;
use thiserror::Error;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Source language detection
    Detection,
    /// Pairwise neural model translation (resolution or inference)
    NeuralPairwise,
    /// Generic translation service call
    GenericService,
    /// Speech synthesis of the translated text
    Synthesis,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detection => "language detection",
            Self::NeuralPairwise => "neural pairwise translation",
            Self::GenericService => "generic translation service",
            Self::Synthesis => "audio generation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for text2speech-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Translation backends (acquisition, inference, service calls)
/// - Request validation (languages, empty text, method names)
/// - Speech synthesis and language detection
/// - Configuration operations (loading, validation)
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// A named model or service could not be acquired
    #[error("backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    /// A backend was acquired but failed while translating
    #[error("backend {backend} failed: {reason}")]
    ExecutionFailed { backend: String, reason: String },

    /// Unrecognized translation method name
    #[error("invalid translation method: {0}")]
    InvalidMethod(String),

    /// Terminal translation failure with the stage that produced it
    #[error("translation failed at {stage}: {cause}")]
    TranslationFailed {
        stage: Stage,
        #[source]
        cause: Box<Error>,
    },

    // ==========================================================================
    // Request Errors
    // ==========================================================================
    /// Source and target languages are identical
    #[error("source and target languages should be different (both are '{0}')")]
    SameLanguage(String),

    /// Nothing to translate
    #[error("no text to translate")]
    EmptyText,

    /// Empty or reserved language code where a concrete one is required
    #[error("invalid language code: '{0}'")]
    InvalidLanguage(String),

    /// Language code not present in the language table
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    // ==========================================================================
    // Speech & Detection Errors
    // ==========================================================================
    /// Speech synthesis failed
    #[error("speech synthesis failed: {0}")]
    SynthesisFailed(String),

    /// The source language could not be detected
    #[error("unable to detect language, please select the source language manually")]
    DetectionFailed,

    /// Failed to build an HTTP client
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },
}

impl Error {
    /// The pipeline stage responsible for this error, if it belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::TranslationFailed { stage, .. } => Some(*stage),
            Self::BackendUnavailable { .. } | Self::ExecutionFailed { .. } => {
                Some(Stage::NeuralPairwise)
            }
            Self::SynthesisFailed(_) => Some(Stage::Synthesis),
            Self::DetectionFailed => Some(Stage::Detection),
            _ => None,
        }
    }

    /// Whether the user must pick a different input rather than retry.
    pub const fn is_request_error(&self) -> bool {
        matches!(
            self,
            Self::SameLanguage(_)
                | Self::EmptyText
                | Self::InvalidLanguage(_)
                | Self::UnsupportedLanguage(_)
                | Self::InvalidMethod(_)
                | Self::DetectionFailed
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
