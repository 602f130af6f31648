use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::translator::TranslationMethod;

/// Language codes as used by the language table (ISO 639-1 with a few
/// regional and legacy variants, e.g. `zh-cn`, `iw`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    /// Pseudo-code asking for the source language to be detected.
    pub const AUTO: &'static str = "auto";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn auto() -> Self {
        Self::new(Self::AUTO)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_auto(&self) -> bool {
        self.0 == Self::AUTO
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// Serde default functions for common languages
fn default_source_lang() -> Lang {
    Lang::auto()
}

fn default_target_lang() -> Lang {
    Lang::new(DEFAULT_TARGET_LANG)
}

fn default_pivot_lang() -> Lang {
    Lang::new(DEFAULT_PIVOT_LANG)
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Default source language code
pub const DEFAULT_SOURCE_LANG: &str = Lang::AUTO;
/// Default target language code
pub const DEFAULT_TARGET_LANG: &str = "en";
/// Default pivot for chained neural translation
pub const DEFAULT_PIVOT_LANG: &str = "en";

const fn default_true() -> bool {
    true
}

const fn default_retry_count() -> u32 {
    3
}

const fn default_retry_delay_ms() -> u64 {
    1000
}

const fn default_timeout_secs() -> u64 {
    60
}

/// Neural pairwise translation via opus-mt models on the Hugging Face hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralConfig {
    /// Hub base URL, used to check that a model exists
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    /// Inference API base URL, model id is appended
    #[serde(default = "default_inference_url")]
    pub inference_url: String,
    /// Model id prefix; `-{src}-{tgt}` is appended
    #[serde(default = "default_model_prefix")]
    pub model_prefix: String,
    /// Optional bearer token for the inference API
    #[serde(default)]
    pub api_token: Option<String>,
    /// Intermediary language when no direct model exists
    #[serde(default = "default_pivot_lang")]
    pub pivot_lang: Lang,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_hub_url() -> String {
    "https://huggingface.co".to_string()
}

fn default_inference_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_model_prefix() -> String {
    "Helsinki-NLP/opus-mt".to_string()
}

impl Default for NeuralConfig {
    fn default() -> Self {
        Self {
            hub_url: default_hub_url(),
            inference_url: default_inference_url(),
            model_prefix: default_model_prefix(),
            api_token: None,
            pivot_lang: default_pivot_lang(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Generic translation service (Google Translate web endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericServiceConfig {
    #[serde(default = "default_translate_api_base")]
    pub api_base: String,
    /// Value of the `client` query parameter
    #[serde(default = "default_translate_client")]
    pub client: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_translate_api_base() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_translate_client() -> String {
    "gtx".to_string()
}

impl Default for GenericServiceConfig {
    fn default() -> Self {
        Self {
            api_base: default_translate_api_base(),
            client: default_translate_client(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Speech synthesis (Google Translate TTS endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_tts_api_base")]
    pub api_base: String,
    /// Read slowly
    #[serde(default)]
    pub slow: bool,
    /// Longest text the endpoint accepts per request
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_tts_api_base() -> String {
    "https://translate.google.com".to_string()
}

const fn default_max_chunk_chars() -> usize {
    100
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_base: default_tts_api_base(),
            slow: false,
            max_chunk_chars: default_max_chunk_chars(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Model handle registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Keep acquired model handles between requests
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Maximum cached model handles
    #[serde(default = "default_max_models")]
    pub max_models: u64,

    /// Handle TTL in seconds (0 = no expiry)
    #[serde(default)]
    pub ttl_seconds: u64,
}

const fn default_max_models() -> u64 {
    64
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_models: default_max_models(),
            ttl_seconds: 0,
        }
    }
}

/// Language detection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Detections below this confidence are reported as unknown
    #[serde(default)]
    pub min_confidence: f64,
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source language (`auto` to detect)
    #[serde(default = "default_source_lang")]
    pub source_lang: Lang,

    /// Target language
    #[serde(default = "default_target_lang")]
    pub target_lang: Lang,

    /// Preferred translation method
    #[serde(default)]
    pub method: TranslationMethod,

    #[serde(default)]
    pub neural: NeuralConfig,

    #[serde(default)]
    pub generic: GenericServiceConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub detection: DetectionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            method: TranslationMethod::default(),
            neural: NeuralConfig::default(),
            generic: GenericServiceConfig::default(),
            speech: SpeechConfig::default(),
            registry: RegistryConfig::default(),
            detection: DetectionConfig::default(),
        }
    }
}

/// Environment variable prefix, e.g. `TEXT2SPEECH__NEURAL__API_TOKEN`
pub const ENV_PREFIX: &str = "TEXT2SPEECH";

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Layer defaults, `~/.config/text2speech/config.toml`, `./config.toml`
    /// and `TEXT2SPEECH__*` environment variables, later sources winning.
    pub fn try_load() -> Result<Self> {
        let mut files: Vec<PathBuf> = crate::util::user_config_path().into_iter().collect();
        files.push(PathBuf::from("config.toml"));

        Self::layered(
            files,
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Layer optional TOML files over the defaults, then `env` over them.
    fn layered(files: Vec<PathBuf>, env: ::config::Environment) -> Result<Self> {
        let defaults = ::config::Config::try_from(&Self::default())
            .map_err(|e| Error::ConfigLoad(e.to_string()))?;

        let builder = files.into_iter().fold(
            ::config::Config::builder().add_source(defaults),
            |builder, path| builder.add_source(toml_source(path)),
        );

        let config: Self = builder
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| Error::ConfigLoad(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from default locations, falling back to defaults on error.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(config) => {
                tracing::debug!("Loaded layered configuration");
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.target_lang.is_empty() || self.target_lang.is_auto() {
            return Err(invalid("target_lang", "must be a concrete language code"));
        }
        if self.neural.pivot_lang.is_empty() || self.neural.pivot_lang.is_auto() {
            return Err(invalid("neural.pivot_lang", "must be a concrete language code"));
        }
        if self.neural.model_prefix.trim().is_empty() {
            return Err(invalid("neural.model_prefix", "must not be empty"));
        }
        if self.speech.max_chunk_chars == 0 {
            return Err(invalid("speech.max_chunk_chars", "must be greater than 0"));
        }
        for (field, retries) in [
            ("neural.retry_count", self.neural.retry_count),
            ("generic.retry_count", self.generic.retry_count),
            ("speech.retry_count", self.speech.retry_count),
        ] {
            if retries == 0 {
                return Err(invalid(field, "must be at least 1"));
            }
        }
        if !(0.0..=1.0).contains(&self.detection.min_confidence) {
            return Err(invalid(
                "detection.min_confidence",
                "must be between 0.0 and 1.0",
            ));
        }
        Ok(())
    }
}

fn toml_source(path: PathBuf) -> ::config::File<::config::FileSourceFile, ::config::FileFormat> {
    ::config::File::from(path)
        .format(::config::FileFormat::Toml)
        .required(false)
}

fn invalid(field: &str, reason: &str) -> Error {
    Error::ConfigInvalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
