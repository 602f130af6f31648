use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::Lang;
use crate::error::{Error, Result};
use super::pathway::PathwayKind;

/// Which translation method a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationMethod {
    /// Pairwise opus-mt models, direct or chained through the pivot language
    #[serde(alias = "neural", alias = "marian", alias = "marianmt")]
    NeuralPairwise,
    /// A general-purpose translation service
    #[default]
    #[serde(alias = "generic", alias = "google", alias = "googletrans")]
    GenericService,
}

impl TranslationMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NeuralPairwise => "neural-pairwise",
            Self::GenericService => "generic-service",
        }
    }
}

impl fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neural-pairwise" | "neural" | "marian" | "marianmt" => Ok(Self::NeuralPairwise),
            "generic-service" | "generic" | "google" | "googletrans" | "google translate" => {
                Ok(Self::GenericService)
            }
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// A validated translation request.
///
/// Construction guarantees non-empty text, concrete languages and
/// `source != target`; the fields cannot change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    source: Lang,
    target: Lang,
    method: TranslationMethod,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source: Lang,
        target: Lang,
        method: TranslationMethod,
    ) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::EmptyText);
        }
        for lang in [&source, &target] {
            if lang.is_empty() || lang.is_auto() {
                return Err(Error::InvalidLanguage(lang.to_string()));
            }
        }
        if source == target {
            return Err(Error::SameLanguage(source.to_string()));
        }

        Ok(Self {
            text,
            source,
            target,
            method,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn source(&self) -> &Lang {
        &self.source
    }

    pub const fn target(&self) -> &Lang {
        &self.target
    }

    pub const fn method(&self) -> TranslationMethod {
        self.method
    }

    /// The same request with a different method.
    pub fn with_method(&self, method: TranslationMethod) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }
}

/// Successful translation of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Translated text
    pub text: String,
    /// Method that produced the text
    pub method: TranslationMethod,
    /// Neural pathway used, when the neural method succeeded
    pub pathway: Option<PathwayKind>,
    /// Whether the neural method failed and the generic service answered
    pub fell_back: bool,
}
