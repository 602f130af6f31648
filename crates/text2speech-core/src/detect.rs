//! Source language detection.

use tracing::debug;

use crate::config::{DetectionConfig, Lang};
use crate::language;

/// Best-guess language detection for input text.
pub trait LanguageDetector: Send + Sync {
    /// Detect the language of `text`, `None` when it cannot be determined.
    fn detect(&self, text: &str) -> Option<Lang>;
}

/// Offline detector backed by `whatlang` trigram models.
#[derive(Debug, Clone, Default)]
pub struct WhatlangDetector {
    min_confidence: f64,
}

impl WhatlangDetector {
    pub const fn new(min_confidence: f64) -> Self {
        Self { min_confidence }
    }

    pub const fn from_config(config: &DetectionConfig) -> Self {
        Self::new(config.min_confidence)
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<Lang> {
        if text.trim().is_empty() {
            return None;
        }

        let info = whatlang::detect(text)?;
        let iso3 = info.lang().code();

        if info.confidence() < self.min_confidence {
            debug!(
                "Detected {} with confidence {:.2}, below threshold {:.2}",
                iso3,
                info.confidence(),
                self.min_confidence
            );
            return None;
        }

        let code = table_code(iso3)?;
        debug_assert!(language::is_known(code));
        Some(Lang::new(code))
    }
}

/// Map an ISO 639-3 code from whatlang onto the language table.
fn table_code(iso3: &str) -> Option<&'static str> {
    let code = match iso3 {
        "afr" => "af",
        "aka" | "tuk" => return None,
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh-cn",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "iw",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jw",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "no",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(code)
}
