use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::{GenericServiceConfig, Lang};
use crate::error::{Error, Result};
use crate::http::{self, RetryPolicy};
use crate::language::google_code;
use super::traits::{Translator, TranslatorInfo};

const BACKEND: &str = "google-translate";

/// Google Translate web endpoint (`translate_a/single`).
///
/// No API key is needed; the `client` parameter selects the public tier.
pub struct GoogleTranslator {
    client: Client,
    /// Base URL (e.g., "https://translate.googleapis.com")
    pub api_base: String,
    /// Value of the `client` query parameter
    pub client_id: String,
    pub retry: RetryPolicy,
}

impl GoogleTranslator {
    pub fn new(config: &GenericServiceConfig) -> Result<Self> {
        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client_id: config.client.clone(),
            retry: RetryPolicy::new(config.retry_count, config.retry_delay_ms),
        })
    }

    async fn request(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        let url = format!("{}/translate_a/single", self.api_base);
        let source = google_code(source);
        let target = google_code(target);

        let response = http::send_with_retry(
            || {
                self.client.get(&url).query(&[
                    ("client", self.client_id.as_str()),
                    ("sl", source.as_str()),
                    ("tl", target.as_str()),
                    ("dt", "t"),
                    ("q", text),
                ])
            },
            self.retry,
            BACKEND,
        )
        .await
        .map_err(|failure| execution_failed(failure.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| execution_failed(format!("invalid response: {e}")))?;

        parse_response(&body)
            .ok_or_else(|| execution_failed("response contained no translation".to_string()))
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "Google Translate",
        }
    }

    async fn translate(&self, text: &str, source: &Lang, target: &Lang) -> Result<String> {
        // Skip empty text
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        debug!("Translating {} chars {} -> {} with {}", text.chars().count(), source, target, BACKEND);
        self.request(text, source, target).await
    }
}

fn execution_failed(reason: String) -> Error {
    Error::ExecutionFailed {
        backend: BACKEND.to_string(),
        reason,
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body looks like `[[["Bonjour. ","Hello. ",...],["Ça va ?","How are you?",...]],null,"en",...]`.
fn parse_response(body: &Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
