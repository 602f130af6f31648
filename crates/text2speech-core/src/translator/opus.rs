use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::{Lang, NeuralConfig, RegistryConfig};
use crate::error::{Error, Result};
use crate::http::{self, RetryPolicy};
use super::traits::{ModelRegistry, PairwiseModel};

/// Registry of opus-mt models hosted on the Hugging Face hub.
///
/// A pair is available when `{model_prefix}-{src}-{tgt}` exists on the hub.
/// Acquired handles are kept in a bounded cache; dropping an entry only costs
/// one more existence check.
pub struct HubModelRegistry {
    client: Client,
    hub_url: String,
    inference_url: String,
    model_prefix: String,
    api_token: Option<String>,
    retry: RetryPolicy,
    models: Option<Cache<String, Arc<dyn PairwiseModel>>>,
}

impl HubModelRegistry {
    pub fn new(config: &NeuralConfig, registry: &RegistryConfig) -> Result<Self> {
        let models = registry.cache_enabled.then(|| {
            let mut builder = Cache::builder().max_capacity(registry.max_models);
            if registry.ttl_seconds > 0 {
                builder = builder.time_to_live(Duration::from_secs(registry.ttl_seconds));
            }
            builder.build()
        });

        Ok(Self {
            client: http::build_client(config.timeout_secs)?,
            hub_url: config.hub_url.trim_end_matches('/').to_string(),
            inference_url: config.inference_url.trim_end_matches('/').to_string(),
            model_prefix: config.model_prefix.trim_end_matches('-').to_string(),
            api_token: config.api_token.clone(),
            retry: RetryPolicy::new(config.retry_count, config.retry_delay_ms),
            models,
        })
    }

    /// Hub id of the model for a language pair.
    pub fn model_id(&self, source: &Lang, target: &Lang) -> String {
        format!(
            "{}-{}-{}",
            self.model_prefix,
            model_code(source),
            model_code(target)
        )
    }

    async fn check_exists(&self, id: &str) -> Result<()> {
        let url = format!("{}/api/models/{}", self.hub_url, id);

        http::send_with_retry(
            || authorize(self.client.get(&url), self.api_token.as_deref()),
            self.retry,
            id,
        )
        .await
        .map(|_| ())
        .map_err(|failure| Error::BackendUnavailable {
            backend: id.to_string(),
            reason: failure.to_string(),
        })
    }
}

#[async_trait]
impl ModelRegistry for HubModelRegistry {
    async fn acquire(&self, source: &Lang, target: &Lang) -> Result<Arc<dyn PairwiseModel>> {
        let id = self.model_id(source, target);

        if let Some(ref models) = self.models
            && let Some(model) = models.get(&id).await
        {
            debug!("Model cache hit for {}", id);
            return Ok(model);
        }

        self.check_exists(&id).await?;

        let model: Arc<dyn PairwiseModel> = Arc::new(HubModel {
            client: self.client.clone(),
            url: format!("{}/{}", self.inference_url, id),
            id: id.clone(),
            api_token: self.api_token.clone(),
            retry: self.retry,
        });

        if let Some(ref models) = self.models {
            models.insert(id.clone(), Arc::clone(&model)).await;
        }

        info!("Acquired model {}", id);
        Ok(model)
    }
}

/// One opus-mt model served by the inference API.
pub struct HubModel {
    client: Client,
    id: String,
    url: String,
    api_token: Option<String>,
    retry: RetryPolicy,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct InferenceOutput {
    translation_text: String,
}

impl HubModel {
    fn execution_failed(&self, reason: String) -> Error {
        Error::ExecutionFailed {
            backend: self.id.clone(),
            reason,
        }
    }
}

#[async_trait]
impl PairwiseModel for HubModel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn generate(&self, text: &str) -> Result<String> {
        let request = InferenceRequest {
            inputs: text,
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let response = http::send_with_retry(
            || authorize(self.client.post(&self.url).json(&request), self.api_token.as_deref()),
            self.retry,
            &self.id,
        )
        .await
        .map_err(|failure| self.execution_failed(failure.to_string()))?;

        let outputs: Vec<InferenceOutput> = response
            .json()
            .await
            .map_err(|e| self.execution_failed(format!("invalid response: {e}")))?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.translation_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| self.execution_failed("model returned no translation".to_string()))
    }
}

fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// opus-mt model names use plain ISO 639-1 codes where the table keeps
/// regional or legacy spellings.
///
/// Both Chinese scripts collapse to `zh`, so `zh-cn -> zh-tw` asks for
/// `opus-mt-zh-zh`. No such model exists and the pair is resolved like any
/// other missing direct model.
fn model_code(lang: &Lang) -> &str {
    match lang.as_str() {
        "zh-cn" | "zh-tw" => "zh",
        "iw" => "he",
        "jw" => "jv",
        code => code,
    }
}
