use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{Error, Result, Stage};
use crate::util::preview;
use super::pathway::{PathwayKind, Resolver};
use super::request::{Translation, TranslationMethod, TranslationRequest};
use super::traits::Translator;

/// Runs a request on its method's backend, falling back from the neural
/// method to the generic service at most once.
pub struct Orchestrator {
    resolver: Resolver,
    generic: Arc<dyn Translator>,
}

impl Orchestrator {
    pub fn new(resolver: Resolver, generic: Arc<dyn Translator>) -> Self {
        Self { resolver, generic }
    }

    pub const fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn generic_name(&self) -> &'static str {
        self.generic.name()
    }

    /// Translate a request.
    ///
    /// Any neural failure (resolution or inference) falls back to the generic
    /// service; a generic service failure is terminal.
    pub async fn translate(&self, request: &TranslationRequest) -> Result<Translation> {
        info!(
            "Translating \"{}\" {} -> {} with {}",
            preview(request.text(), 40),
            request.source(),
            request.target(),
            request.method()
        );

        let fell_back = match request.method() {
            TranslationMethod::NeuralPairwise => match self.translate_neural(request).await {
                Ok((text, kind)) => {
                    return Ok(Translation {
                        text,
                        method: TranslationMethod::NeuralPairwise,
                        pathway: Some(kind),
                        fell_back: false,
                    });
                }
                Err(e) => {
                    warn!("Neural translation failed: {}", e);
                    warn!("Falling back to {}", self.generic.name());
                    true
                }
            },
            TranslationMethod::GenericService => false,
        };

        let text = self
            .generic
            .translate(request.text(), request.source(), request.target())
            .await
            .map_err(|e| Error::TranslationFailed {
                stage: Stage::GenericService,
                cause: Box::new(e),
            })?;

        Ok(Translation {
            text,
            method: TranslationMethod::GenericService,
            pathway: None,
            fell_back,
        })
    }

    async fn translate_neural(&self, request: &TranslationRequest) -> Result<(String, PathwayKind)> {
        let pathway = self
            .resolver
            .resolve(request.source(), request.target())
            .await?;

        let text = pathway.execute(request.text()).await?;
        Ok((text, pathway.kind()))
    }
}
