mod google;
mod opus;
mod orchestrator;
mod pathway;
mod request;
mod traits;

pub use google::GoogleTranslator;
pub use opus::{HubModel, HubModelRegistry};
pub use orchestrator::Orchestrator;
pub use pathway::{PathwayKind, Resolver, TranslationPathway};
pub use request::{Translation, TranslationMethod, TranslationRequest};
pub use traits::{ModelRegistry, PairwiseModel, Translator, TranslatorInfo};

use crate::config::AppConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create the generic translation service from configuration
pub fn create_translator(config: &AppConfig) -> Result<Arc<dyn Translator>> {
    Ok(Arc::new(GoogleTranslator::new(&config.generic)?))
}

/// Create the pairwise model registry from configuration
pub fn create_registry(config: &AppConfig) -> Result<Arc<dyn ModelRegistry>> {
    Ok(Arc::new(HubModelRegistry::new(&config.neural, &config.registry)?))
}

/// Create an orchestrator wired to the configured backends
pub fn create_orchestrator(config: &AppConfig) -> Result<Orchestrator> {
    let resolver = Resolver::new(create_registry(config)?, config.neural.pivot_lang.clone());
    Ok(Orchestrator::new(resolver, create_translator(config)?))
}
