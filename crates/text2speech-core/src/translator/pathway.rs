use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Lang;
use crate::error::{Error, Result};
use super::traits::{ModelRegistry, PairwiseModel};

/// Shape of a neural pathway, without its models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathwayKind {
    Direct,
    Chained,
}

impl fmt::Display for PathwayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::Chained => f.write_str("chained"),
        }
    }
}

/// Models that carry a request from source to target language.
///
/// A chained pathway goes through the pivot language; the intermediate text
/// never leaves [`TranslationPathway::execute`].
#[derive(Clone)]
pub enum TranslationPathway {
    Direct(Arc<dyn PairwiseModel>),
    Chained {
        first: Arc<dyn PairwiseModel>,
        second: Arc<dyn PairwiseModel>,
    },
}

impl TranslationPathway {
    pub const fn kind(&self) -> PathwayKind {
        match self {
            Self::Direct(_) => PathwayKind::Direct,
            Self::Chained { .. } => PathwayKind::Chained,
        }
    }

    /// Model ids in execution order.
    pub fn model_ids(&self) -> Vec<&str> {
        match self {
            Self::Direct(model) => vec![model.id()],
            Self::Chained { first, second } => vec![first.id(), second.id()],
        }
    }

    /// Run the pathway. A chained second leg receives the first leg's output as-is.
    pub async fn execute(&self, text: &str) -> Result<String> {
        match self {
            Self::Direct(model) => model.generate(text).await,
            Self::Chained { first, second } => {
                let intermediate = first.generate(text).await?;
                debug!("{} produced {} chars", first.id(), intermediate.chars().count());
                second.generate(&intermediate).await
            }
        }
    }
}

impl fmt::Debug for TranslationPathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationPathway")
            .field("kind", &self.kind())
            .field("models", &self.model_ids())
            .finish()
    }
}

/// Picks a direct model for a pair, or a chain through the pivot language.
pub struct Resolver {
    registry: Arc<dyn ModelRegistry>,
    pivot: Lang,
}

impl Resolver {
    pub fn new(registry: Arc<dyn ModelRegistry>, pivot: Lang) -> Self {
        Self { registry, pivot }
    }

    pub const fn pivot(&self) -> &Lang {
        &self.pivot
    }

    /// Resolve a pathway for `source -> target`.
    ///
    /// Only a missing direct model leads to chaining; a missing leg of the
    /// chain fails the whole resolution.
    pub async fn resolve(&self, source: &Lang, target: &Lang) -> Result<TranslationPathway> {
        for lang in [source, target] {
            if lang.is_empty() {
                return Err(Error::InvalidLanguage(lang.to_string()));
            }
        }

        let direct_err = match self.registry.acquire(source, target).await {
            Ok(model) => {
                info!("Using direct model {}", model.id());
                return Ok(TranslationPathway::Direct(model));
            }
            Err(e) => e,
        };

        // A chain needs two distinct legs through the pivot
        if *source == self.pivot || *target == self.pivot {
            return Err(direct_err);
        }

        info!(
            "No direct model for {} -> {} ({}), chaining through {}",
            source, target, direct_err, self.pivot
        );

        let first = self.registry.acquire(source, &self.pivot).await?;
        let second = self.registry.acquire(&self.pivot, target).await?;

        Ok(TranslationPathway::Chained { first, second })
    }
}
