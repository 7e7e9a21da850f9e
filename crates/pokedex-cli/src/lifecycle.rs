//! Service lifecycle
//!
//! The listener comes up before the model is loaded. Until [`Lifecycle::mark_ready`]
//! is called the router only answers the probes; everything else gets a 503.
//! Once ready, the [`ServiceContext`] is fixed for the rest of the process.

use crate::config::Config;
use pokedex_runtime::{
    prepare_model, ArtifactFetcher, CardCatalog, FeedbackLog, Predictor, StartupError,
};
use std::sync::{Arc, OnceLock};
use std::time::Instant;
use tracing::info;

/// Everything a request handler may read
pub struct ServiceContext {
    pub predictor: Arc<dyn Predictor>,
    pub catalog: CardCatalog,
    pub feedback: FeedbackLog,
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("predictor", &self.predictor.name())
            .field("cards", &self.catalog.len())
            .field("feedback", &self.feedback.path())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotReady,
    Ready,
}

#[derive(Debug, thiserror::Error)]
#[error("Service context already installed")]
pub struct AlreadyReady;

/// Two-phase holder for the service context
#[derive(Debug)]
pub struct Lifecycle {
    context: OnceLock<Arc<ServiceContext>>,
    pub start_time: Instant,
}

pub type SharedLifecycle = Arc<Lifecycle>;

impl Lifecycle {
    /// A lifecycle in the not-ready phase
    pub fn new() -> SharedLifecycle {
        Arc::new(Self {
            context: OnceLock::new(),
            start_time: Instant::now(),
        })
    }

    /// A lifecycle that is ready from the start
    pub fn ready(context: ServiceContext) -> SharedLifecycle {
        Arc::new(Self {
            context: OnceLock::from(Arc::new(context)),
            start_time: Instant::now(),
        })
    }

    /// Install the context. Only the first call succeeds.
    pub fn mark_ready(&self, context: ServiceContext) -> Result<(), AlreadyReady> {
        self.context
            .set(Arc::new(context))
            .map_err(|_| AlreadyReady)
    }

    pub fn context(&self) -> Option<Arc<ServiceContext>> {
        self.context.get().cloned()
    }

    pub fn phase(&self) -> Phase {
        if self.context.get().is_some() {
            Phase::Ready
        } else {
            Phase::NotReady
        }
    }
}

/// Run the startup sequence: model artifacts, model, card catalog.
pub async fn bootstrap(config: &Config) -> Result<ServiceContext, StartupError> {
    let fetcher = ArtifactFetcher::new();
    let predictor = prepare_model(&fetcher, &config.model.sources(), config.model.spec()).await?;

    info!("Loading card catalog from {}", config.cards.path.display());
    let catalog = CardCatalog::load(&config.cards.path)?;
    info!("Loaded {} cards", catalog.len());

    Ok(ServiceContext {
        predictor,
        catalog,
        feedback: FeedbackLog::new(&config.feedback.path),
    })
}
