//! Model-backed debate participants.
//!
//! The advocates (`ArgumentGenerator`) and the judge (`DecisionRenderer`)
//! share one `Collaborators` bundle: the completion backend plus the two
//! lookup tools. Production wiring comes from `DebateSettings`; tests pass
//! in mocks or scripted fakes.

pub mod advocate;
pub mod judge;

use std::sync::Arc;
use std::time::Duration;

use crate::backend::{CompletionBackend, CompletionRequest, RigBackend};
use crate::config::DebateSettings;
use crate::errors::{DebateError, Stage};
use crate::tools::{HttpProductPage, ProductPage, ReviewSearch, TavilySearch};

pub use advocate::{ArgumentGenerator, ResearchNotes};
pub use judge::DecisionRenderer;

/// External services a debate run depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub backend: Arc<dyn CompletionBackend>,
    pub search: Arc<dyn ReviewSearch>,
    pub page: Arc<dyn ProductPage>,
}

impl Collaborators {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        search: Arc<dyn ReviewSearch>,
        page: Arc<dyn ProductPage>,
    ) -> Self {
        Self {
            backend,
            search,
            page,
        }
    }

    /// Build the rig backend and HTTP tools.
    pub fn from_settings(settings: &DebateSettings) -> Result<Self, DebateError> {
        let timeout = settings.call_timeout();
        let backend = RigBackend::from_settings(&settings.model)
            .map_err(|e| DebateError::Configuration(e.to_string()))?;
        let search = TavilySearch::new(&settings.search, timeout)
            .map_err(|e| DebateError::Configuration(e.to_string()))?;
        let page = HttpProductPage::new(&settings.scrape, timeout)
            .map_err(|e| DebateError::Configuration(e.to_string()))?;
        Ok(Self::new(Arc::new(backend), Arc::new(search), Arc::new(page)))
    }
}

/// Run one completion under a deadline. Transport errors and timeouts both
/// surface as `ExternalCallFailure` for `stage`.
pub(crate) async fn complete_within(
    backend: &dyn CompletionBackend,
    request: CompletionRequest,
    deadline: Duration,
    stage: Stage,
) -> Result<String, DebateError> {
    match tokio::time::timeout(deadline, backend.complete(request)).await {
        Ok(Ok(reply)) => Ok(reply),
        Ok(Err(e)) => Err(DebateError::external(stage, e.to_string())),
        Err(_) => Err(DebateError::external(
            stage,
            format!("timed out after {deadline:?}"),
        )),
    }
}
