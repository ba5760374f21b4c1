use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::ProjectGenerator;
use crate::workspace::Workspace;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single in-memory project store.
    pub workspace: Arc<Workspace>,
    /// Pluggable generation backend. Default: `LlmClient` against Gemini.
    pub generator: Arc<dyn ProjectGenerator>,
    pub config: Config,
}
