//! Project Generation: orchestrates one project-creation action.
//!
//! Flow: validate form against the draft (marks the workspace busy) →
//!       build parts → one generation call → store project or record failure.
//!
//! Nothing here retries. A failed call leaves no project behind; the user
//! resubmits, which is a brand-new call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::errors::{AppError, GENERATION_FAILED_MESSAGE};
use crate::generation::request_builder::build_parts;
use crate::llm_client::{ContentPart, LlmClient, LlmError};
use crate::models::project::{GeneratedFile, Project};
use crate::workspace::state::ProjectForm;
use crate::workspace::Workspace;

/// Backend that turns content parts into generated files.
///
/// Carried in `AppState` as `Arc<dyn ProjectGenerator>`; production uses
/// `LlmClient`, tests plug in a recording fake.
#[async_trait]
pub trait ProjectGenerator: Send + Sync {
    async fn generate(&self, parts: &[ContentPart]) -> Result<Vec<GeneratedFile>, LlmError>;
}

#[async_trait]
impl ProjectGenerator for LlmClient {
    async fn generate(&self, parts: &[ContentPart]) -> Result<Vec<GeneratedFile>, LlmError> {
        self.generate_files(parts).await
    }
}

/// Releases the workspace if a submission is dropped mid-call.
///
/// Axum drops the handler future when the client goes away. Without this the
/// busy flag set by `begin_generation` would never be cleared.
struct InFlight {
    workspace: Arc<Workspace>,
    armed: bool,
}

impl InFlight {
    fn new(workspace: &Arc<Workspace>) -> Self {
        Self {
            workspace: Arc::clone(workspace),
            armed: true,
        }
    }

    fn finish(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if self.armed {
            warn!("Generation abandoned before completion; releasing workspace");
            self.workspace
                .update_detached(|state| state.generation_failed(GENERATION_FAILED_MESSAGE));
        }
    }
}

/// Runs one project-creation action end to end.
pub async fn create_project(
    workspace: &Arc<Workspace>,
    generator: &dyn ProjectGenerator,
    form: ProjectForm,
) -> Result<Arc<Project>, AppError> {
    let submission = workspace
        .apply(|state| state.begin_generation(form))
        .await?;
    let in_flight = InFlight::new(workspace);
    let request = submission.request;

    let parts = build_parts(&request);
    info!(
        "Generating project '{}' ({} sources, {} parts)",
        submission.name,
        request.sources().len(),
        parts.len()
    );

    let files = match generator.generate(&parts).await {
        Ok(files) => files,
        Err(e) => {
            error!("Generation for '{}' failed: {e}", submission.name);
            workspace
                .update(|state| state.generation_failed(GENERATION_FAILED_MESSAGE))
                .await;
            in_flight.finish();
            return Err(AppError::Generation(e));
        }
    };

    if files.is_empty() {
        warn!("Project '{}' was generated with no files", submission.name);
    }

    let project = Project::new(
        submission.name,
        request.category(),
        request.language(),
        files,
    );
    let id = project.id;
    info!(
        "Created project {} with {} files",
        id,
        project.files.len()
    );

    workspace.update(|state| state.project_created(project)).await;
    in_flight.finish();

    workspace
        .current()
        .await
        .project(id)
        .cloned()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Project {id} vanished after insert")))
}
