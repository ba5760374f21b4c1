//! Axum route handlers for the Generation API.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::generation::generator::create_project;
use crate::models::project::Project;
use crate::state::AppState;
use crate::workspace::state::ProjectForm;

/// POST /api/v1/projects
///
/// Submits the creation form. Uses the reference and sources already uploaded
/// to the draft, makes exactly one generation call, and returns the stored,
/// selected project.
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(form): Json<ProjectForm>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let project = create_project(&state.workspace, state.generator.as_ref(), form).await?;
    Ok((StatusCode::CREATED, Json(project.as_ref().clone())))
}
