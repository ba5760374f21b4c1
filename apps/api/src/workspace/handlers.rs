use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::ProjectSummary;
use crate::state::AppState;
use crate::workspace::state::WorkspaceSnapshot;

/// GET /api/v1/workspace
pub async fn handle_get_workspace(State(state): State<AppState>) -> Json<WorkspaceSnapshot> {
    Json(state.workspace.current().await.snapshot())
}

/// GET /api/v1/projects
///
/// Most recent first.
pub async fn handle_list_projects(State(state): State<AppState>) -> Json<Vec<ProjectSummary>> {
    Json(state.workspace.current().await.snapshot().projects)
}

/// POST /api/v1/projects/:id/select
pub async fn handle_select_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkspaceSnapshot>, AppError> {
    let snapshot = state
        .workspace
        .apply(|s| {
            let next = s.select_project(id)?;
            let snapshot = next.snapshot();
            Ok((next, snapshot))
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/v1/workspace/new
///
/// Clears the selection so the creation form is shown.
pub async fn handle_new_project(State(state): State<AppState>) -> Json<WorkspaceSnapshot> {
    state.workspace.update(|s| s.reset_to_new()).await;
    Json(state.workspace.current().await.snapshot())
}
