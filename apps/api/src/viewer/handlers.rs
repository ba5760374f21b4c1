use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::Project;
use crate::state::AppState;
use crate::viewer::{export_body, export_filename, ProjectView, ProjectViewResponse};

#[derive(Debug, Deserialize)]
pub struct ActiveFileQuery {
    /// Path of the file to show; the first file when absent.
    pub file: Option<String>,
}

async fn find_project(state: &AppState, id: Uuid) -> Result<std::sync::Arc<Project>, AppError> {
    state
        .workspace
        .current()
        .await
        .project(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))
}

fn view<'a>(project: &'a Project, query: &ActiveFileQuery) -> Result<ProjectView<'a>, AppError> {
    let view = ProjectView::open(project);
    match &query.file {
        Some(path) => view.activate(path),
        None => Ok(view),
    }
}

/// GET /api/v1/projects/:id/view
pub async fn handle_view_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActiveFileQuery>,
) -> Result<Json<ProjectViewResponse>, AppError> {
    let project = find_project(&state, id).await?;
    Ok(Json(view(&project, &query)?.render()))
}

/// GET /api/v1/projects/:id/raw
///
/// Raw text of the active file, for copying to the clipboard.
pub async fn handle_raw_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActiveFileQuery>,
) -> Result<impl IntoResponse, AppError> {
    let project = find_project(&state, id).await?;
    let content = view(&project, &query)?
        .active_file()
        .map(|f| f.content.clone())
        .ok_or_else(|| AppError::NotFound(format!("Project {id} has no files")))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    ))
}

/// GET /api/v1/projects/:id/export
///
/// The whole file set as a downloadable JSON document.
pub async fn handle_export_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = find_project(&state, id).await?;
    let body = export_body(&project)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(&project.name).replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
