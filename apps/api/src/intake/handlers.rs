//! Axum route handlers for document intake.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::intake::{intake_batch, DocumentRole, UploadedFile};
use crate::state::AppState;
use crate::workspace::state::DraftSummary;

/// POST /api/v1/intake/reference
///
/// Replaces the reference document with the first uploaded file.
pub async fn handle_upload_reference(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DraftSummary>, AppError> {
    upload(&state, DocumentRole::Reference, multipart).await
}

/// POST /api/v1/intake/sources
///
/// Appends the uploaded files to the source documents.
pub async fn handle_upload_sources(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<DraftSummary>, AppError> {
    upload(&state, DocumentRole::Source, multipart).await
}

async fn upload(
    state: &AppState,
    role: DocumentRole,
    multipart: Multipart,
) -> Result<Json<DraftSummary>, AppError> {
    if state.workspace.current().await.is_generating() {
        return Err(AppError::Busy(
            "Uploads are disabled while a project is being generated".to_string(),
        ));
    }

    let files = read_files(multipart).await?;
    if files.is_empty() {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }
    let count = files.len();

    let payloads = tokio::task::spawn_blocking(move || intake_batch(role, files))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Intake task failed: {e}")))??;

    let summary = state
        .workspace
        .apply(|s| {
            let next = match role {
                DocumentRole::Reference => s.with_reference(payloads)?,
                DocumentRole::Source => s.with_sources(payloads)?,
            };
            let summary = next.snapshot().draft;
            Ok((next, summary))
        })
        .await?;

    info!("Accepted {count} {role:?} file(s)");
    Ok(Json(summary))
}

/// Collects every multipart field that carries a file name.
async fn read_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to parse multipart data: {e}")))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
        files.push(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }
    Ok(files)
}
