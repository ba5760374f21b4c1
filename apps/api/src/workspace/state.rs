//! Workspace state and its transitions.
//!
//! `WorkspaceState` is a plain value. Every user action is a method that takes
//! the current snapshot and returns the next one; the controller in
//! `workspace::Workspace` only swaps snapshots. Projects and payloads are
//! shared through `Arc`, so a transition copies pointers, not documents.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, INCOMPLETE_FORM_MESSAGE};
use crate::generation::request_builder::GenerationRequest;
use crate::intake::FilePayload;
use crate::models::project::{OutputLanguage, Project, ProjectCategory, ProjectSummary};

/// The creation form's uploaded documents.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub reference: Option<Arc<FilePayload>>,
    pub sources: Vec<Arc<FilePayload>>,
}

impl Draft {
    fn is_empty(&self) -> bool {
        self.reference.is_none() && self.sources.is_empty()
    }
}

/// The options typed into the creation form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: ProjectCategory,
    #[serde(default)]
    pub language: OutputLanguage,
    #[serde(default)]
    pub instructions: String,
}

/// A validated submission, ready for the generation call.
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub request: GenerationRequest,
}

#[derive(Debug, Clone, Default)]
pub struct WorkspaceState {
    /// Most recent first.
    projects: Vec<Arc<Project>>,
    selected: Option<Uuid>,
    draft: Draft,
    generating: bool,
    last_error: Option<String>,
}

impl WorkspaceState {
    pub fn projects(&self) -> &[Arc<Project>] {
        &self.projects
    }

    pub fn selected(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn project(&self, id: Uuid) -> Option<&Arc<Project>> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Replaces the reference slot with the first payload of the batch.
    pub fn with_reference(&self, payloads: Vec<FilePayload>) -> Result<Self, AppError> {
        self.ensure_idle()?;
        let reference = payloads
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Validation("No reference file uploaded".to_string()))?;
        Ok(Self {
            draft: Draft {
                reference: Some(Arc::new(reference)),
                sources: self.draft.sources.clone(),
            },
            ..self.clone()
        })
    }

    /// Appends a batch of source payloads after any earlier uploads.
    pub fn with_sources(&self, payloads: Vec<FilePayload>) -> Result<Self, AppError> {
        self.ensure_idle()?;
        if payloads.is_empty() {
            return Err(AppError::Validation("No source files uploaded".to_string()));
        }
        let mut sources = self.draft.sources.clone();
        sources.extend(payloads.into_iter().map(Arc::new));
        Ok(Self {
            draft: Draft {
                reference: self.draft.reference.clone(),
                sources,
            },
            ..self.clone()
        })
    }

    /// Validates the form against the draft and marks a generation as outstanding.
    pub fn begin_generation(&self, form: ProjectForm) -> Result<(Self, Submission), AppError> {
        self.ensure_idle()?;

        let name = form.name.trim();
        let reference = match &self.draft.reference {
            Some(reference) if !name.is_empty() && !self.draft.sources.is_empty() => {
                reference.clone()
            }
            _ => return Err(AppError::Validation(INCOMPLETE_FORM_MESSAGE.to_string())),
        };

        let request = GenerationRequest::new(
            form.category,
            form.language,
            form.instructions,
            reference,
            self.draft.sources.clone(),
        )?;
        let submission = Submission {
            name: name.to_string(),
            request,
        };

        let next = Self {
            generating: true,
            last_error: None,
            ..self.clone()
        };
        Ok((next, submission))
    }

    /// Stores a freshly generated project at the head of the list and selects it.
    pub fn project_created(&self, project: Project) -> Self {
        let id = project.id;
        let mut projects = Vec::with_capacity(self.projects.len() + 1);
        projects.push(Arc::new(project));
        projects.extend(self.projects.iter().cloned());
        Self {
            projects,
            selected: Some(id),
            draft: Draft::default(),
            generating: false,
            last_error: None,
        }
    }

    /// Clears the busy flag and records the user-facing error. The draft is kept.
    pub fn generation_failed(&self, message: &str) -> Self {
        Self {
            generating: false,
            last_error: Some(message.to_string()),
            ..self.clone()
        }
    }

    /// Shows an existing project. Leaving the form discards its draft.
    pub fn select_project(&self, id: Uuid) -> Result<Self, AppError> {
        if self.project(id).is_none() {
            return Err(AppError::NotFound(format!("Project {id} not found")));
        }
        Ok(Self {
            selected: Some(id),
            draft: Draft::default(),
            ..self.clone()
        })
    }

    /// Shows the creation form. A form reached from a project starts empty.
    pub fn reset_to_new(&self) -> Self {
        let draft = if self.selected.is_some() {
            Draft::default()
        } else {
            self.draft.clone()
        };
        Self {
            selected: None,
            draft,
            ..self.clone()
        }
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        if self.generating {
            return Err(AppError::Busy(
                "A project is already being generated".to_string(),
            ));
        }
        Ok(())
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            projects: self
                .projects
                .iter()
                .map(|p| ProjectSummary::from(p.as_ref()))
                .collect(),
            selected_project_id: self.selected,
            generating: self.generating,
            last_error: self.last_error.clone(),
            draft: DraftSummary {
                reference: self.draft.reference.as_ref().map(|r| r.display_name.clone()),
                sources: self
                    .draft
                    .sources
                    .iter()
                    .map(|s| s.display_name.clone())
                    .collect(),
                is_empty: self.draft.is_empty(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSummary {
    pub reference: Option<String>,
    pub sources: Vec<String>,
    pub is_empty: bool,
}

/// What the UI needs to render the sidebar and the main pane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub projects: Vec<ProjectSummary>,
    pub selected_project_id: Option<Uuid>,
    pub generating: bool,
    pub last_error: Option<String>,
    pub draft: DraftSummary,
}
