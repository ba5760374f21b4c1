// Viewer: read-only presentation of one project's files.
// Switching the active file builds a new view; the project is never touched.

pub mod handlers;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{GeneratedFile, OutputLanguage, Project, ProjectCategory};

const EXPORT_SUFFIX: &str = "_latex_project.json";

/// A project plus the index of its active file.
#[derive(Debug, Clone, Copy)]
pub struct ProjectView<'a> {
    project: &'a Project,
    active: Option<usize>,
}

impl<'a> ProjectView<'a> {
    /// Opens a project with its first file active (none if it has no files).
    pub fn open(project: &'a Project) -> Self {
        Self {
            project,
            active: (!project.files.is_empty()).then_some(0),
        }
    }

    /// Returns a view with the file at `path` active.
    pub fn activate(self, path: &str) -> Result<Self, AppError> {
        let index = self
            .project
            .files
            .iter()
            .position(|f| f.path == path)
            .ok_or_else(|| AppError::NotFound(format!("File {path} not found in project")))?;
        Ok(Self {
            active: Some(index),
            ..self
        })
    }

    pub fn active_file(&self) -> Option<&'a GeneratedFile> {
        self.active.map(|i| &self.project.files[i])
    }

    pub fn render(&self) -> ProjectViewResponse {
        ProjectViewResponse {
            id: self.project.id,
            name: self.project.name.clone(),
            category: self.project.category,
            language: self.project.language,
            language_name: self.project.language.display_name(),
            files: self
                .project
                .files
                .iter()
                .enumerate()
                .map(|(i, f)| FileEntry {
                    name: f.name.clone(),
                    path: f.path.clone(),
                    is_tex: f.is_tex(),
                    active: self.active == Some(i),
                })
                .collect(),
            active_file: self.active_file().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_tex: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectViewResponse {
    pub id: Uuid,
    pub name: String,
    pub category: ProjectCategory,
    pub language: OutputLanguage,
    pub language_name: &'static str,
    pub files: Vec<FileEntry>,
    pub active_file: Option<GeneratedFile>,
}

/// `<name>_latex_project.json`, with every run of whitespace in the name
/// replaced by a single underscore.
pub fn export_filename(project_name: &str) -> String {
    let mut out = String::with_capacity(project_name.len() + EXPORT_SUFFIX.len());
    let mut in_whitespace = false;
    for c in project_name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out.push_str(EXPORT_SUFFIX);
    out
}

/// Pretty-printed JSON array of the project's files.
pub fn export_body(project: &Project) -> Result<String, AppError> {
    serde_json::to_string_pretty(&project.files)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize export: {e}")))
}
