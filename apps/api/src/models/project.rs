use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the generated LaTeX project is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectCategory {
    /// `main.tex` plus one file per chapter under `chapters/`.
    #[default]
    Book,
    /// A single file structured by sections.
    Article,
}

impl ProjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Book => "book",
            ProjectCategory::Article => "article",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputLanguage {
    #[default]
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "en")]
    English,
}

impl OutputLanguage {
    /// Human-readable name, used both in the prompt and in the viewer header.
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputLanguage::Spanish => "Spanish",
            OutputLanguage::English => "English",
        }
    }
}

/// One named text artifact returned by the generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub name: String,
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn is_tex(&self) -> bool {
        self.name.ends_with(".tex")
    }
}

/// A named, immutable bundle of generated files.
///
/// Created once per successful generation call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub category: ProjectCategory,
    pub language: OutputLanguage,
    pub files: Vec<GeneratedFile>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        name: String,
        category: ProjectCategory,
        language: OutputLanguage,
        files: Vec<GeneratedFile>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            category,
            language,
            files,
            created_at: Utc::now(),
        }
    }
}

/// Sidebar entry for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub category: ProjectCategory,
    pub language: OutputLanguage,
    pub file_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            category: project.category,
            language: project.language,
            file_count: project.files.len(),
            created_at: project.created_at,
        }
    }
}
