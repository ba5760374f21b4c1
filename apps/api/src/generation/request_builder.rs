//! Generation Request Builder: turns a validated submission into Gemini parts.
//!
//! Part order: instruction block, reference document, then every source in
//! upload order. Each document contributes exactly one part, chosen by the
//! attachment strategy resolved at intake.

use std::sync::Arc;

use crate::errors::{AppError, INCOMPLETE_FORM_MESSAGE};
use crate::generation::prompts::{
    ARTICLE_LAYOUT_RULE, BOOK_LAYOUT_RULE, PROJECT_PROMPT_TEMPLATE, REFERENCE_CONTENT_HEADER,
    SOURCE_CONTENT_HEADER,
};
use crate::intake::{AttachmentStrategy, FilePayload};
use crate::llm_client::ContentPart;
use crate::models::project::{OutputLanguage, ProjectCategory};

/// Declared content type of the portable-document binary attachments.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Everything one generation call needs. Always holds at least one source.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    category: ProjectCategory,
    language: OutputLanguage,
    instructions: String,
    reference: Arc<FilePayload>,
    sources: Vec<Arc<FilePayload>>,
}

impl GenerationRequest {
    pub fn new(
        category: ProjectCategory,
        language: OutputLanguage,
        instructions: String,
        reference: Arc<FilePayload>,
        sources: Vec<Arc<FilePayload>>,
    ) -> Result<Self, AppError> {
        if sources.is_empty() {
            return Err(AppError::Validation(INCOMPLETE_FORM_MESSAGE.to_string()));
        }
        Ok(Self {
            category,
            language,
            instructions,
            reference,
            sources,
        })
    }

    pub fn category(&self) -> ProjectCategory {
        self.category
    }

    pub fn language(&self) -> OutputLanguage {
        self.language
    }

    pub fn sources(&self) -> &[Arc<FilePayload>] {
        &self.sources
    }
}

/// Builds the full list of content parts for one generation call.
pub fn build_parts(request: &GenerationRequest) -> Vec<ContentPart> {
    let mut parts = Vec::with_capacity(request.sources.len() + 2);
    parts.push(ContentPart::text(instruction_block(request)));
    parts.push(attachment(&request.reference, REFERENCE_CONTENT_HEADER));
    parts.extend(
        request
            .sources
            .iter()
            .map(|source| attachment(source, SOURCE_CONTENT_HEADER)),
    );
    parts
}

fn instruction_block(request: &GenerationRequest) -> String {
    let layout_rule = match request.category {
        ProjectCategory::Book => BOOK_LAYOUT_RULE,
        ProjectCategory::Article => ARTICLE_LAYOUT_RULE,
    };
    let source_names = request
        .sources
        .iter()
        .map(|s| s.display_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    fill_template(
        PROJECT_PROMPT_TEMPLATE,
        &[
            ("category", request.category.as_str()),
            ("layout_rule", layout_rule),
            ("language", request.language.display_name()),
            ("instructions", &request.instructions),
            ("reference_name", &request.reference.display_name),
            ("source_names", &source_names),
        ],
    )
}

/// Replaces each `{key}` of `template` in a single left-to-right pass.
///
/// Substituted values are copied verbatim and never scanned again, so file
/// names and instructions may contain braces. Unknown keys are left as is.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn attachment(payload: &FilePayload, header_template: &str) -> ContentPart {
    match payload.strategy {
        AttachmentStrategy::BinaryAttachment => {
            ContentPart::inline_data(PDF_MIME_TYPE, payload.encoded_bytes.clone())
        }
        AttachmentStrategy::InlineText => {
            let header = fill_template(header_template, &[("name", &payload.display_name)]);
            let body = payload.extracted_text.as_deref().unwrap_or_default();
            ContentPart::text(format!("{header}\n{body}"))
        }
    }
}
