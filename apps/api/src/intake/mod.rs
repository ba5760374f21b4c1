// Document intake: turns uploaded files into transport-ready payloads.
// Each payload carries its attachment strategy so request building never
// has to look at file extensions again.

pub mod docx;
pub mod handlers;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

const DOCX_EXTENSION: &str = ".docx";
const PDF_EXTENSION: &str = ".pdf";
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("unsupported file type for {role:?} upload: {name}")]
    UnsupportedExtension { name: String, role: DocumentRole },

    #[error("not a valid zip container: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("word/document.xml not found in archive")]
    MissingDocumentXml,

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

/// Which slot of the draft an upload batch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    /// The single document whose style the output imitates. `.docx` only.
    Reference,
    /// Documents whose content is converted. `.docx` or `.pdf`.
    Source,
}

impl DocumentRole {
    fn accepts(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        match self {
            DocumentRole::Reference => lower.ends_with(DOCX_EXTENSION),
            DocumentRole::Source => {
                lower.ends_with(DOCX_EXTENSION) || lower.ends_with(PDF_EXTENSION)
            }
        }
    }
}

/// How a payload is handed to the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentStrategy {
    /// Locally extracted text, sent as a text block.
    InlineText,
    /// Raw bytes, sent as base64 inline data.
    BinaryAttachment,
}

/// One uploaded file, decoded and ready to be attached to a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub display_name: String,
    pub mime_type: String,
    /// Standard base64 of the raw file bytes.
    pub encoded_bytes: String,
    pub extracted_text: Option<String>,
    pub strategy: AttachmentStrategy,
}

/// A file as received from the multipart body, before decoding.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Decodes one upload batch. Any failing file aborts the whole batch.
pub fn intake_batch(
    role: DocumentRole,
    files: Vec<UploadedFile>,
) -> Result<Vec<FilePayload>, IntakeError> {
    files
        .into_iter()
        .map(|file| intake_file(role, file))
        .collect()
}

fn intake_file(role: DocumentRole, file: UploadedFile) -> Result<FilePayload, IntakeError> {
    if !role.accepts(&file.name) {
        return Err(IntakeError::UnsupportedExtension {
            name: file.name,
            role,
        });
    }

    let is_docx = file.name.to_lowercase().ends_with(DOCX_EXTENSION);
    let extracted_text = if is_docx {
        Some(docx::extract_text(&file.bytes)?)
    } else {
        None
    };
    let strategy = if is_docx {
        AttachmentStrategy::InlineText
    } else {
        AttachmentStrategy::BinaryAttachment
    };

    debug!(
        "Decoded {} ({} bytes, {:?})",
        file.name,
        file.bytes.len(),
        strategy
    );

    Ok(FilePayload {
        encoded_bytes: BASE64.encode(&file.bytes),
        mime_type: file
            .content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string()),
        display_name: file.name,
        extracted_text,
        strategy,
    })
}
