//! The response shape requested from the model, and the local check that the
//! reply actually has it.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::llm_client::LlmError;
use crate::models::project::GeneratedFile;

/// `responseSchema` sent with every generation call:
/// `{ files: [{ name, content, path }] }`, all inner fields required.
pub fn project_files_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "files": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": {
                            "type": "STRING",
                            "description": "Filename e.g. main.tex, chapters/introduction.tex"
                        },
                        "content": {
                            "type": "STRING",
                            "description": "Full LaTeX code for this file"
                        },
                        "path": {
                            "type": "STRING",
                            "description": "Path e.g. 'main.tex' or 'chapters/intro.tex'"
                        }
                    },
                    "required": ["name", "content", "path"]
                }
            }
        },
        "required": ["files"]
    })
}

/// Parses the model's JSON text into generated files.
///
/// An absent or null `files` field yields an empty list. Anything else that
/// does not match the schema is a `MalformedResponse`; no partial list is
/// ever returned.
pub fn parse_project_files(text: &str) -> Result<Vec<GeneratedFile>, LlmError> {
    let value: Value = serde_json::from_str(text)?;

    let object = value
        .as_object()
        .ok_or_else(|| LlmError::MalformedResponse("reply is not a JSON object".to_string()))?;

    let records = match object.get("files") {
        None | Some(Value::Null) => {
            warn!("Generation reply has no `files` field; treating as zero files");
            return Ok(Vec::new());
        }
        Some(Value::Array(records)) => records,
        Some(_) => {
            return Err(LlmError::MalformedResponse(
                "`files` is not an array".to_string(),
            ))
        }
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let record = record.as_object().ok_or_else(|| {
                LlmError::MalformedResponse(format!("file record {index} is not an object"))
            })?;
            Ok(GeneratedFile {
                name: required_string(record, "name", index)?,
                path: required_string(record, "path", index)?,
                content: required_string(record, "content", index)?,
            })
        })
        .collect()
}

fn required_string(
    record: &Map<String, Value>,
    field: &str,
    index: usize,
) -> Result<String, LlmError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| {
            LlmError::MalformedResponse(format!("file record {index} is missing string `{field}`"))
        })
}
