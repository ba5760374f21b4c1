// All LLM prompt constants for the Generation module.

/// Instruction block sent as the first part of every generation call.
/// Replace: {category}, {layout_rule}, {language}, {instructions},
///          {reference_name}, {source_names}
pub const PROJECT_PROMPT_TEMPLATE: &str = r#"You are a world-class LaTeX architect.
Task: Convert the following source documents into a professional LaTeX project.
Output Format: A JSON object containing multiple files.

Requirements:
1. Use the style and structure implied by the Reference Document provided.
2. Structure the project as a {category}.
3. {layout_rule}
4. Output language: {language}.
5. Additional Instructions: {instructions}

Sources to process:
- Reference Document (Template): {reference_name}
- Content Documents: {source_names}"#;

/// Layout rule for `book` projects.
pub const BOOK_LAYOUT_RULE: &str =
    "Create a main.tex file and separate chapter files in a 'chapters/' folder.";

/// Layout rule for `article` projects.
pub const ARTICLE_LAYOUT_RULE: &str = "Use a single file with a structured sections approach.";

/// Header placed above the extracted text of the reference document.
/// Replace: {name}
pub const REFERENCE_CONTENT_HEADER: &str = "--- REFERENCE DOCUMENT CONTENT ({name}) ---";

/// Header placed above the extracted text of each source document.
/// Replace: {name}
pub const SOURCE_CONTENT_HEADER: &str = "--- SOURCE DOCUMENT CONTENT ({name}) ---";
