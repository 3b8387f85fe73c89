//! Document composition.
//!
//! Turns the three source buffers into a single self-contained HTML
//! document. Nothing is escaped or sanitized: the buffers are the user's own
//! code and are meant to run as written in the preview surface.

use std::sync::LazyLock;

use regex::Regex;

use crate::buffer::SourceBuffers;

/// File name used when the project has no name.
pub const FALLBACK_EXPORT_STEM: &str = "untitled-pen";

/// Whitespace and characters that would split a file name into path parts.
static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s/\\:]").expect("separator pattern is valid"));

/// Compose a preview document.
///
/// The style lands in the head, the markup in the body, and the script in
/// the body after the markup so it runs once the markup nodes exist.
pub fn compose(markup: &str, style: &str, script: &str) -> String {
    let mut doc = String::with_capacity(markup.len() + style.len() + script.len() + 128);
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<style>");
    doc.push_str(style);
    doc.push_str("</style>\n</head>\n<body>\n");
    doc.push_str(markup);
    doc.push_str("\n<script>");
    doc.push_str(script);
    doc.push_str("</script>\n</body>\n</html>\n");
    doc
}

/// Compose a preview document from a buffer set.
pub fn compose_buffers(buffers: &SourceBuffers) -> String {
    compose(buffers.markup(), buffers.style(), buffers.script())
}

/// Build the standalone document written by export.
///
/// Same layout as [`compose`], plus a language tag, charset and viewport
/// metadata, and a title.
pub fn export_document(buffers: &SourceBuffers, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{style}
    </style>
</head>
<body>
{markup}
    <script>
{script}
    </script>
</body>
</html>
"#,
        style = buffers.style(),
        markup = buffers.markup(),
        script = buffers.script(),
    )
}

/// Derive the export file name from a project name.
///
/// Lower-cases the name and turns every whitespace or path separator
/// character into a hyphen. Leading dots are dropped, so the result is
/// always a single plain file name.
pub fn export_file_name(project_name: &str) -> String {
    let lowered = project_name.to_lowercase();
    let slug = NAME_SEPARATORS.replace_all(&lowered, "-");
    let stem = slug.trim_start_matches('.');
    if stem.is_empty() {
        format!("{FALLBACK_EXPORT_STEM}.html")
    } else {
        format!("{stem}.html")
    }
}
