//! Plain-text extraction from fetched case documents

use casebrief_common::{CaseBriefError, Result};

/// Wrap width for rendered HTML; wide enough to keep paragraphs on one line
const HTML_RENDER_WIDTH: usize = 10_000;

/// Render HTML to plain text, one block per line with blank lines dropped
pub fn html_to_text(html: &str) -> Result<String> {
    let rendered = html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH)
        .map_err(|e| CaseBriefError::extraction(format!("Failed to render HTML: {}", e)))?;

    Ok(rendered
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Extract text from PDF bytes, one page after another
#[cfg(feature = "pdf")]
pub fn pdf_to_text(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| CaseBriefError::extraction(format!("Failed to read PDF: {}", e)))
}
