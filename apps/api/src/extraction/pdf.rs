use std::panic;

/// Concatenates the text of every page in page order. Pages without
/// extractable text contribute an empty string.
///
/// pdf-extract can panic on malformed font programs, so the panic is caught
/// and reported as corruption like any other parse failure.
pub(super) fn extract_pdf_text(bytes: &[u8]) -> Result<String, String> {
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| "PDF parser aborted on malformed content".to_string())?
        .map_err(|e| format!("Failed to extract text from PDF: {e}"))?;

    tracing::debug!("PDF has {} pages", pages.len());
    Ok(pages.concat())
}
