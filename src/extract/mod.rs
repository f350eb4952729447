//! PDF text extraction boundary.
//!
//! Pure Rust extraction via pdf-extract - no pdfium or other system
//! libraries required. Classification only needs the text layer, so the
//! extractor is a trait and the real implementation stays swappable in
//! tests.

use std::path::Path;

use crate::error::ExtractError;

/// Extracts the text layer of a document, one string per page.
///
/// A scanned or image-only PDF extracts successfully as empty pages;
/// deciding what to do with missing text is the caller's job.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractError>;
}

/// Join extracted pages into the single haystack the field patterns run
/// against. Pages are separated by a newline so line-anchored patterns
/// keep working across page boundaries.
pub fn join_pages(pages: &[String]) -> String {
    pages.join("\n")
}

/// `TextExtractor` backed by the `pdf-extract` crate.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractError> {
        let bytes = std::fs::read(path).map_err(|e| ExtractError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::debug!(
            "[PdfTextExtractor] read {} bytes from {}",
            bytes.len(),
            path.display()
        );

        // pdf-extract (and its font parsing) can panic on certain
        // malformed glyph tables, so the call is isolated with catch_unwind.
        let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        })) {
            Ok(Ok(pages)) => pages,
            Ok(Err(e)) => {
                tracing::warn!(
                    "[PdfTextExtractor] extraction failed for {}: {}",
                    path.display(),
                    e
                );
                return Err(ExtractError::Unreadable {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(_panic) => {
                tracing::error!(
                    "[PdfTextExtractor] extraction panicked for {} - likely malformed font/glyph",
                    path.display()
                );
                return Err(ExtractError::Panicked {
                    path: path.to_path_buf(),
                });
            }
        };

        if pages.iter().all(|p| p.trim().is_empty()) {
            tracing::warn!(
                "[PdfTextExtractor] no text layer in {} - likely scanned/image",
                path.display()
            );
        }

        Ok(pages)
    }
}
