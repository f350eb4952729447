//! Customer name resolution.

/// Literal used when no customer could be established at all.
pub const UNKNOWN_CUSTOMER: &str = "UNKNOWN_CUSTOMER";

/// Resolve the customer for a document.
///
/// A non-empty structural capture is trusted as-is. Otherwise the known
/// names are scanned as case-insensitive substrings of the document text,
/// in registry order, and the first hit wins with the registry's casing.
pub fn resolve(structural: &str, text: &str, known: &[String]) -> String {
    let trimmed = structural.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }

    let haystack = text.to_lowercase();
    known
        .iter()
        .find(|name| haystack.contains(&name.to_lowercase()))
        .cloned()
        .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string())
}
