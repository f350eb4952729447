//! Document type detection from filename markers.

use serde::{Deserialize, Serialize};

/// Business document categories the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    SalesOrder,
    DeliveryChallan,
    Invoice,
    Ledger,
    /// Filename carried no marker; the file is left alone.
    Other,
    /// Reserved for records whose type could not be established.
    Unrecognized,
}

/// Export-system filename markers, checked in order. `GDNSO_` must come
/// before `SO_` because it contains it.
const MARKERS: &[(&str, DocType)] = &[
    ("GDNSO_", DocType::DeliveryChallan),
    ("SO_", DocType::SalesOrder),
    ("SI_", DocType::Invoice),
];

impl DocType {
    /// Detect the document type from a filename.
    ///
    /// Markers are matched case-sensitively, the `statement` fallback for
    /// ledgers case-insensitively.
    pub fn detect(file_name: &str) -> DocType {
        for (marker, doc_type) in MARKERS {
            if file_name.contains(marker) {
                return *doc_type;
            }
        }
        if file_name.to_lowercase().contains("statement") {
            DocType::Ledger
        } else {
            DocType::Other
        }
    }

    /// Whether this type goes through the rename/move lifecycle.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, DocType::Other | DocType::Unrecognized)
    }

    /// Short label used in logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            DocType::SalesOrder => "SO",
            DocType::DeliveryChallan => "DC",
            DocType::Invoice => "Invoice",
            DocType::Ledger => "Ledger",
            DocType::Other => "Other",
            DocType::Unrecognized => "Unrecognized",
        }
    }
}
