//! Document classification.
//!
//! This module provides:
//! - `doc_type`: filename marker dispatch
//! - `fields`: per-type field extraction rule tables
//! - `customer`: structural capture with registry fallback
//! - `naming`: canonical filename templates

pub mod customer;
pub mod doc_type;
pub mod fields;
pub mod naming;

pub use customer::*;
pub use doc_type::*;
pub use fields::*;
pub use naming::*;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::extract::{join_pages, TextExtractor};
use crate::lifecycle::record::PrimaryDate;
use crate::registry::CustomerRegistry;

/// Everything classification learned about one document.
#[derive(Debug, Clone)]
pub struct ClassifiedDocument {
    pub doc_type: DocType,
    pub proposed_name: String,
    pub primary_date: PrimaryDate,
    pub fields: HashMap<String, String>,
}

/// Outcome of classifying one path. Failures are data, not errors; the
/// drain keeps going either way.
#[derive(Debug, Clone)]
pub enum Classification {
    /// Recognized document, ready to become a pending record.
    Matched(ClassifiedDocument),
    /// Not a document this pipeline manages; the file is left alone.
    Ignored,
    /// Extraction broke; no record is created.
    Failed { reason: String },
}

/// Turns a path into a classification by running extraction, dispatch,
/// field rules and naming in order.
pub struct Classifier {
    extractor: Arc<dyn TextExtractor>,
    registry: Arc<RwLock<CustomerRegistry>>,
}

impl Classifier {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        registry: Arc<RwLock<CustomerRegistry>>,
    ) -> Self {
        Self {
            extractor,
            registry,
        }
    }

    /// Classify a single PDF.
    ///
    /// Extraction runs before dispatch so the registry fallback always
    /// has document text to scan. Registry reads take a fresh snapshot
    /// per call; names added while the pipeline runs apply to the next
    /// classification.
    pub fn classify(&self, path: &Path) -> Classification {
        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                return Classification::Failed {
                    reason: format!("path has no file name: {}", path.display()),
                }
            }
        };

        let pages = match self.extractor.extract(path) {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "classification failed");
                return Classification::Failed {
                    reason: e.to_string(),
                };
            }
        };
        let text = join_pages(&pages);

        let doc_type = DocType::detect(&file_name);
        if !doc_type.is_recognized() {
            tracing::debug!(path = %path.display(), "no filename marker, leaving file alone");
            return Classification::Ignored;
        }

        let mut fields = fields::extract(doc_type, &text, &file_name);

        let known = {
            let registry = self
                .registry
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            registry.names().to_vec()
        };
        let structural = fields.get("customer").map(String::as_str).unwrap_or("");
        let resolved = customer::resolve(structural, &text, &known);
        fields.insert("customer".to_string(), resolved);

        let Some(proposed_name) = naming::build(doc_type, &fields) else {
            return Classification::Ignored;
        };

        let date_field = if doc_type == DocType::Ledger {
            "date_to"
        } else {
            "date"
        };
        let primary_date =
            PrimaryDate::parse(fields.get(date_field).map(String::as_str).unwrap_or(""));

        tracing::debug!(
            path = %path.display(),
            doc_type = doc_type.label(),
            name = %proposed_name,
            "classified"
        );

        Classification::Matched(ClassifiedDocument {
            doc_type,
            proposed_name,
            primary_date,
            fields,
        })
    }
}
