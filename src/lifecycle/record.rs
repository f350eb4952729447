//! Document record data model.
//!
//! One record per discovered PDF, carrying everything classification
//! learned about it plus where it currently sits in the
//! pending -> renamed -> moved lifecycle.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::doc_type::DocType;

/// Placeholder rendered for a date that never parsed.
pub const UNKNOWN_DATE: &str = "00-00-0000";

/// Lifecycle state of a document record.
///
/// `Errored` is terminal: transitions never produce it, but a record
/// carrying it refuses further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordState {
    Pending,
    Renamed,
    Moved,
    Errored,
}

impl RecordState {
    /// A live record still owns its source path in the watched folder.
    pub fn is_live(&self) -> bool {
        matches!(self, RecordState::Pending | RecordState::Renamed)
    }
}

/// The document's primary date as parsed out of its text.
///
/// Parsing happens exactly once, at classification; everything after
/// (display, archive partitioning) consumes this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryDate {
    Known(NaiveDate),
    Unknown,
}

impl PrimaryDate {
    /// Parse a `DD-MM-YYYY` field value. Placeholders, empty strings and
    /// anything else that is not a real calendar date come back `Unknown`.
    pub fn parse(value: &str) -> Self {
        NaiveDate::parse_from_str(value.trim(), "%d-%m-%Y")
            .map(PrimaryDate::Known)
            .unwrap_or(PrimaryDate::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PrimaryDate::Unknown)
    }
}

impl std::fmt::Display for PrimaryDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrimaryDate::Known(date) => write!(f, "{}", date.format("%d-%m-%Y")),
            PrimaryDate::Unknown => write!(f, "{}", UNKNOWN_DATE),
        }
    }
}

/// A discovered document and its classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: Uuid,
    /// Where the file currently lives. Updated by every transition.
    pub source_path: PathBuf,
    pub state: RecordState,
    pub doc_type: DocType,
    /// Canonical filename the document will carry after rename.
    pub proposed_name: String,
    pub primary_date: PrimaryDate,
    /// Every extracted field, placeholders included.
    pub fields: HashMap<String, String>,
    pub discovered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_date() {
        let date = PrimaryDate::parse("15-01-2024");
        assert_eq!(
            date,
            PrimaryDate::Known(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(date.to_string(), "15-01-2024");
    }

    #[test]
    fn test_parse_placeholder_is_unknown() {
        assert!(PrimaryDate::parse(UNKNOWN_DATE).is_unknown());
        assert!(PrimaryDate::parse("").is_unknown());
        assert!(PrimaryDate::parse("not a date").is_unknown());
    }

    #[test]
    fn test_parse_impossible_date_is_unknown() {
        assert!(PrimaryDate::parse("31-02-2024").is_unknown());
    }

    #[test]
    fn test_unknown_date_display() {
        assert_eq!(PrimaryDate::Unknown.to_string(), "00-00-0000");
    }

    #[test]
    fn test_live_states() {
        assert!(RecordState::Pending.is_live());
        assert!(RecordState::Renamed.is_live());
        assert!(!RecordState::Moved.is_live());
        assert!(!RecordState::Errored.is_live());
    }

    #[test]
    fn test_record_state_serializes_snake_case() {
        let json = serde_json::to_string(&RecordState::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn test_primary_date_serde_round_trip() {
        let known = PrimaryDate::Known(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let json = serde_json::to_string(&known).unwrap();
        assert_eq!(json, "\"2024-01-15\"");
        assert_eq!(serde_json::from_str::<PrimaryDate>(&json).unwrap(), known);

        let json = serde_json::to_string(&PrimaryDate::Unknown).unwrap();
        assert_eq!(json, "null");
        assert_eq!(
            serde_json::from_str::<PrimaryDate>("null").unwrap(),
            PrimaryDate::Unknown
        );
    }
}
