//! Archive destination roots and date partitioning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::doc_type::DocType;
use crate::lifecycle::record::PrimaryDate;

/// Subfolder for documents whose primary date never parsed. Keeps them
/// out of the real month partitions without blocking the move.
pub const UNKNOWN_DATE_DIR: &str = "UNKNOWN-DATE";

/// Archive root per document category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationMap {
    pub sales_orders: PathBuf,
    pub delivery_challans: PathBuf,
    pub invoices: PathBuf,
    pub ledgers: PathBuf,
    /// Catch-all for anything without a category root.
    pub unsorted: PathBuf,
}

impl Default for DestinationMap {
    fn default() -> Self {
        let base = dirs::document_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docket-archive");
        Self {
            sales_orders: base.join("Sale Orders (SO)"),
            delivery_challans: base.join("Delivery Challans (DC)"),
            invoices: base.join("Invoices"),
            ledgers: base.join("Ledgers"),
            unsorted: base.join("Unsorted"),
        }
    }
}

impl DestinationMap {
    /// Category root for a document type.
    pub fn root_for(&self, doc_type: DocType) -> &Path {
        match doc_type {
            DocType::SalesOrder => &self.sales_orders,
            DocType::DeliveryChallan => &self.delivery_challans,
            DocType::Invoice => &self.invoices,
            DocType::Ledger => &self.ledgers,
            DocType::Other | DocType::Unrecognized => &self.unsorted,
        }
    }

    /// Full directory a document archives into.
    ///
    /// Orders and challans partition by full month name (`January-2024`),
    /// invoices by uppercase short month (`JAN-2024`), ledgers stay flat.
    /// A document with an unknown date lands in `UNKNOWN-DATE` instead of
    /// a month folder.
    pub fn archive_dir(&self, doc_type: DocType, date: PrimaryDate) -> PathBuf {
        let root = self.root_for(doc_type);
        match doc_type {
            DocType::SalesOrder | DocType::DeliveryChallan => match date {
                PrimaryDate::Known(d) => {
                    root.join(format!("{}-{}", d.format("%B"), d.format("%Y")))
                }
                PrimaryDate::Unknown => root.join(UNKNOWN_DATE_DIR),
            },
            DocType::Invoice => match date {
                PrimaryDate::Known(d) => root.join(format!(
                    "{}-{}",
                    d.format("%b").to_string().to_uppercase(),
                    d.format("%Y")
                )),
                PrimaryDate::Unknown => root.join(UNKNOWN_DATE_DIR),
            },
            DocType::Ledger | DocType::Other | DocType::Unrecognized => root.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn map() -> DestinationMap {
        DestinationMap {
            sales_orders: PathBuf::from("/archive/so"),
            delivery_challans: PathBuf::from("/archive/dc"),
            invoices: PathBuf::from("/archive/inv"),
            ledgers: PathBuf::from("/archive/ledger"),
            unsorted: PathBuf::from("/archive/unsorted"),
        }
    }

    fn known(y: i32, m: u32, d: u32) -> PrimaryDate {
        PrimaryDate::Known(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_orders_use_full_month_name() {
        let dir = map().archive_dir(DocType::SalesOrder, known(2024, 1, 15));
        assert_eq!(dir, PathBuf::from("/archive/so/January-2024"));

        let dir = map().archive_dir(DocType::DeliveryChallan, known(2024, 12, 1));
        assert_eq!(dir, PathBuf::from("/archive/dc/December-2024"));
    }

    #[test]
    fn test_invoices_use_uppercase_short_month() {
        let dir = map().archive_dir(DocType::Invoice, known(2024, 3, 1));
        assert_eq!(dir, PathBuf::from("/archive/inv/MAR-2024"));
    }

    #[test]
    fn test_ledgers_stay_flat() {
        let dir = map().archive_dir(DocType::Ledger, known(2024, 3, 31));
        assert_eq!(dir, PathBuf::from("/archive/ledger"));

        let dir = map().archive_dir(DocType::Ledger, PrimaryDate::Unknown);
        assert_eq!(dir, PathBuf::from("/archive/ledger"));
    }

    #[test]
    fn test_unknown_date_gets_own_folder() {
        let dir = map().archive_dir(DocType::SalesOrder, PrimaryDate::Unknown);
        assert_eq!(dir, PathBuf::from("/archive/so/UNKNOWN-DATE"));

        let dir = map().archive_dir(DocType::Invoice, PrimaryDate::Unknown);
        assert_eq!(dir, PathBuf::from("/archive/inv/UNKNOWN-DATE"));
    }

    #[test]
    fn test_other_routes_to_unsorted() {
        let dir = map().archive_dir(DocType::Other, PrimaryDate::Unknown);
        assert_eq!(dir, PathBuf::from("/archive/unsorted"));
    }
}
