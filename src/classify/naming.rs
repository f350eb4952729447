//! Canonical filename templates.

use std::collections::HashMap;

use crate::classify::doc_type::DocType;

/// Build the canonical filename for a classified document.
///
/// Expects the full field set produced by field extraction; a field that
/// missed its pattern is already a placeholder, so the template renders
/// unconditionally. Returns `None` for types that are never renamed.
pub fn build(doc_type: DocType, fields: &HashMap<String, String>) -> Option<String> {
    let field = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");

    let name = match doc_type {
        DocType::SalesOrder => format!(
            "{}, {}, {}.pdf",
            field("ref_no"),
            field("customer"),
            field("date")
        ),
        DocType::DeliveryChallan => format!(
            "DC-{}, {}, {}, {}.pdf",
            field("ref_no"),
            field("customer"),
            field("date"),
            field("time")
        ),
        DocType::Invoice => format!(
            "{}, {}, D.C-{}, PO-{}, {}.pdf",
            field("ref_no"),
            field("customer"),
            field("dc_no"),
            field("po_no"),
            field("date")
        ),
        DocType::Ledger => {
            let from = field("date_from");
            let to = field("date_to");
            if from.is_empty() || to.is_empty() {
                format!("Ledger, {}, all dates.pdf", field("customer"))
            } else {
                format!("Ledger, {}, From {} to {}.pdf", field("customer"), from, to)
            }
        }
        DocType::Other | DocType::Unrecognized => return None,
    };

    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_sales_order_name() {
        let fields = fields(&[
            ("ref_no", "4521"),
            ("customer", "Acme Traders"),
            ("date", "15-01-2024"),
        ]);
        assert_eq!(
            build(DocType::SalesOrder, &fields).unwrap(),
            "4521, Acme Traders, 15-01-2024.pdf"
        );
    }

    #[test]
    fn test_delivery_challan_name() {
        let fields = fields(&[
            ("ref_no", "4521"),
            ("customer", "Acme Traders"),
            ("date", "15-01-2024"),
            ("time", "09-30-00"),
        ]);
        assert_eq!(
            build(DocType::DeliveryChallan, &fields).unwrap(),
            "DC-4521, Acme Traders, 15-01-2024, 09-30-00.pdf"
        );
    }

    #[test]
    fn test_invoice_name_with_missing_po() {
        let fields = fields(&[
            ("ref_no", "INV2024"),
            ("customer", "Beta Corp"),
            ("dc_no", "100"),
            ("po_no", ""),
            ("date", "01-03-2024"),
        ]);
        assert_eq!(
            build(DocType::Invoice, &fields).unwrap(),
            "INV2024, Beta Corp, D.C-100, PO-, 01-03-2024.pdf"
        );
    }

    #[test]
    fn test_ledger_name_with_range() {
        let fields = fields(&[
            ("customer", "Gamma Industries"),
            ("date_from", "01-01-2024"),
            ("date_to", "31-03-2024"),
        ]);
        assert_eq!(
            build(DocType::Ledger, &fields).unwrap(),
            "Ledger, Gamma Industries, From 01-01-2024 to 31-03-2024.pdf"
        );
    }

    #[test]
    fn test_ledger_name_without_range() {
        let fields = fields(&[
            ("customer", "Gamma Industries"),
            ("date_from", ""),
            ("date_to", ""),
        ]);
        assert_eq!(
            build(DocType::Ledger, &fields).unwrap(),
            "Ledger, Gamma Industries, all dates.pdf"
        );
    }

    #[test]
    fn test_unrenamed_types_build_nothing() {
        assert!(build(DocType::Other, &HashMap::new()).is_none());
        assert!(build(DocType::Unrecognized, &HashMap::new()).is_none());
    }
}
