//! Field extraction rule tables.
//!
//! Each document type carries an ordered list of named patterns. A rule
//! that misses never fails extraction; it yields a placeholder chosen by
//! the rule's kind, so naming downstream always has every field.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classify::doc_type::DocType;
use crate::lifecycle::record::UNKNOWN_DATE;

/// Placeholder for a required text field (reference numbers).
pub const MISSING_REF: &str = "UNK";

/// Placeholder for an export timestamp that never parsed.
pub const UNKNOWN_TIME: &str = "00-00-00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    /// Captured as `DD/MM/YYYY`, stored as `DD-MM-YYYY`.
    Date,
}

struct FieldRule {
    name: &'static str,
    pattern: &'static str,
    group: usize,
    kind: FieldKind,
    required: bool,
}

struct CompiledRule {
    name: &'static str,
    regex: Regex,
    group: usize,
    kind: FieldKind,
    required: bool,
}

// The patterns mirror the layout the accounting export produces: a
// heading line, then the customer on its own line ahead of the document
// number. Customers are not `required` because a structural miss falls
// through to the registry scan, not to a placeholder.

const SALES_ORDER_RULES: &[FieldRule] = &[
    FieldRule {
        name: "ref_no",
        pattern: r"Sales Order No\.\s*([0-9]+)",
        group: 1,
        kind: FieldKind::Text,
        required: true,
    },
    FieldRule {
        name: "customer",
        pattern: r"Sales Order\n(.*?)\s+Sales Order No\.",
        group: 1,
        kind: FieldKind::Text,
        required: false,
    },
    FieldRule {
        name: "date",
        pattern: r"Date\s+([0-9]{2}/[0-9]{2}/[0-9]{4})",
        group: 1,
        kind: FieldKind::Date,
        required: true,
    },
];

const DELIVERY_CHALLAN_RULES: &[FieldRule] = &[
    FieldRule {
        name: "ref_no",
        pattern: r"DC No\.\s*([0-9]+)",
        group: 1,
        kind: FieldKind::Text,
        required: true,
    },
    FieldRule {
        name: "customer",
        pattern: r"Delivery Challan\n(.*?)\s+DC No\.",
        group: 1,
        kind: FieldKind::Text,
        required: false,
    },
    FieldRule {
        name: "date",
        pattern: r"Date\s+([0-9]{2}/[0-9]{2}/[0-9]{4})",
        group: 1,
        kind: FieldKind::Date,
        required: true,
    },
];

const INVOICE_RULES: &[FieldRule] = &[
    FieldRule {
        name: "ref_no",
        pattern: r"Inv No\.\s*([A-Z0-9]+)",
        group: 1,
        kind: FieldKind::Text,
        required: true,
    },
    FieldRule {
        name: "customer",
        pattern: r"Sales Tax Invoice\n(.*?)\s+Inv No\.",
        group: 1,
        kind: FieldKind::Text,
        required: false,
    },
    FieldRule {
        name: "date",
        pattern: r"Date\s+([0-9]{2}/[0-9]{2}/[0-9]{4})",
        group: 1,
        kind: FieldKind::Date,
        required: true,
    },
    FieldRule {
        name: "dc_no",
        pattern: r"DC No\.[ \t]*([^\n]*)",
        group: 1,
        kind: FieldKind::Text,
        required: false,
    },
    FieldRule {
        name: "po_no",
        pattern: r"PO No\.[ \t]*([^\n]*)",
        group: 1,
        kind: FieldKind::Text,
        required: false,
    },
];

// Both range fields come from the same pattern, selected by group.
const LEDGER_RULES: &[FieldRule] = &[
    FieldRule {
        name: "customer",
        pattern: r"Combined Account Statement \(Invoice Detail\)\n(.*?)\s+Account No",
        group: 1,
        kind: FieldKind::Text,
        required: false,
    },
    FieldRule {
        name: "date_from",
        pattern: r"Date From:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})\s*to:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})",
        group: 1,
        kind: FieldKind::Date,
        required: false,
    },
    FieldRule {
        name: "date_to",
        pattern: r"Date From:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})\s*to:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})",
        group: 2,
        kind: FieldKind::Date,
        required: false,
    },
];

static RULES: Lazy<HashMap<DocType, Vec<CompiledRule>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(DocType::SalesOrder, compile(SALES_ORDER_RULES));
    map.insert(DocType::DeliveryChallan, compile(DELIVERY_CHALLAN_RULES));
    map.insert(DocType::Invoice, compile(INVOICE_RULES));
    map.insert(DocType::Ledger, compile(LEDGER_RULES));
    map
});

// ASCII digits only: the time decoder slices fixed byte offsets out of
// the capture.
static FILENAME_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_([0-9]{14})").expect("timestamp pattern must compile"));

fn compile(rules: &[FieldRule]) -> Vec<CompiledRule> {
    rules
        .iter()
        .map(|rule| CompiledRule {
            name: rule.name,
            regex: Regex::new(rule.pattern).expect("field rule pattern must compile"),
            group: rule.group,
            kind: rule.kind,
            required: rule.required,
        })
        .collect()
}

fn placeholder(kind: FieldKind, required: bool) -> &'static str {
    match (kind, required) {
        (FieldKind::Date, true) => UNKNOWN_DATE,
        (FieldKind::Text, true) => MISSING_REF,
        (_, false) => "",
    }
}

/// Run every rule for `doc_type` over the extracted text.
///
/// Always returns the full field set for the type; rules that missed are
/// present with their placeholder. Types without rules get an empty map.
pub fn extract(doc_type: DocType, text: &str, file_name: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    if let Some(rules) = RULES.get(&doc_type) {
        for rule in rules {
            let value = rule
                .regex
                .captures(text)
                .and_then(|caps| caps.get(rule.group))
                .map(|m| {
                    let captured = m.as_str().trim();
                    match rule.kind {
                        FieldKind::Date => captured.replace('/', "-"),
                        FieldKind::Text => captured.to_string(),
                    }
                })
                .unwrap_or_else(|| placeholder(rule.kind, rule.required).to_string());
            fields.insert(rule.name.to_string(), value);
        }
    }

    // Delivery challans carry the export time in their filename, not in
    // the document text.
    if doc_type == DocType::DeliveryChallan {
        fields.insert("time".to_string(), timestamp_from_name(file_name));
    }

    fields
}

/// Pull `HH-MM-SS` out of an export filename timestamp like
/// `_20240115093000` (YYYYMMDDHHMMSS).
pub fn timestamp_from_name(file_name: &str) -> String {
    FILENAME_TIMESTAMP
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            let ts = m.as_str();
            format!("{}-{}-{}", &ts[8..10], &ts[10..12], &ts[12..14])
        })
        .unwrap_or_else(|| UNKNOWN_TIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SO_TEXT: &str =
        "Sales Order\nAcme Traders   Sales Order No. 4521\nDate   15/01/2024\nItem Qty";

    const DC_TEXT: &str =
        "Delivery Challan\nAcme Traders   DC No. 4521\nDate   15/01/2024\nItem Qty";

    const INVOICE_TEXT: &str = "Sales Tax Invoice\nBeta Corp   Inv No. INV2024\nDate   01/03/2024\nDC No. 100\nPO No. 555";

    const LEDGER_TEXT: &str = "Combined Account Statement (Invoice Detail)\nGamma Industries   Account No. 42\nDate From: 01/01/2024   to: 31/03/2024";

    #[test]
    fn test_sales_order_fields() {
        let fields = extract(DocType::SalesOrder, SO_TEXT, "SO_20240115093000.pdf");
        assert_eq!(fields["ref_no"], "4521");
        assert_eq!(fields["customer"], "Acme Traders");
        assert_eq!(fields["date"], "15-01-2024");
    }

    #[test]
    fn test_delivery_challan_fields_include_time() {
        let fields = extract(
            DocType::DeliveryChallan,
            DC_TEXT,
            "GDNSO_20240115093000.pdf",
        );
        assert_eq!(fields["ref_no"], "4521");
        assert_eq!(fields["customer"], "Acme Traders");
        assert_eq!(fields["date"], "15-01-2024");
        assert_eq!(fields["time"], "09-30-00");
    }

    #[test]
    fn test_invoice_fields() {
        let fields = extract(DocType::Invoice, INVOICE_TEXT, "SI_20240301120000.pdf");
        assert_eq!(fields["ref_no"], "INV2024");
        assert_eq!(fields["customer"], "Beta Corp");
        assert_eq!(fields["date"], "01-03-2024");
        assert_eq!(fields["dc_no"], "100");
        assert_eq!(fields["po_no"], "555");
    }

    #[test]
    fn test_invoice_optional_fields_empty_when_missing() {
        let text = "Sales Tax Invoice\nBeta Corp   Inv No. INV2024\nDate   01/03/2024";
        let fields = extract(DocType::Invoice, text, "SI_20240301120000.pdf");
        assert_eq!(fields["dc_no"], "");
        assert_eq!(fields["po_no"], "");
    }

    #[test]
    fn test_missing_ref_gets_placeholder() {
        let fields = extract(DocType::SalesOrder, "nothing matches here", "SO_x.pdf");
        assert_eq!(fields["ref_no"], MISSING_REF);
    }

    #[test]
    fn test_missing_date_gets_placeholder() {
        let fields = extract(DocType::SalesOrder, "nothing matches here", "SO_x.pdf");
        assert_eq!(fields["date"], UNKNOWN_DATE);
    }

    #[test]
    fn test_missing_customer_is_empty_for_fallback() {
        let fields = extract(DocType::SalesOrder, "nothing matches here", "SO_x.pdf");
        assert_eq!(fields["customer"], "");
    }

    #[test]
    fn test_ledger_date_range() {
        let fields = extract(DocType::Ledger, LEDGER_TEXT, "statement.pdf");
        assert_eq!(fields["customer"], "Gamma Industries");
        assert_eq!(fields["date_from"], "01-01-2024");
        assert_eq!(fields["date_to"], "31-03-2024");
    }

    #[test]
    fn test_ledger_missing_range_is_empty() {
        let text = "Combined Account Statement (Invoice Detail)\nGamma Industries   Account No. 42";
        let fields = extract(DocType::Ledger, text, "statement.pdf");
        assert_eq!(fields["date_from"], "");
        assert_eq!(fields["date_to"], "");
    }

    #[test]
    fn test_unruled_types_have_no_fields() {
        assert!(extract(DocType::Other, SO_TEXT, "x.pdf").is_empty());
        assert!(extract(DocType::Unrecognized, SO_TEXT, "x.pdf").is_empty());
    }

    #[test]
    fn test_timestamp_from_name() {
        assert_eq!(timestamp_from_name("GDNSO_20240115093000.pdf"), "09-30-00");
        assert_eq!(timestamp_from_name("GDNSO_20241231235959.pdf"), "23-59-59");
    }

    #[test]
    fn test_timestamp_missing_gets_placeholder() {
        assert_eq!(timestamp_from_name("GDNSO_export.pdf"), UNKNOWN_TIME);
    }

    #[test]
    fn test_timestamp_requires_ascii_digits() {
        // Unicode decimal digits are multi-byte; they must miss the
        // pattern instead of reaching the fixed-offset decoder.
        let name = "GDNSO_०१२३४५६७८९०१२३.pdf";
        assert_eq!(timestamp_from_name(name), UNKNOWN_TIME);

        let fields = extract(DocType::DeliveryChallan, "", name);
        assert_eq!(fields["time"], UNKNOWN_TIME);
    }
}
