//! Symbol directory records and their lookup projection.
use serde::{Deserialize, Serialize};

/// One row of the symbol directory dataset.
///
/// The dataset uses the column names of the exchange listing it was exported from
/// (`Symbol`, `Company Name`, ...). Columns not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Unique symbol code, e.g. `AAPL`.
    #[serde(rename = "Symbol")]
    pub symbol_code: String,
    /// Human-readable company name.
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[allow(missing_docs)]
    #[serde(rename = "Financial Status", default, skip_serializing_if = "Option::is_none")]
    pub financial_status: Option<String>,
    #[allow(missing_docs)]
    #[serde(rename = "Market Category", default, skip_serializing_if = "Option::is_none")]
    pub market_category: Option<String>,
    #[allow(missing_docs)]
    #[serde(rename = "Round Lot Size", default, skip_serializing_if = "Option::is_none")]
    pub round_lot_size: Option<f64>,
    #[allow(missing_docs)]
    #[serde(rename = "Security Name", default, skip_serializing_if = "Option::is_none")]
    pub security_name: Option<String>,
    #[allow(missing_docs)]
    #[serde(rename = "Test Issue", default, skip_serializing_if = "Option::is_none")]
    pub test_issue: Option<String>,
}

impl SymbolRecord {
    /// Minimal record with only the required columns.
    pub fn new(symbol_code: &str, company_name: &str) -> Self {
        SymbolRecord {
            symbol_code: String::from(symbol_code),
            company_name: String::from(company_name),
            financial_status: None,
            market_category: None,
            round_lot_size: None,
            security_name: None,
            test_issue: None,
        }
    }

    /// Build the lookup projection for this record.
    pub fn to_lookup_entry(&self) -> SymbolLookupEntry {
        SymbolLookupEntry {
            value: self.symbol_code.clone(),
            label: format!("{} ({})", self.company_name, self.symbol_code),
        }
    }
}

/// Denormalized `{value, label}` pair used by symbol pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolLookupEntry {
    /// Symbol code.
    pub value: String,
    /// `"<company name> (<symbol code>)"`.
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_listing_row_and_ignores_unknown_columns() {
        let json = r#"{"Symbol":"AAPL","Company Name":"Apple Inc.","Round Lot Size":100,"ETF":"N"}"#;
        let record: SymbolRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.symbol_code, "AAPL");
        assert_eq!(record.company_name, "Apple Inc.");
        assert_eq!(record.round_lot_size, Some(100.0));
        assert_eq!(record.market_category, None);
    }

    #[test]
    fn missing_company_name_is_rejected() {
        assert!(serde_json::from_str::<SymbolRecord>(r#"{"Symbol":"AAPL"}"#).is_err());
    }

    #[test]
    fn lookup_label_combines_name_and_code() {
        let entry = SymbolRecord::new("MSFT", "Microsoft").to_lookup_entry();
        assert_eq!(entry.value, "MSFT");
        assert_eq!(entry.label, "Microsoft (MSFT)");
    }
}
