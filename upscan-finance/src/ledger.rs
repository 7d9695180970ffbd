//! Flatten retrieved transactions into typed ledger rows for tabulation.
//!
//! Rows without a usable `createdAt` are excluded; every timestamp-dependent
//! view downstream relies on it.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use upscan_core::Transaction;

const UNKNOWN_DESCRIPTION: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LedgerRow {
    pub id: String,
    pub description: String,
    /// Unparseable or missing amounts read as 0.0
    pub amount: f64,
    pub created_at: DateTime<FixedOffset>,
    /// `None` while the transaction is still pending
    pub settled_at: Option<DateTime<FixedOffset>>,
}

impl LedgerRow {
    pub fn from_transaction(txn: &Transaction) -> Option<Self> {
        let created_at = txn.created_at()?;
        let description = match txn.attributes.description.as_deref() {
            Some(d) => d.to_string(),
            None => UNKNOWN_DESCRIPTION.to_string(),
        };

        Some(Self {
            id: txn.id.clone(),
            description,
            amount: txn.amount().unwrap_or(0.0),
            created_at,
            settled_at: txn.settled_at(),
        })
    }

    /// `"<description> (<YYYY-MM-DD>)"`, the axis label used by chart consumers
    pub fn label(&self) -> String {
        format!("{} ({})", self.description, self.created_at.format("%Y-%m-%d"))
    }

    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }

    pub fn is_withdrawal(&self) -> bool {
        self.amount < 0.0
    }

    pub fn is_deposit(&self) -> bool {
        self.amount > 0.0
    }
}

/// Rows in input order, skipping records whose created-at is missing or malformed
pub fn ledger_rows<'a, I>(txns: I) -> Vec<LedgerRow>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    txns.into_iter()
        .filter_map(LedgerRow::from_transaction)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn txn(value: serde_json::Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_row_from_settled_transaction() {
        let t = txn(json!({
            "id": "t1",
            "attributes": {
                "description": "Coles",
                "amount": { "value": "-42.50" },
                "createdAt": "2024-03-05T18:30:00+10:00",
                "settledAt": "2024-03-06T02:00:00+10:00"
            }
        }));
        let row = LedgerRow::from_transaction(&t).unwrap();
        assert_eq!(row.amount, -42.5);
        assert!(row.is_settled());
        assert!(row.is_withdrawal());
        assert_eq!(row.label(), "Coles (2024-03-05)");
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let t = txn(json!({
            "id": "t2",
            "attributes": { "amount": { "value": "oops" }, "createdAt": "2024-03-05T18:30:00+10:00" }
        }));
        let row = LedgerRow::from_transaction(&t).unwrap();
        assert_eq!(row.description, "Unknown");
        assert_eq!(row.amount, 0.0);
        assert!(!row.is_settled());
        assert!(!row.is_deposit() && !row.is_withdrawal());
    }

    #[test]
    fn test_rows_without_created_at_are_dropped() {
        let txns = vec![
            txn(json!({ "id": "a", "attributes": { "createdAt": "not a date" } })),
            txn(json!({ "id": "b", "attributes": { "createdAt": "2024-01-01T00:00:00+10:00" } })),
            txn(json!({ "id": "c" })),
        ];
        let rows = ledger_rows(&txns);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "b");
    }
}
