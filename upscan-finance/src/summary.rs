//! Aggregates over ledger rows: withdrawal/deposit totals and a
//! per-description breakdown of positive amounts.

use std::collections::HashMap;

use serde::Serialize;

use crate::ledger::LedgerRow;

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct FlowTotals {
    /// Sum of negative amounts (stays negative)
    pub withdrawals: f64,
    pub deposits: f64,
    pub withdrawal_count: usize,
    pub deposit_count: usize,
}

impl FlowTotals {
    pub fn net(&self) -> f64 {
        self.withdrawals + self.deposits
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DescriptionShare {
    pub description: String,
    pub total: f64,
    /// Fraction of all positive amounts (0.0 - 1.0)
    pub share: f64,
}

pub fn flow_totals(rows: &[LedgerRow]) -> FlowTotals {
    rows.iter().fold(FlowTotals::default(), |mut acc, row| {
        if row.is_withdrawal() {
            acc.withdrawals += row.amount;
            acc.withdrawal_count += 1;
        } else if row.is_deposit() {
            acc.deposits += row.amount;
            acc.deposit_count += 1;
        }
        acc
    })
}

/// Positive amounts grouped by description, in order of first appearance.
/// Empty when no row has a positive amount.
pub fn description_breakdown(rows: &[LedgerRow]) -> Vec<DescriptionShare> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<DescriptionShare> = Vec::new();

    for row in rows.iter().filter(|r| r.is_deposit()) {
        match index.get(row.description.as_str()) {
            Some(&i) => out[i].total += row.amount,
            None => {
                index.insert(&row.description, out.len());
                out.push(DescriptionShare {
                    description: row.description.clone(),
                    total: row.amount,
                    share: 0.0,
                });
            }
        }
    }

    let grand: f64 = out.iter().map(|s| s.total).sum();
    if grand > 0.0 {
        for s in &mut out {
            s.share = s.total / grand;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn row(description: &str, amount: f64) -> LedgerRow {
        let tz = FixedOffset::east_opt(10 * 3600).unwrap();
        LedgerRow {
            id: description.to_string(),
            description: description.to_string(),
            amount,
            created_at: tz.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            settled_at: None,
        }
    }

    #[test]
    fn test_flow_totals() {
        let rows = vec![row("Rent", -400.0), row("Pay", 1200.0), row("Coles", -80.0), row("Zero", 0.0)];
        let totals = flow_totals(&rows);
        assert_eq!(totals.withdrawals, -480.0);
        assert_eq!(totals.deposits, 1200.0);
        assert_eq!(totals.withdrawal_count, 2);
        assert_eq!(totals.deposit_count, 1);
        assert_eq!(totals.net(), 720.0);
    }

    #[test]
    fn test_breakdown_groups_positive_only() {
        let rows = vec![
            row("Pay", 300.0),
            row("Refund", 100.0),
            row("Coles", -50.0),
            row("Pay", 600.0),
        ];
        let shares = description_breakdown(&rows);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].description, "Pay");
        assert_eq!(shares[0].total, 900.0);
        assert_eq!(shares[0].share, 0.9);
        assert_eq!(shares[1].description, "Refund");
    }

    #[test]
    fn test_breakdown_empty_without_deposits() {
        assert!(description_breakdown(&[row("Coles", -10.0)]).is_empty());
    }
}
