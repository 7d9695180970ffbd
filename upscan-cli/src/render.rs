use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::{self, Write};

use upscan_core::Transaction;
use upscan_finance::{DescriptionShare, FlowTotals, LedgerRow, ledger_rows, write_csv};
use upscan_ingest::RetrievalResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

const DESCRIPTION_WIDTH: usize = 36;

pub fn print_transactions(result: &RetrievalResult, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, result.transactions())
                .context("serialize transactions")?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let rows = ledger_rows(result);
            write_csv(&rows, &mut out)?;
        }
        OutputFormat::Table => {
            if result.is_empty() {
                writeln!(out, "No transactions matched.")?;
                return Ok(());
            }
            writeln!(
                out,
                "{:<10}  {:<width$}  {:>10}  {}",
                "DATE",
                "DESCRIPTION",
                "AMOUNT",
                "CATEGORY",
                width = DESCRIPTION_WIDTH
            )?;
            for txn in result {
                writeln!(out, "{}", table_line(txn))?;
            }
            writeln!(
                out,
                "\n{} transactions ({} pages fetched)",
                result.len(),
                result.pages_fetched()
            )?;
        }
    }

    Ok(())
}

fn table_line(txn: &Transaction) -> String {
    let date = txn
        .created_at()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    let amount = txn
        .amount()
        .map(|a| format!("{a:.2}"))
        .unwrap_or_else(|| "-".to_string());
    let category = match (txn.parent_category(), txn.category()) {
        (Some(p), Some(c)) => format!("{}/{}", p.id, c.id),
        (None, Some(c)) => c.id.clone(),
        (Some(p), None) => p.id.clone(),
        (None, None) => "-".to_string(),
    };

    format!(
        "{:<10}  {:<width$}  {:>10}  {}",
        date,
        truncate(txn.description(), DESCRIPTION_WIDTH),
        amount,
        category,
        width = DESCRIPTION_WIDTH
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
    t.push('…');
    t
}

pub fn print_summary(
    matched: usize,
    rows: &[LedgerRow],
    totals: &FlowTotals,
    shares: &[DescriptionShare],
) {
    println!("Matched {} transactions ({} with a valid created-at)\n", matched, rows.len());
    println!(
        "Withdrawals: ${:.2} across {} transactions",
        totals.withdrawals.abs(),
        totals.withdrawal_count
    );
    println!(
        "Deposits:    ${:.2} across {} transactions",
        totals.deposits, totals.deposit_count
    );
    println!("Net:         ${:.2}\n", totals.net());

    if shares.is_empty() {
        println!("No positive transaction amounts to break down.");
        return;
    }

    println!("Deposits by description:");
    for s in shares {
        println!("- {} | ${:.2} | {:.1}%", s.description, s.total, s.share * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 5), "abcd…");
    }

    #[test]
    fn test_table_line_fields() {
        let txn: Transaction = serde_json::from_value(json!({
            "id": "t",
            "attributes": {
                "description": "Cafe X",
                "amount": { "value": "-12.00" },
                "createdAt": "2024-03-01T08:15:00+10:00"
            },
            "relationships": {
                "category": { "data": { "id": "restaurants-and-cafes" } },
                "parentCategory": { "data": { "id": "good-life" } }
            }
        }))
        .unwrap();
        let line = table_line(&txn);
        assert!(line.starts_with("2024-03-01  Cafe X"));
        assert!(line.contains("-12.00"));
        assert!(line.ends_with("good-life/restaurants-and-cafes"));
    }

    #[test]
    fn test_table_line_missing_fields() {
        let txn: Transaction = serde_json::from_value(json!({ "id": "t" })).unwrap();
        let line = table_line(&txn);
        assert!(line.starts_with("-"));
        assert!(line.ends_with("  -"));
    }
}
