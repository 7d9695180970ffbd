//! CSV export of ledger rows

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::ledger::LedgerRow;

#[derive(Serialize)]
struct CsvRecord<'a> {
    id: &'a str,
    description: &'a str,
    amount: String,
    created_at: String,
    settled_at: String,
    label: String,
}

pub fn write_csv<W: Write>(rows: &[LedgerRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for row in rows {
        wtr.serialize(CsvRecord {
            id: &row.id,
            description: &row.description,
            amount: format!("{:.2}", row.amount),
            created_at: row.created_at.to_rfc3339(),
            settled_at: row.settled_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
            label: row.label(),
        })
        .with_context(|| format!("writing row {}", row.id))?;
    }

    wtr.flush().context("flushing csv output")?;
    Ok(())
}
