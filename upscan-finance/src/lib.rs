//! upscan-finance: ledger rows, flow totals, and CSV export over retrieved transactions

pub mod export;
pub mod ledger;
pub mod summary;

pub use export::write_csv;
pub use ledger::{LedgerRow, ledger_rows};
pub use summary::{DescriptionShare, FlowTotals, description_breakdown, flow_totals};
