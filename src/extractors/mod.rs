// src/extractors/mod.rs
pub mod geometry;
pub mod rows;
pub mod transactions;

// Re-export key extraction types for convenience
pub use transactions::{AssetType, ParsedTransaction};

use crate::utils::error::ExtractError;

/// Extracts every recognized securities transaction from a PTR PDF.
///
/// The pipeline is pure and synchronous: geometry extraction, multi-line row
/// reconstruction, then normalization. Rows dropped by filtering policy do
/// not affect the document's success; structural failures (missing header
/// geometry, malformed rows) discard the whole document.
pub fn extract_transactions(pdf_bytes: &[u8]) -> Result<Vec<ParsedTransaction>, ExtractError> {
    let raw_rows = geometry::extract_raw_rows(pdf_bytes)?;
    let transactions = transactions_from_rows(&raw_rows);

    tracing::debug!(
        "Kept {} of {} table rows as transactions",
        transactions.len(),
        raw_rows.len()
    );
    Ok(transactions)
}

/// Runs every raw table row through reconstruction and normalization,
/// silently dropping the rows filtered by policy.
fn transactions_from_rows(raw_rows: &[rows::RawRow]) -> Vec<ParsedTransaction> {
    let mut transactions = Vec::new();
    for raw in raw_rows {
        let row = rows::reconstruct(raw);
        match transactions::normalize(&row) {
            Ok(transaction) => transactions.push(transaction),
            Err(reason) => {
                tracing::trace!("Dropped row {}: {:?}", row.id, reason);
            }
        }
    }
    transactions
}
