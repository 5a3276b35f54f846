// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::clerk::models::PtrFiling;
use crate::extractors::{AssetType, ParsedTransaction};
use crate::utils::error::StorageError;

/// One line of the merged per-year transaction report: a parsed transaction
/// stamped with its source document.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub document_id: String,
    pub id: String,
    pub owner: String,
    pub asset: String,
    pub transaction_type: String,
    pub date: String,
    pub amount: String,
    pub asset_type: AssetType,
    pub ticker: Option<String>,
}

impl TransactionRecord {
    pub fn new(document_id: &str, transaction: ParsedTransaction) -> Self {
        Self {
            document_id: document_id.to_string(),
            id: transaction.id,
            owner: transaction.owner,
            asset: transaction.asset,
            transaction_type: transaction.transaction_type,
            date: transaction.date,
            amount: transaction.amount,
            asset_type: transaction.asset_type,
            ticker: transaction.ticker,
        }
    }
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Writes one CSV of filings, e.g. `2024_ptrs.csv` or
    /// `2024_failed_ptrs.csv`.
    pub fn save_filings(
        &self,
        year: u32,
        label: &str,
        filings: &[PtrFiling],
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_{}.csv", year, label));

        let mut writer = csv::Writer::from_path(&file_path)?;
        for filing in filings {
            writer.serialize(filing)?;
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!("Saved {} filings to {}", filings.len(), file_path.display());
        Ok(file_path)
    }

    /// Writes the merged per-year transaction table, keyed by document id and
    /// row id.
    pub fn save_transactions(
        &self,
        year: u32,
        records: &[TransactionRecord],
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_transactions.csv", year));

        let mut writer = csv::Writer::from_path(&file_path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(StorageError::IoError)?;

        tracing::info!(
            "Saved {} transactions to {}",
            records.len(),
            file_path.display()
        );
        Ok(file_path)
    }

    /// Saves a JSON summary of the run alongside the CSV reports.
    pub fn save_run_metadata(
        &self,
        year: u32,
        succeeded: usize,
        failed: usize,
        transactions: usize,
    ) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(format!("{}_run_meta.json", year));

        let metadata = serde_json::json!({
            "year": year,
            "succeeded_documents": succeeded,
            "failed_documents": failed,
            "transactions": transactions,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let metadata_str = serde_json::to_string_pretty(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        fs::write(&file_path, metadata_str).map_err(StorageError::IoError)?;

        tracing::info!("Saved run metadata to {}", file_path.display());
        Ok(file_path)
    }
}
