// src/main.rs
mod clerk;
mod extractors;
mod storage;
mod utils;

use std::sync::Arc;

use chrono::Datelike;
use clap::Parser;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use clerk::client;
use clerk::models::PtrFiling;
use extractors::ParsedTransaction;
use storage::{StorageManager, TransactionRecord};
use utils::AppError;

/// Command Line Interface for the House PTR transaction extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Filing year to process (defaults to the current year)
    #[arg(short, long)]
    year: Option<u32>,

    /// Output directory for the per-year CSV reports
    #[arg(short, long, default_value = "./data")]
    output_dir: String,

    /// Maximum number of documents processed concurrently
    #[arg(short, long, default_value = "10")]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    let year = args.year.unwrap_or_else(|| chrono::Utc::now().year() as u32);
    if args.workers == 0 {
        return Err(AppError::Config("--workers must be at least 1".to_string()));
    }

    // 3. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    // 4. Fetch the yearly filing index
    tracing::info!("Fetching PTR index for year: {}", year);
    let filings = client::fetch_ptr_index(year).await?;

    if filings.is_empty() {
        return Err(AppError::Config(format!(
            "No periodic transaction reports found for {}",
            year
        )));
    }

    // 5. Fan the per-document pipelines out on a bounded worker pool
    let semaphore = Arc::new(Semaphore::new(args.workers));
    let mut handles: Vec<(PtrFiling, JoinHandle<Result<Vec<ParsedTransaction>, AppError>>)> =
        Vec::with_capacity(filings.len());

    for filing in filings {
        let semaphore = semaphore.clone();
        let worker_filing = filing.clone();
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.unwrap();
            extract_document(&worker_filing).await
        });
        handles.push((filing, handle));
    }

    // 6. Join the workers one by one. Each returns its own immutable result,
    //    so merging needs no shared accumulator; a failing document is
    //    recorded and does not affect the others.
    let mut succeeded: Vec<PtrFiling> = Vec::new();
    let mut failed: Vec<PtrFiling> = Vec::new();
    let mut records: Vec<TransactionRecord> = Vec::new();

    for (filing, handle) in handles {
        match handle.await {
            Ok(Ok(transactions)) => {
                tracing::info!(
                    "Extracted {} transactions from {}",
                    transactions.len(),
                    filing.document_id
                );
                records.extend(
                    transactions
                        .into_iter()
                        .map(|transaction| TransactionRecord::new(&filing.document_id, transaction)),
                );
                succeeded.push(filing);
            }
            Ok(Err(e)) => {
                tracing::error!(
                    "Failed extracting transactions from {} for year {}: {}",
                    filing.document_id,
                    year,
                    e
                );
                failed.push(filing);
            }
            Err(e) => {
                tracing::error!("Worker for {} panicked: {}", filing.document_id, e);
                failed.push(filing);
            }
        }
    }

    // 7. Write the per-year reports
    storage.save_filings(year, "ptrs", &succeeded)?;
    storage.save_filings(year, "failed_ptrs", &failed)?;
    storage.save_transactions(year, &records)?;
    storage.save_run_metadata(year, succeeded.len(), failed.len(), records.len())?;

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}, Transactions: {}",
        succeeded.len(),
        failed.len(),
        records.len()
    );

    if succeeded.is_empty() && !failed.is_empty() {
        return Err(AppError::Processing(format!(
            "Failed to extract transactions from all {} documents",
            failed.len()
        )));
    }

    Ok(())
}

/// Downloads one PTR's PDF and runs the extraction pipeline on a blocking
/// thread (the core is CPU-bound and synchronous).
async fn extract_document(filing: &PtrFiling) -> Result<Vec<ParsedTransaction>, AppError> {
    let pdf_bytes = client::download_ptr_pdf(filing).await?;

    let transactions =
        tokio::task::spawn_blocking(move || extractors::extract_transactions(&pdf_bytes))
            .await
            .map_err(|e| AppError::Processing(format!("extraction task failed: {}", e)))??;

    Ok(transactions)
}
