// src/clerk/client.rs
use crate::clerk::models::PtrFiling;
use crate::utils::error::ClerkError;
use chrono::NaiveDate;
use reqwest::header;
use std::io::{Cursor, Read};
use std::time::Duration;
use zip::ZipArchive;

const CLERK_BASE_URL: &str = "https://disclosures-clerk.house.gov";
// The Clerk's site throttles anonymous crawlers. Identify ourselves and keep
// a small delay between requests.
const CLERK_USER_AGENT: &str = "ptr_extractor/0.1 (congressional disclosure research)";
const CLERK_REQUEST_DELAY_MS: u64 = 150;

/// Creates a reqwest client configured for the Clerk's disclosure site.
fn build_clerk_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(CLERK_USER_AGENT)
        .build()
}

/// Downloads the yearly filing archive and returns the periodic transaction
/// reports listed in its XML manifest.
pub async fn fetch_ptr_index(year: u32) -> Result<Vec<PtrFiling>, ClerkError> {
    let url = format!("{}/public_disc/financial-pdfs/{}FD.zip", CLERK_BASE_URL, year);
    let client = build_clerk_client()?;

    tracing::info!("Downloading filing index from: {}", url);
    tokio::time::sleep(Duration::from_millis(CLERK_REQUEST_DELAY_MS)).await;

    let response = client.get(&url).send().await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClerkError::IndexNotFound(year));
        }
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
            return Err(ClerkError::RateLimited);
        }
        return Err(ClerkError::Http(status));
    }

    let bytes = response.bytes().await?;
    tracing::debug!("Downloaded {} bytes of filing archive", bytes.len());

    let manifest = read_manifest(&bytes, year)?;
    let filings = parse_ptr_index(&manifest)?;
    tracing::info!(
        "Manifest for {} lists {} periodic transaction reports",
        year,
        filings.len()
    );
    Ok(filings)
}

/// Downloads the PDF document for one PTR filing and returns its raw bytes.
pub async fn download_ptr_pdf(filing: &PtrFiling) -> Result<Vec<u8>, ClerkError> {
    let url = filing.pdf_url();
    let client = build_clerk_client()?;

    tracing::info!("Downloading document from: {}", url);
    tokio::time::sleep(Duration::from_millis(CLERK_REQUEST_DELAY_MS)).await;

    let response = client
        .get(&url)
        .header(header::ACCEPT, "application/pdf,*/*")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("HTTP error status: {} for URL: {}", status, url);
        if status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
            return Err(ClerkError::RateLimited);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::warn!("Received 404 Not Found for URL: {}", url);
            return Err(ClerkError::DocumentNotFound(filing.document_id.clone()));
        }
        return Err(ClerkError::Http(status));
    }

    let bytes = response.bytes().await?;
    tracing::debug!("Successfully downloaded {} bytes from {}", bytes.len(), url);
    Ok(bytes.to_vec())
}

/// Pulls the `{year}FD.xml` manifest out of the downloaded archive.
fn read_manifest(archive_bytes: &[u8], year: u32) -> Result<String, ClerkError> {
    let mut archive = ZipArchive::new(Cursor::new(archive_bytes))?;
    let mut entry = archive
        .by_name(&format!("{}FD.xml", year))
        .map_err(|_| ClerkError::Parse(format!("archive has no {}FD.xml manifest", year)))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| ClerkError::Parse(format!("manifest is not valid UTF-8: {}", e)))?;
    Ok(xml)
}

/// Parses the manifest XML, keeping only filings of type "P" (periodic
/// transaction report).
fn parse_ptr_index(xml: &str) -> Result<Vec<PtrFiling>, ClerkError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| ClerkError::Parse(format!("invalid manifest XML: {}", e)))?;

    let mut filings = Vec::new();
    for member in doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("Member"))
    {
        if member_text(member, "FilingType")? != "P" {
            continue;
        }

        let date_text = member_text(member, "FilingDate")?;
        let filing_date = NaiveDate::parse_from_str(date_text, "%m/%d/%Y").map_err(|e| {
            ClerkError::Parse(format!("invalid filing date '{}': {}", date_text, e))
        })?;
        let year = member_text(member, "Year")?
            .parse::<u32>()
            .map_err(|e| ClerkError::Parse(format!("invalid year in manifest: {}", e)))?;

        filings.push(PtrFiling {
            document_id: member_text(member, "DocID")?.to_string(),
            last: member_text(member, "Last")?.to_string(),
            first: member_text(member, "First")?.to_string(),
            state_dst: member_text(member, "StateDst")?.to_string(),
            year,
            filing_date,
        });
    }

    Ok(filings)
}

fn member_text<'a>(
    member: roxmltree::Node<'a, '_>,
    tag: &str,
) -> Result<&'a str, ClerkError> {
    member
        .children()
        .find(|n| n.has_tag_name(tag))
        .and_then(|n| n.text())
        .ok_or_else(|| ClerkError::Parse(format!("manifest Member missing <{}>", tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"<?xml version="1.0"?>
        <FinancialDisclosure>
            <Member>
                <Prefix>Hon.</Prefix>
                <Last>Smith</Last>
                <First>John</First>
                <Suffix/>
                <FilingType>P</FilingType>
                <StateDst>CA12</StateDst>
                <Year>2024</Year>
                <FilingDate>1/20/2024</FilingDate>
                <DocID>20012345</DocID>
            </Member>
            <Member>
                <Prefix>Hon.</Prefix>
                <Last>Jones</Last>
                <First>Mary</First>
                <Suffix/>
                <FilingType>O</FilingType>
                <StateDst>TX07</StateDst>
                <Year>2024</Year>
                <FilingDate>5/15/2024</FilingDate>
                <DocID>10054321</DocID>
            </Member>
        </FinancialDisclosure>"#;

    #[test]
    fn parse_keeps_only_periodic_transaction_reports() {
        let filings = parse_ptr_index(MANIFEST).unwrap();
        assert_eq!(filings.len(), 1);

        let filing = &filings[0];
        assert_eq!(filing.document_id, "20012345");
        assert_eq!(filing.last, "Smith");
        assert_eq!(filing.first, "John");
        assert_eq!(filing.state_dst, "CA12");
        assert_eq!(filing.year, 2024);
        assert_eq!(
            filing.filing_date,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()
        );
    }

    #[test]
    fn parse_rejects_member_with_missing_field() {
        let xml = r#"<FinancialDisclosure>
            <Member>
                <Last>Smith</Last>
                <FilingType>P</FilingType>
            </Member>
        </FinancialDisclosure>"#;
        assert!(parse_ptr_index(xml).is_err());
    }

    #[test]
    fn parse_rejects_unparseable_filing_date() {
        let xml = r#"<FinancialDisclosure>
            <Member>
                <Last>Smith</Last>
                <First>John</First>
                <FilingType>P</FilingType>
                <StateDst>CA12</StateDst>
                <Year>2024</Year>
                <FilingDate>2024-01-20</FilingDate>
                <DocID>20012345</DocID>
            </Member>
        </FinancialDisclosure>"#;
        assert!(parse_ptr_index(xml).is_err());
    }

    #[test]
    fn read_manifest_finds_the_yearly_xml_entry() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("2024FD.xml", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(MANIFEST.as_bytes()).unwrap();
            writer.finish().unwrap();
        }

        let xml = read_manifest(buf.get_ref(), 2024).unwrap();
        assert!(xml.contains("<DocID>20012345</DocID>"));

        // wrong year -> no manifest entry
        assert!(read_manifest(buf.get_ref(), 2023).is_err());
    }
}
