// src/clerk/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One entry of the Clerk's yearly financial-disclosure index, restricted to
/// the periodic-transaction filing type.
///
/// The index is published as `{year}FD.zip` containing an XML manifest with
/// one `Member` element per filing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PtrFiling {
    pub document_id: String,
    pub last: String,
    pub first: String,
    pub state_dst: String,
    pub year: u32,
    pub filing_date: NaiveDate,
}

impl PtrFiling {
    /// Constructs the URL of this filing's PDF document
    pub fn pdf_url(&self) -> String {
        format!(
            "https://disclosures-clerk.house.gov/public_disc/ptr-pdfs/{}/{}.pdf",
            self.year, self.document_id
        )
    }
}
