// src/extractors/transactions.rs

// --- Imports ---
use crate::extractors::rows::ReconstructedRow;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// --- Regex Patterns (Lazy Static) ---
// The bracketed classification code embedded in the asset description,
// restricted to the closed code set.
static ASSET_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(st|reit|rs|ps|op|ef)\]").expect("Failed to compile ASSET_TYPE_RE")
});

// An optional parenthesized ticker symbol in the asset description.
static TICKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\((.*?)\)").expect("Failed to compile TICKER_RE"));

/// The closed set of asset classifications a PTR transaction can carry.
/// Rows whose asset description carries no code from this set are not
/// securities transactions and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    /// Stock
    St,
    /// Real-estate investment trust
    Reit,
    /// Restricted stock
    Rs,
    /// Private stock
    Ps,
    /// Option
    Op,
    /// Exchange-traded fund
    Ef,
}

impl AssetType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "st" => Some(Self::St),
            "reit" => Some(Self::Reit),
            "rs" => Some(Self::Rs),
            "ps" => Some(Self::Ps),
            "op" => Some(Self::Op),
            "ef" => Some(Self::Ef),
            _ => None,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::St => "st",
            Self::Reit => "reit",
            Self::Rs => "rs",
            Self::Ps => "ps",
            Self::Op => "op",
            Self::Ef => "ef",
        }
    }
}

/// One validated securities transaction. `id` is the record's unique key
/// within its source document; the document id itself is stamped on by the
/// orchestration layer when results are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTransaction {
    pub id: String,
    pub owner: String,
    pub asset: String,
    pub transaction_type: String,
    pub date: String,
    pub amount: String,
    pub asset_type: AssetType,
    pub ticker: Option<String>,
}

/// Why a reconstructed row produced no transaction. These are expected,
/// high-frequency outcomes (real property, non-coded assets), not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilteredRow {
    EmptyAmount,
    NoAssetType,
}

/// Turns a reconstructed row into a validated transaction, or reports why the
/// row was dropped. The notification-date and cap-gains fields are not needed
/// downstream and do not survive normalization.
pub fn normalize(row: &ReconstructedRow) -> Result<ParsedTransaction, FilteredRow> {
    if row.amount.trim().is_empty() {
        return Err(FilteredRow::EmptyAmount);
    }

    let asset_type = ASSET_TYPE_RE
        .captures(&row.asset)
        .and_then(|caps| caps.get(1))
        .and_then(|code| AssetType::from_code(code.as_str()))
        .ok_or(FilteredRow::NoAssetType)?;

    // Many asset types carry no ticker; absence is not an error. Symbols are
    // reported upper-case regardless of the case-folding applied upstream.
    let ticker = TICKER_RE
        .captures(&row.asset)
        .and_then(|caps| caps.get(1))
        .map(|symbol| sanitize(symbol.as_str()).to_uppercase());

    Ok(ParsedTransaction {
        id: sanitize(&row.id),
        owner: sanitize(&row.owner),
        asset: sanitize(&row.asset),
        transaction_type: sanitize(&row.transaction_type),
        date: sanitize(&row.date),
        amount: sanitize(&row.amount),
        asset_type,
        ticker,
    })
}

/// PTR text streams occasionally carry stray NUL bytes from the PDF layer.
fn sanitize(text: &str) -> String {
    text.replace('\u{0}', "_").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstructed(asset: &str, amount: &str) -> ReconstructedRow {
        ReconstructedRow {
            id: "1".to_string(),
            owner: "self".to_string(),
            asset: asset.to_string(),
            transaction_type: "p".to_string(),
            date: "01/15/2024".to_string(),
            notification_date: "01/20/2024".to_string(),
            amount: amount.to_string(),
            cap_gains: "no".to_string(),
        }
    }

    #[test]
    fn stock_purchase_normalizes_with_type_and_ticker() {
        let row = reconstructed("apple inc [st] (aapl)", "$1,001 - $15,000");
        let tx = normalize(&row).unwrap();

        assert_eq!(tx.id, "1");
        assert_eq!(tx.asset_type, AssetType::St);
        assert_eq!(tx.ticker.as_deref(), Some("AAPL"));
        assert_eq!(tx.amount, "$1,001 - $15,000");
        assert_eq!(tx.transaction_type, "p");
    }

    #[test]
    fn ticker_is_absent_without_parentheses() {
        let row = reconstructed("blackstone mortgage trust [reit]", "$1,001 - $15,000");
        let tx = normalize(&row).unwrap();

        assert_eq!(tx.asset_type, AssetType::Reit);
        assert_eq!(tx.ticker, None);
    }

    #[test]
    fn row_without_bracketed_code_is_filtered() {
        let row = reconstructed("rental property, springfield il", "$15,001 - $50,000");
        assert_eq!(normalize(&row), Err(FilteredRow::NoAssetType));
    }

    #[test]
    fn unrecognized_bracketed_code_is_filtered() {
        let row = reconstructed("farmland llc [re]", "$15,001 - $50,000");
        assert_eq!(normalize(&row), Err(FilteredRow::NoAssetType));
    }

    #[test]
    fn whitespace_amount_is_filtered_even_with_valid_code() {
        let row = reconstructed("apple inc [st] (aapl)", "   ");
        assert_eq!(normalize(&row), Err(FilteredRow::EmptyAmount));
    }

    #[test]
    fn nul_bytes_are_replaced_and_fields_trimmed() {
        let row = ReconstructedRow {
            id: " 7 ".to_string(),
            owner: "sp\u{0}".to_string(),
            asset: " vanguard etf [ef] (vti)\u{0} ".to_string(),
            transaction_type: "s".to_string(),
            date: "03/01/2024".to_string(),
            notification_date: "03/05/2024".to_string(),
            amount: "$50,001 - $100,000".to_string(),
            cap_gains: "yes".to_string(),
        };
        let tx = normalize(&row).unwrap();

        assert_eq!(tx.id, "7");
        assert_eq!(tx.owner, "sp_");
        assert_eq!(tx.asset, "vanguard etf [ef] (vti)_");
        assert_eq!(tx.ticker.as_deref(), Some("VTI"));
    }

    #[test]
    fn every_code_in_the_fixed_set_round_trips() {
        for code in ["st", "reit", "rs", "ps", "op", "ef"] {
            let asset_type = AssetType::from_code(code).unwrap();
            assert_eq!(asset_type.as_code(), code);

            let row = reconstructed(&format!("some asset [{}]", code), "$1,001 - $15,000");
            assert_eq!(normalize(&row).unwrap().asset_type, asset_type);
        }
    }
}
