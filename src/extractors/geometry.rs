// src/extractors/geometry.rs

// --- Imports ---
use crate::extractors::rows::RawRow;
use crate::utils::error::ExtractError;
use pdfplumber::{Cell, CroppedPage, ExplicitLines, Pdf, Rect, Strategy, TableSettings};

/// The PTR table always renders these eight columns, in this order:
/// id, owner, asset, transaction type, date, notification date, amount,
/// cap gains.
const COLUMN_COUNT: usize = 8;

/// Extracts every physical table row of a PTR document, in document order.
///
/// Most PTR columns have no visible vertical rule, so the layout engine's
/// heuristic column detection is unreliable for this document family. The
/// decorated header boxes are the one dependable geometry cue: their left
/// edges plus the right edge of the last box give the column boundaries, and
/// the grid is re-extracted with those boundaries as explicit vertical
/// separators.
pub fn extract_raw_rows(pdf_bytes: &[u8]) -> Result<Vec<RawRow>, ExtractError> {
    let pdf = Pdf::open(pdf_bytes, None)?;

    // Crop every page down to its detected table regions.
    let mut regions: Vec<CroppedPage> = Vec::new();
    for page in pdf.pages_iter() {
        let page = page?;
        for table in page.find_tables(&TableSettings::default()) {
            regions.push(page.crop(table.bbox));
        }
    }

    let first = regions.first().ok_or(ExtractError::NoTableFound)?;
    let boundaries = column_boundaries(first.rects())?;
    tracing::debug!("Derived column boundaries: {:?}", boundaries);

    let settings = TableSettings {
        strategy: Strategy::Explicit,
        explicit_lines: Some(ExplicitLines {
            horizontal_lines: Vec::new(),
            vertical_lines: boundaries,
        }),
        ..TableSettings::default()
    };

    let mut rows = Vec::new();
    for region in &regions {
        for table in region.find_tables(&settings) {
            // The first row of every grid is the decorated header row.
            for cells in table.rows.iter().skip(1) {
                rows.push(raw_row(cells)?);
            }
        }
    }
    Ok(rows)
}

/// Derives the 9 column boundary x-coordinates from the first 8 header
/// decoration rectangles of the cropped table region, in left-to-right order.
fn column_boundaries(rects: &[Rect]) -> Result<Vec<f64>, ExtractError> {
    if rects.len() < COLUMN_COUNT {
        return Err(ExtractError::MissingHeaderRects { found: rects.len() });
    }

    let header = &rects[..COLUMN_COUNT];
    let mut boundaries: Vec<f64> = header.iter().map(|rect| rect.x0).collect();
    boundaries.push(header[COLUMN_COUNT - 1].x1);
    Ok(boundaries)
}

fn raw_row(cells: &[Cell]) -> Result<RawRow, ExtractError> {
    let texts: Vec<String> = cells
        .iter()
        .map(|cell| cell.text.clone().unwrap_or_default())
        .collect();
    let texts: [String; COLUMN_COUNT] = texts
        .try_into()
        .map_err(|cells: Vec<String>| ExtractError::RowShape { found: cells.len() })?;
    Ok(RawRow::from(texts))
}
