// src/extractors/rows.rs

/// One physical table row as extracted from the PDF grid. Cells may contain
/// embedded newlines where the rendering engine wrapped text within the row.
///
/// Column order is a layout invariant of the PTR table:
/// 0: id, 1: owner, 2: asset, 3: transaction type, 4: date,
/// 5: notification date, 6: amount, 7: cap gains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub id: String,
    pub owner: String,
    pub asset: String,
    pub transaction_type: String,
    pub date: String,
    pub notification_date: String,
    pub amount: String,
    pub cap_gains: String,
}

impl From<[String; 8]> for RawRow {
    fn from(cells: [String; 8]) -> Self {
        let [id, owner, asset, transaction_type, date, notification_date, amount, cap_gains] =
            cells;
        Self {
            id,
            owner,
            asset,
            transaction_type,
            date,
            notification_date,
            amount,
            cap_gains,
        }
    }
}

/// A logical row with all multi-line overflow resolved: the single-value
/// columns hold their first-line value, the asset text is reassembled in
/// original top-to-bottom order, and every cell is lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedRow {
    pub id: String,
    pub owner: String,
    pub asset: String,
    pub transaction_type: String,
    pub date: String,
    pub notification_date: String,
    pub amount: String,
    pub cap_gains: String,
}

/// Resolves multi-line overflow so that one physical row becomes exactly one
/// logical row.
///
/// The asset column can wrap onto additional lines. When it does, the
/// transaction-type, date, and notification-date columns on the same visual
/// row carry their true value on the first line only; any further lines in
/// those columns are asset text that the line-splitting extraction attributed
/// to the wrong column.
pub fn reconstruct(raw: &RawRow) -> ReconstructedRow {
    let mut asset = split_lines(&raw.asset);
    let mut transaction_type = split_lines(&raw.transaction_type);
    let mut date = split_lines(&raw.date);
    let mut notification_date = split_lines(&raw.notification_date);

    // First line holds the field value. The transaction-type cell may carry
    // trailing annotation after the type code, so keep only the first token.
    let transaction_type_value = transaction_type[0]
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();
    let date_value = date[0].clone();
    let notification_date_value = notification_date[0].clone();

    // Everything still in these sequences is overflowed asset text.
    transaction_type[0].clear();
    date[0].clear();
    notification_date[0].clear();

    // The last physical line is a genuine asset fragment in all four columns,
    // so align the line sequences from the bottom up.
    asset.reverse();
    transaction_type.reverse();
    date.reverse();
    notification_date.reverse();

    let depth = asset
        .len()
        .max(transaction_type.len())
        .max(date.len())
        .max(notification_date.len());
    let mut merged: Vec<String> = (0..depth)
        .map(|i| {
            format!(
                "{}{}{}{}",
                line_at(&asset, i),
                line_at(&transaction_type, i),
                line_at(&date, i),
                line_at(&notification_date, i)
            )
        })
        .collect();
    merged.reverse();

    ReconstructedRow {
        id: raw.id.to_lowercase(),
        owner: raw.owner.to_lowercase(),
        asset: merged.join(" "),
        transaction_type: transaction_type_value,
        date: date_value,
        notification_date: notification_date_value,
        // The amount cell wraps too, but its fragments need no reordering.
        amount: raw.amount.to_lowercase().replace('\n', " "),
        cap_gains: raw.cap_gains.to_lowercase(),
    }
}

/// Lower-cases a cell and splits it into its physical rendering lines.
/// Always yields at least one line.
fn split_lines(cell: &str) -> Vec<String> {
    cell.to_lowercase().split('\n').map(str::to_string).collect()
}

fn line_at(lines: &[String], index: usize) -> &str {
    lines.get(index).map(String::as_str).unwrap_or_default()
}
