use crate::errors::StoreError;
use crate::models::HEADERS;
use crate::store::Worksheet;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Intact,
    /// The sheet was empty and got its header row.
    Created,
    /// A malformed header was found; the sheet was wiped and re-headed.
    Repaired,
}

/// Makes row 1 equal the expected header triple.
///
/// A mismatching header is not merged: the whole sheet, data rows included,
/// is cleared before the header is written.
pub async fn ensure_headers(sheet: &dyn Worksheet) -> Result<HeaderCheck, StoreError> {
    let first_row = sheet.row_values(1).await?;
    if first_row.iter().map(String::as_str).eq(HEADERS) {
        return Ok(HeaderCheck::Intact);
    }

    // A blank row 1 only counts as an empty sheet when nothing sits below it.
    let rows = sheet.all_values().await?;
    let check = if rows.iter().all(|row| row.iter().all(|cell| cell.is_empty())) {
        if !rows.is_empty() {
            sheet.clear().await?;
        }
        HeaderCheck::Created
    } else {
        let discarded = rows.len().saturating_sub(1);
        warn!(
            found = ?first_row,
            discarded_rows = discarded,
            "sheet header mismatch, clearing sheet"
        );
        sheet.clear().await?;
        HeaderCheck::Repaired
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    sheet.append_row(&header).await?;
    info!("created required headers in the sheet");

    Ok(check)
}
