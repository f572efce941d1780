//! Merged cell propagation

use crate::app::models::RawSheet;

/// Copy each merged range's top-left value into every cell it covers
///
/// The ranges themselves are kept since layout detection looks at them.
/// Rows are widened where a range extends past a ragged row end.
pub fn unmerge(sheet: &RawSheet) -> RawSheet {
    let mut rows = sheet.rows.clone();

    for range in &sheet.merged {
        let value = sheet.cell(range.start_row, range.start_col).to_string();
        if value.is_empty() {
            continue;
        }

        for row in range.start_row..=range.end_row {
            if row >= rows.len() {
                rows.resize_with(row + 1, Vec::new);
            }
            let cells = &mut rows[row];
            if cells.len() <= range.end_col {
                cells.resize(range.end_col + 1, String::new());
            }
            for cell in &mut cells[range.start_col..=range.end_col] {
                *cell = value.clone();
            }
        }
    }

    RawSheet {
        name: sheet.name.clone(),
        rows,
        merged: sheet.merged.clone(),
    }
}
