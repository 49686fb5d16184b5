use chrono::NaiveDate;

use crate::table::{Cell, Table};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d.%m.%Y", "%d %b %Y"];

/// Coerce the named columns to canonical `YYYY-MM-DD` text. Values that do
/// not parse under any known format become missing; absent columns are
/// skipped.
pub fn coerce_dates(table: &mut Table, columns: &[&str]) {
    for name in columns {
        let Some(col) = table.column_mut(name) else {
            continue;
        };
        for cell in &mut col.cells {
            *cell = match cell.as_str().and_then(parse_date) {
                Some(date) => Cell::Text(date.format("%Y-%m-%d").to_string()),
                None => Cell::Missing,
            };
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Project a table onto the named columns, in the order given, silently
/// skipping any that are absent.
pub fn select_columns(table: &Table, columns: &[&str]) -> Table {
    let mut out = Table::new();
    for name in columns {
        if let Some(col) = table.column(name) {
            out.push_column(col.clone());
        }
    }
    out
}
