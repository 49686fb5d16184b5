use crate::table::{Cell, Column, Table};

/// Join key column shared by every squad export.
pub const IDENTITY_COLUMN: &str = "Player";

/// Composite appearances column as it appears in the raw exports.
pub const APPS_COLUMN: &str = "Apps";

/// UI artifact the export tool appends to some player names.
const PICK_PLAYER_SUFFIX: &str = "- Pick Player";

/// Canonical lowercase/underscore form of a column name: non-alphanumeric
/// runs collapse to a single underscore, leading/trailing underscores are
/// stripped, everything case-folded.
pub fn snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Trim headers and collapse embedded newlines to spaces. Multi-line headers
/// are common in the HTML exports ("Pas\n%" and the like).
pub fn standardize_headers(table: &mut Table) {
    for col in table.columns_mut() {
        let cleaned = col
            .name
            .replace(['\n', '\r'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        col.name = cleaned;
    }
}

/// Coerce one column of free-form text into numbers.
///
/// Columns that carry no text cells pass through untouched. Text cells are
/// trimmed, thousands commas and percent signs removed, empty string and a
/// single dash become missing, and anything unparseable becomes missing
/// rather than an error. If any cell in the column carried a percent sign
/// the whole column is divided by 100: a column is assumed to be entirely
/// percentages or entirely not.
pub fn normalize_numeric(column: &mut Column) {
    if column.cells.iter().all(Cell::is_non_text) {
        return;
    }
    let mut any_percent = false;
    let mut out = Vec::with_capacity(column.cells.len());
    for cell in &column.cells {
        let next = match cell {
            Cell::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.contains('%') {
                    any_percent = true;
                }
                let stripped: String = trimmed
                    .chars()
                    .filter(|c| *c != ',' && *c != '%')
                    .collect();
                let stripped = stripped.trim();
                if stripped.is_empty() || stripped == "-" {
                    Cell::Missing
                } else {
                    match stripped.parse::<f64>() {
                        Ok(v) => Cell::Number(v),
                        Err(_) => Cell::Missing,
                    }
                }
            }
            other => other.clone(),
        };
        out.push(next);
    }
    if any_percent {
        for cell in &mut out {
            match cell {
                Cell::Number(v) => *v /= 100.0,
                Cell::Int(v) => *cell = Cell::Number(*v as f64 / 100.0),
                _ => {}
            }
        }
    }
    column.cells = out;
}

/// Split a composite appearances column ("26 (1)" = 26 starts, 1 sub
/// appearance) into a nullable `apps` column and an `apps_sub` column.
///
/// A value without a leading integer yields a missing starts count; a value
/// without a parenthesized integer yields zero sub appearances (no
/// parenthetical means the player never came off the bench, not a parse
/// failure). The source column is removed so it cannot be derived twice.
pub fn split_appearances(table: &mut Table, source: &str) {
    let Some(index) = table.column_index(source) else {
        return;
    };
    let mut starts = Vec::with_capacity(table.n_rows());
    let mut subs = Vec::with_capacity(table.n_rows());
    for cell in &table.columns()[index].cells {
        let raw = cell.as_str().unwrap_or("");
        let (start, sub) = split_composite(raw);
        starts.push(start.map(Cell::Number).unwrap_or(Cell::Missing));
        subs.push(Cell::Int(sub));
    }
    table.replace_column_at(index, Column::new("apps", starts));
    table.insert_column(index + 1, Column::new("apps_sub", subs));
}

fn split_composite(raw: &str) -> (Option<f64>, i64) {
    let trimmed = raw.trim();
    let leading: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let starts = leading.parse::<f64>().ok();
    let sub = trimmed
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .and_then(|(inner, _)| inner.trim().parse::<i64>().ok())
        .unwrap_or(0);
    (starts, sub)
}

/// Strip the "- Pick Player" artifact and surrounding whitespace from the
/// identity column. A missing column is a no-op.
pub fn clean_player_names(table: &mut Table, column: &str) {
    let Some(col) = table.column_mut(column) else {
        return;
    };
    for cell in &mut col.cells {
        if let Cell::Text(s) = cell {
            let cleaned = s.replace(PICK_PLAYER_SUFFIX, "");
            *s = cleaned.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{snake, split_composite};

    #[test]
    fn snake_collapses_runs() {
        assert_eq!(snake("Pas %"), "pas");
        assert_eq!(snake("Shots on Target"), "shots_on_target");
        assert_eq!(snake("  Hdrs W/90 "), "hdrs_w_90");
        assert_eq!(snake("apps"), "apps");
        assert_eq!(snake("Sv %"), "sv");
    }

    #[test]
    fn split_composite_cases() {
        assert_eq!(split_composite("26 (1)"), (Some(26.0), 1));
        assert_eq!(split_composite("26"), (Some(26.0), 0));
        assert_eq!(split_composite("(1)"), (None, 1));
        assert_eq!(split_composite(""), (None, 0));
        assert_eq!(split_composite("  3 (12) "), (Some(3.0), 12));
    }
}
