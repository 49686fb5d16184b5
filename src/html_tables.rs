use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::error::PipelineError;
use crate::table::{Cell, Table};

static TABLE_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("static selector"));
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));
static HEADER_CELL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("th").expect("static selector"));
static CELL_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("th, td").expect("static selector"));

/// Parse every `<table>` in the document into a raw all-text table.
///
/// The header row is the first row's `<th>` cells when present, otherwise
/// the first row verbatim. Tables that yield no columns (decorative or
/// layout tables with no rows) are dropped.
pub fn extract_tables(html: &str) -> Vec<Table> {
    let document = Html::parse_document(html);
    document
        .select(&TABLE_SEL)
        .filter_map(extract_one_table)
        .filter(|t| t.n_cols() > 0)
        .collect()
}

fn extract_one_table(table_el: ElementRef<'_>) -> Option<Table> {
    let mut rows = table_el.select(&ROW_SEL);
    let first = rows.next()?;

    let header_cells: Vec<String> = first
        .select(&HEADER_CELL_SEL)
        .map(|c| cell_text(&c))
        .collect();
    let headers = if header_cells.is_empty() {
        first.select(&CELL_SEL).map(|c| cell_text(&c)).collect()
    } else {
        header_cells
    };

    let data = rows
        .map(|row| {
            row.select(&CELL_SEL)
                .map(|c| Cell::Text(cell_text(&c)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Some(Table::from_rows(headers, data))
}

fn cell_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick the one table in a document most likely to be the real data grid:
/// the widest table, ties broken by the longest. Zero candidates is an
/// error; the caller decides what a single failed document means for the
/// rest of the batch.
pub fn select_primary_table(
    name: &str,
    tables: Vec<Table>,
) -> Result<(Table, Vec<String>), PipelineError> {
    if tables.is_empty() {
        return Err(PipelineError::EmptyDocument {
            name: name.to_string(),
        });
    }
    let total = tables.len();
    let mut best: Option<Table> = None;
    for table in tables {
        let replace = match &best {
            None => true,
            Some(current) => {
                (table.n_cols(), table.n_rows()) > (current.n_cols(), current.n_rows())
            }
        };
        if replace {
            best = Some(table);
        }
    }
    let Some(chosen) = best else {
        return Err(PipelineError::EmptyDocument {
            name: name.to_string(),
        });
    };
    let notes = vec![format!(
        "{name}: selected table with {} columns x {} rows out of {total} candidate(s)",
        chosen.n_cols(),
        chosen.n_rows()
    )];
    Ok((chosen, notes))
}
