use crate::clean::{self, APPS_COLUMN, IDENTITY_COLUMN};
use crate::error::PipelineError;
use crate::html_tables;
use crate::table::Table;

/// One cleaned source table plus the diagnostic notes produced on the way.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub table: Table,
    pub notes: Vec<String>,
}

/// Parse one exported HTML document into a cleaned squad table.
///
/// Picks the most plausible data table out of the document, then runs the
/// shared cleaning pipeline over it.
pub fn parse_squad_html(name: &str, html: &str) -> Result<ParsedSource, PipelineError> {
    let candidates = html_tables::extract_tables(html);
    let (table, notes) = html_tables::select_primary_table(name, candidates)?;
    Ok(ParsedSource {
        table: clean_squad_table(table),
        notes,
    })
}

/// The cleaning pipeline shared by HTML and single-table (CSV) sources.
///
/// Order matters: the composite appearances column must be split and the
/// player names cleaned before blanket numeric coercion, or the "Apps" text
/// would be destroyed before extraction and the name strings coerced to
/// missing.
pub fn clean_squad_table(mut table: Table) -> Table {
    clean::standardize_headers(&mut table);
    clean::split_appearances(&mut table, APPS_COLUMN);
    clean::clean_player_names(&mut table, IDENTITY_COLUMN);
    // Secondary exports label the join key "Name"; it carries the same UI
    // artifact and must stay joinable after the merge renames it.
    clean::clean_player_names(&mut table, "Name");
    for col in table.columns_mut() {
        if col.name != IDENTITY_COLUMN && col.name != "Name" {
            clean::normalize_numeric(col);
        }
    }
    table
}
