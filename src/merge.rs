use std::collections::HashMap;

use crate::clean::{snake, APPS_COLUMN, IDENTITY_COLUMN};
use crate::error::PipelineError;
use crate::table::{Cell, Column, Table};

/// Source that defines the row universe when present.
pub const PREFERRED_BASE: &str = "squad_1";

/// Merge already-cleaned source tables into one wide per-player table.
///
/// The input is an explicit ordered sequence so output column order and
/// duplicate suffixes are deterministic. The base table ("squad_1" when
/// present, else the lexicographically smallest source) defines the row
/// universe; every other table is left-joined onto it by player name with
/// its columns prefixed by the source name. Secondary tables without a
/// player column contribute nothing and are skipped.
pub fn merge_squad_tables(sources: &[(String, Table)]) -> Result<Table, PipelineError> {
    if sources.is_empty() {
        return Err(PipelineError::NoInputTables);
    }

    let base_idx = choose_base(sources);
    let (base_name, base_table) = &sources[base_idx];
    let mut merged = base_table.clone();

    // A raw textual Apps column surviving this far would collide with the
    // numeric apps column once snaked.
    merged.drop_column(APPS_COLUMN);

    if !merged.has_column(IDENTITY_COLUMN) {
        return Err(PipelineError::MissingIdentityColumn {
            table: base_name.clone(),
            column: IDENTITY_COLUMN.to_string(),
        });
    }
    for col in merged.columns_mut() {
        if col.name != IDENTITY_COLUMN {
            col.name = snake(&col.name);
        }
    }

    // Join keys never change after this point; compute them once.
    let base_keys: Vec<Option<String>> = merged
        .column(IDENTITY_COLUMN)
        .map(|col| {
            col.cells
                .iter()
                .map(|cell| cell.as_str().map(|s| s.to_string()))
                .collect()
        })
        .unwrap_or_default();

    for (idx, (name, table)) in sources.iter().enumerate() {
        if idx == base_idx {
            continue;
        }
        merge_secondary(&mut merged, &base_keys, name, table);
    }

    dedup_column_names(&mut merged);
    Ok(merged)
}

fn choose_base(sources: &[(String, Table)]) -> usize {
    if let Some(idx) = sources.iter().position(|(name, _)| name == PREFERRED_BASE) {
        return idx;
    }
    let mut best = 0;
    for (idx, (name, _)) in sources.iter().enumerate().skip(1) {
        if *name < sources[best].0 {
            best = idx;
        }
    }
    best
}

fn merge_secondary(
    merged: &mut Table,
    base_keys: &[Option<String>],
    source_name: &str,
    table: &Table,
) {
    let mut secondary = table.clone();
    if !secondary.has_column(IDENTITY_COLUMN) {
        // Some exports label the join key "Name" instead of "Player".
        if !secondary.rename_column("Name", IDENTITY_COLUMN) {
            return;
        }
    }
    secondary.drop_column(APPS_COLUMN);

    let prefix = snake(source_name);
    for col in secondary.columns_mut() {
        if col.name != IDENTITY_COLUMN {
            col.name = format!("{prefix}__{}", snake(&col.name));
        }
    }

    // First occurrence wins when a secondary table repeats a player.
    let mut row_by_key: HashMap<&str, usize> = HashMap::new();
    if let Some(key_col) = secondary.column(IDENTITY_COLUMN) {
        for (row, cell) in key_col.cells.iter().enumerate() {
            if let Some(key) = cell.as_str() {
                row_by_key.entry(key).or_insert(row);
            }
        }
    }

    for col in secondary.columns() {
        if col.name == IDENTITY_COLUMN {
            continue;
        }
        let cells = base_keys
            .iter()
            .map(|key| {
                key.as_deref()
                    .and_then(|k| row_by_key.get(k))
                    .map(|&row| col.cells[row].clone())
                    .unwrap_or(Cell::Missing)
            })
            .collect();
        merged.push_column(Column::new(col.name.clone(), cells));
    }
}

/// Suffix repeated column names left to right: the first occurrence keeps
/// the plain name, the n-th repeat becomes `<name>__dup<n>`.
fn dedup_column_names(table: &mut Table) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for col in table.columns_mut() {
        let count = seen.entry(col.name.clone()).or_insert(0);
        if *count > 0 {
            col.name = format!("{}__dup{}", col.name, *count);
        }
        *count += 1;
    }
}
