use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;

use crate::error::PipelineError;
use crate::parse::{self, ParsedSource};
use crate::table::{Cell, Table};

/// Outcome of loading one raw directory: every source that cleaned
/// successfully, sorted by name, plus per-source diagnostics. A failed
/// document lands in `errors` without taking its siblings down.
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub sources: Vec<(String, Table)>,
    pub notes: Vec<String>,
    pub errors: Vec<String>,
}

/// Load every `*.html` and `*.csv` file under `raw_dir`, keyed by file stem,
/// and run each through the cleaning pipeline. Documents are independent,
/// so the parses fan out across the rayon pool; results come back sorted by
/// source name so the merge order downstream is deterministic.
pub fn load_raw_sources(raw_dir: &Path) -> Result<IngestSummary> {
    let mut files = list_source_files(raw_dir)
        .with_context(|| format!("list raw sources in {}", raw_dir.display()))?;
    files.sort();

    let outcomes: Vec<(String, Result<ParsedSource, PipelineError>)> = files
        .par_iter()
        .map(|path| (source_stem(path), load_one_source(path)))
        .collect();

    let mut summary = IngestSummary::default();
    let mut cleaned_stems: Vec<String> = Vec::new();
    for (stem, outcome) in outcomes {
        // The first file per stem that cleans successfully wins; a failed
        // sibling only contributes to the error report.
        if cleaned_stems.contains(&stem) {
            summary
                .notes
                .push(format!("{stem}: duplicate source stem, keeping the first"));
            continue;
        }
        match outcome {
            Ok(parsed) => {
                summary.notes.extend(parsed.notes);
                summary.sources.push((stem.clone(), parsed.table));
                cleaned_stems.push(stem);
            }
            Err(err) => {
                summary.errors.push(format!("{stem}: {err}"));
            }
        }
    }
    Ok(summary)
}

fn list_source_files(raw_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(raw_dir)
        .with_context(|| format!("read directory {}", raw_dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.context("read directory entry")?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if matches!(ext.as_deref(), Some("html" | "htm" | "csv")) {
            files.push(path);
        }
    }
    Ok(files)
}

fn source_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("source")
        .to_string()
}

fn load_one_source(path: &Path) -> Result<ParsedSource, PipelineError> {
    let name = source_stem(path);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if ext == "csv" {
        let table = read_csv_table(path).map_err(|err| PipelineError::DocumentRead {
            name: name.clone(),
            reason: err.to_string(),
        })?;
        let (rows, cols) = (table.n_rows(), table.n_cols());
        Ok(ParsedSource {
            table: parse::clean_squad_table(table),
            notes: vec![format!("{name}: single-table source, {cols} columns x {rows} rows")],
        })
    } else {
        let html = fs::read_to_string(path).map_err(|err| PipelineError::DocumentRead {
            name: name.clone(),
            reason: err.to_string(),
        })?;
        parse::parse_squad_html(&name, &html)
    }
}

/// Read a CSV file into a raw all-text table. The first record is the
/// header; short records are padded with missing cells.
pub fn read_csv_table(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open csv {}", path.display()))?;
    let headers = reader
        .headers()
        .context("read csv headers")?
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(anyhow!("csv {} has no header row", path.display()));
    }
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("read csv record")?;
        rows.push(record.iter().map(Cell::text).collect::<Vec<_>>());
    }
    Ok(Table::from_rows(headers, rows))
}
