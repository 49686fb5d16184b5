use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use squad_ingest::merge::merge_squad_tables;
use squad_ingest::{ingest, persist};

struct Options {
    data_root: PathBuf,
    raw_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let opts = parse_args()?;
    let dirs = persist::ensure_data_dirs(&opts.data_root)
        .with_context(|| format!("bootstrap data dirs under {}", opts.data_root.display()))?;
    let raw_dir = opts.raw_dir.unwrap_or(dirs.raw);
    let out_dir = opts.out_dir.unwrap_or(dirs.interim);

    let summary = ingest::load_raw_sources(&raw_dir)?;
    if summary.sources.is_empty() && summary.errors.is_empty() {
        return Err(anyhow!("no raw sources found in {}", raw_dir.display()));
    }

    println!("Squad ingest complete");
    println!("Raw dir: {}", raw_dir.display());
    println!("Sources cleaned: {}", summary.sources.len());
    for (name, table) in &summary.sources {
        let path = out_dir.join(format!("{name}.parquet"));
        persist::write_parquet(table, &path)
            .with_context(|| format!("persist source '{name}'"))?;
        println!(
            "  {name}: {} columns x {} rows -> {}",
            table.n_cols(),
            table.n_rows(),
            path.display()
        );
    }

    match merge_squad_tables(&summary.sources) {
        Ok(merged) => {
            let path = out_dir.join("squad_merged.parquet");
            persist::write_parquet(&merged, &path).context("persist merged table")?;
            println!(
                "Merged: {} columns x {} rows -> {}",
                merged.n_cols(),
                merged.n_rows(),
                path.display()
            );
        }
        Err(err) => eprintln!("merge skipped: {err}"),
    }

    for note in &summary.notes {
        println!("note: {note}");
    }
    if !summary.errors.is_empty() {
        println!("errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(6) {
            eprintln!(" - {err}");
        }
    }
    Ok(())
}

fn parse_args() -> Result<Options> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut opts = Options {
        data_root: PathBuf::from("data"),
        raw_dir: None,
        out_dir: None,
    };
    let mut idx = 0;
    while idx < args.len() {
        match args[idx].as_str() {
            "--data" => {
                opts.data_root = PathBuf::from(flag_value(&args, idx, "--data")?);
                idx += 2;
            }
            "--raw" => {
                opts.raw_dir = Some(PathBuf::from(flag_value(&args, idx, "--raw")?));
                idx += 2;
            }
            "--out" => {
                opts.out_dir = Some(PathBuf::from(flag_value(&args, idx, "--out")?));
                idx += 2;
            }
            other => return Err(anyhow!("unknown argument '{other}'")),
        }
    }
    Ok(opts)
}

fn flag_value<'a>(args: &'a [String], idx: usize, flag: &str) -> Result<&'a str> {
    args.get(idx + 1)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("{flag} requires a value"))
}
