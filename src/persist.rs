use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use parquet::basic::{Compression, ConvertedType, Repetition, Type as PhysicalType};
use parquet::data_type::{ByteArray, ByteArrayType, DoubleType, Int64Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;

use crate::table::{Cell, Table};

/// On-disk layout under the data root. Created once before the pipeline
/// runs; the core never touches the filesystem layout itself.
#[derive(Debug, Clone)]
pub struct DataDirs {
    pub raw: PathBuf,
    pub interim: PathBuf,
    pub features: PathBuf,
    pub models: PathBuf,
}

pub fn ensure_data_dirs(root: &Path) -> Result<DataDirs> {
    let dirs = DataDirs {
        raw: root.join("raw"),
        interim: root.join("interim"),
        features: root.join("features"),
        models: root.join("models"),
    };
    for dir in [&dirs.raw, &dirs.interim, &dirs.features, &dirs.models] {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    Ok(dirs)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Utf8,
    Double,
    Int64,
}

/// Write one table to a parquet file, one row group, one chunk per column.
/// Text columns become optional UTF-8 byte arrays, numeric columns optional
/// doubles, integer columns optional int64; missing cells are nulls.
pub fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    if table.n_cols() == 0 {
        return Err(anyhow!("refusing to write empty table {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }

    let kinds = table
        .columns()
        .iter()
        .map(|col| column_kind(&col.cells))
        .collect::<Vec<_>>();
    let fields = table
        .columns()
        .iter()
        .zip(&kinds)
        .map(|(col, kind)| parquet_field(&col.name, *kind).map(Arc::new))
        .collect::<Result<Vec<_>>>()?;
    let schema = Type::group_type_builder("squad")
        .with_fields(fields)
        .build()
        .context("build parquet schema")?;

    let file = fs::File::create(path)
        .with_context(|| format!("create parquet file {}", path.display()))?;
    let props = Arc::new(
        WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build(),
    );
    let mut writer =
        SerializedFileWriter::new(file, Arc::new(schema), props).context("open parquet writer")?;

    let mut row_group = writer.next_row_group().context("open row group")?;
    let mut col_idx = 0usize;
    while let Some(mut col_writer) = row_group.next_column().context("next parquet column")? {
        let column = &table.columns()[col_idx];
        write_column(&mut col_writer, &column.cells, kinds[col_idx])
            .with_context(|| format!("write parquet column '{}'", column.name))?;
        col_writer.close().context("close parquet column")?;
        col_idx += 1;
    }
    row_group.close().context("close row group")?;
    writer.close().context("close parquet writer")?;
    Ok(())
}

fn column_kind(cells: &[Cell]) -> ColumnKind {
    if cells.iter().any(|c| matches!(c, Cell::Text(_))) {
        ColumnKind::Utf8
    } else if cells.iter().any(|c| matches!(c, Cell::Number(_))) {
        ColumnKind::Double
    } else if cells.iter().any(|c| matches!(c, Cell::Int(_))) {
        ColumnKind::Int64
    } else {
        // All-missing column: nulls either way, doubles are the least
        // surprising downstream.
        ColumnKind::Double
    }
}

fn parquet_field(name: &str, kind: ColumnKind) -> Result<Type> {
    let builder = match kind {
        ColumnKind::Utf8 => Type::primitive_type_builder(name, PhysicalType::BYTE_ARRAY)
            .with_converted_type(ConvertedType::UTF8),
        ColumnKind::Double => Type::primitive_type_builder(name, PhysicalType::DOUBLE),
        ColumnKind::Int64 => Type::primitive_type_builder(name, PhysicalType::INT64),
    };
    builder
        .with_repetition(Repetition::OPTIONAL)
        .build()
        .with_context(|| format!("build parquet field '{name}'"))
}

fn write_column(
    col_writer: &mut parquet::file::writer::SerializedColumnWriter<'_>,
    cells: &[Cell],
    kind: ColumnKind,
) -> Result<()> {
    let def_levels = cells
        .iter()
        .map(|c| if c.is_missing() { 0i16 } else { 1i16 })
        .collect::<Vec<_>>();
    match kind {
        ColumnKind::Utf8 => {
            let values = cells
                .iter()
                .filter(|c| !c.is_missing())
                .map(|c| ByteArray::from(c.to_string().into_bytes()))
                .collect::<Vec<_>>();
            col_writer
                .typed::<ByteArrayType>()
                .write_batch(&values, Some(&def_levels), None)?;
        }
        ColumnKind::Double => {
            let values = cells.iter().filter_map(|c| c.as_f64()).collect::<Vec<_>>();
            col_writer
                .typed::<DoubleType>()
                .write_batch(&values, Some(&def_levels), None)?;
        }
        ColumnKind::Int64 => {
            let values = cells
                .iter()
                .filter_map(|c| match c {
                    Cell::Int(v) => Some(*v),
                    _ => None,
                })
                .collect::<Vec<_>>();
            col_writer
                .typed::<Int64Type>()
                .write_batch(&values, Some(&def_levels), None)?;
        }
    }
    Ok(())
}
