use std::fmt;

/// A single cell value. Missing is a first-class state rather than a
/// sentinel, so "unparseable" and "no match on join" are representable
/// without resorting to NaN or empty strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Int(i64),
    Missing,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// True for cells that already carry (or lack) a numeric value, i.e.
    /// everything except raw text.
    pub fn is_non_text(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Int(v) => write!(f, "{v}"),
            Cell::Missing => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }
}

/// An ordered sequence of named columns aligned by row position.
/// All columns always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header row and data rows. Short rows are padded
    /// with missing cells; cells beyond the header width are dropped.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = headers.len();
        let mut columns = headers
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect::<Vec<_>>();
        for mut row in rows {
            row.resize(width, Cell::Missing);
            for (col, cell) in columns.iter_mut().zip(row) {
                col.cells.push(cell);
            }
        }
        Self { columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> impl Iterator<Item = &mut Column> {
        self.columns.iter_mut()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Append a column. The caller guarantees the cell count matches the
    /// current row count; this is checked in debug builds only.
    pub fn push_column(&mut self, column: Column) {
        debug_assert!(
            self.columns.is_empty() || column.cells.len() == self.n_rows(),
            "column length mismatch"
        );
        self.columns.push(column);
    }

    /// Remove a column by name; returns false if no such column exists.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let before = self.columns.len();
        self.columns.retain(|c| c.name != name);
        self.columns.len() != before
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        if let Some(col) = self.column_mut(from) {
            col.name = to.to_string();
            true
        } else {
            false
        }
    }

    /// Replace the column at `index`, keeping its position.
    pub fn replace_column_at(&mut self, index: usize, column: Column) {
        debug_assert!(column.cells.len() == self.n_rows(), "column length mismatch");
        self.columns[index] = column;
    }

    pub fn insert_column(&mut self, index: usize, column: Column) {
        debug_assert!(column.cells.len() == self.n_rows(), "column length mismatch");
        self.columns.insert(index, column);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
