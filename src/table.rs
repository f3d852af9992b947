// 📋 Normalized Table - columnar output of one parsed report file
// Metadata columns first, then the layout's fields, then derived columns

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;

// ============================================================================
// CELL VALUES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Number(f64),
    Integer(i64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Missing,
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Text content, or `None` for non-text cells
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text content, treating missing (and non-text) cells as empty
    pub fn text_or_empty(&self) -> &str {
        self.as_text().unwrap_or("")
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// SQL-ish type name used by the loader
    pub fn sql_type(&self) -> Option<&'static str> {
        match self {
            Value::Number(_) => Some("REAL"),
            Value::Integer(_) => Some("INTEGER"),
            Value::Text(_) | Value::Date(_) | Value::DateTime(_) => Some("TEXT"),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Missing => Ok(()),
        }
    }
}

// ============================================================================
// COLUMN + TABLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

/// NormalizedTable - one per source file
///
/// Invariant: every column holds exactly `row_count()` values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    columns: Vec<Column>,
}

impl NormalizedTable {
    pub fn new() -> Self {
        NormalizedTable::default()
    }

    /// Build from columns; panics in debug builds on ragged input
    pub fn from_columns(columns: Vec<Column>) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0].values.len() == w[1].values.len()),
            "ragged columns"
        );
        NormalizedTable { columns }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cell lookup by row and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    pub fn row(&self, index: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    /// Append a column; its length must match the table (or the table is empty)
    pub fn push_column(&mut self, column: Column) {
        debug_assert!(
            self.columns.is_empty() || column.values.len() == self.row_count(),
            "column `{}` has wrong length",
            column.name
        );
        self.columns.push(column);
    }

    /// Replace the column of the same name, or append it
    pub fn set_column(&mut self, column: Column) {
        match self.column_index(&column.name) {
            Some(i) => {
                debug_assert_eq!(column.values.len(), self.row_count(), "column `{}` has wrong length", column.name);
                self.columns[i] = column;
            }
            None => self.push_column(column),
        }
    }

    /// Keep only rows for which `keep(row_index)` is true
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let mask: Vec<bool> = (0..self.row_count()).map(&mut keep).collect();
        for column in &mut self.columns {
            let mut flags = mask.iter();
            column.values.retain(|_| *flags.next().unwrap_or(&false));
        }
    }

    /// Remove exact duplicate rows, keeping the first occurrence
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.row_count();
        let keys: Vec<String> = (0..before).map(|i| self.row_key(i)).collect();
        let mut seen = HashSet::with_capacity(before);
        self.retain_rows(|i| seen.insert(keys[i].clone()));
        before - self.row_count()
    }

    /// Drop the first row, if any
    pub fn drop_first_row(&mut self) {
        if self.is_empty() {
            return;
        }
        for column in &mut self.columns {
            column.values.remove(0);
        }
    }

    fn row_key(&self, index: usize) -> String {
        self.columns
            .iter()
            .map(|c| format!("{:?}", c.values[index]))
            .collect::<Vec<_>>()
            .join("\u{1f}")
    }

    /// Wide-to-long reshape
    ///
    /// Every column not in `value_columns` is an id column (kept in order). The
    /// result has one row per (value column, source row), value-column-major,
    /// plus `var_name` holding the value column's name and `value_name` its
    /// cell.
    pub fn melt(&self, value_columns: &[String], var_name: &str, value_name: &str) -> NormalizedTable {
        let rows = self.row_count();
        let id_columns: Vec<&Column> = self
            .columns
            .iter()
            .filter(|c| !value_columns.contains(&c.name))
            .collect();
        let melted: Vec<&Column> = value_columns
            .iter()
            .filter_map(|name| self.column(name))
            .collect();

        let mut out: Vec<Column> = id_columns
            .iter()
            .map(|c| {
                let values = (0..melted.len())
                    .flat_map(|_| c.values.iter().cloned())
                    .collect();
                Column::new(c.name.clone(), values)
            })
            .collect();

        let mut labels = Vec::with_capacity(rows * melted.len());
        let mut cells = Vec::with_capacity(rows * melted.len());
        for column in &melted {
            for value in &column.values {
                labels.push(Value::Text(column.name.clone()));
                cells.push(value.clone());
            }
        }
        out.push(Column::new(var_name, labels));
        out.push(Column::new(value_name, cells));

        NormalizedTable::from_columns(out)
    }

    // ========================================================================
    // OUTPUT
    // ========================================================================

    /// Write header + rendered rows as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.column_names())
            .context("Failed to write CSV header")?;

        for i in 0..self.row_count() {
            let record: Vec<String> = self.row(i).iter().map(|v| v.to_string()).collect();
            wtr.write_record(&record)
                .with_context(|| format!("Failed to write CSV row {}", i))?;
        }

        wtr.flush().context("Failed to flush CSV writer")?;
        Ok(())
    }
}
