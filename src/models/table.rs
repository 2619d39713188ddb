use crate::error::{ProcessingError, Result};
use crate::utils::constants::MISSING_VALUE_TOKENS;
use std::path::{Path, PathBuf};

/// One persisted layer held in memory: a header row plus string cells.
///
/// Cells are kept as the exact text read from disk so columns the pipeline
/// does not touch are written back byte-for-byte.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayerTable {
    source: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl LayerTable {
    /// Build a table, checking that every row matches the header width.
    pub fn new(
        source: impl Into<PathBuf>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self> {
        let source = source.into();

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(ProcessingError::malformed(
                &source,
                format!(
                    "line {} has {} fields, header has {}",
                    index + 2,
                    row.len(),
                    headers.len()
                ),
            ));
        }

        Ok(Self {
            source,
            headers,
            rows,
        })
    }

    /// Path the table was read from; used to label errors.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ProcessingError::missing_column(name, &self.source))
    }

    /// Fail with `MissingColumn` naming the first absent column.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    pub fn column_values(&self, name: &str) -> Result<Vec<&str>> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[index].as_str()).collect())
    }

    /// Parse a column as floats; blank cells and missing-value tokens such as
    /// `NaN` or `NA` are missing values.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let index = self.column_index(name)?;

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                parse_optional_float(&row[index]).ok_or_else(|| {
                    ProcessingError::malformed(
                        &self.source,
                        format!(
                            "column '{}' line {}: '{}' is not a number",
                            name,
                            i + 2,
                            row[index]
                        ),
                    )
                })
            })
            .collect()
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        self.rows[row][column] = value;
    }

    /// Replace the column called `name`, or append it when absent.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(ProcessingError::InvalidFormat(format!(
                "column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        match self.headers.iter().position(|h| h == name) {
            Some(index) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(())
    }

    /// Stable reorder of the rows by one precomputed key per row.
    pub fn sort_rows_by_keys<K: Ord>(&mut self, keys: Vec<K>) {
        debug_assert_eq!(keys.len(), self.rows.len());

        let rows = std::mem::take(&mut self.rows);
        let mut keyed: Vec<(K, Vec<String>)> = keys.into_iter().zip(rows).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
    }

    /// Relabel the table with the path it is about to be written to.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }
}

/// `Some(None)` for a blank cell or a missing-value token, `Some(Some(v))` for
/// a finite number, `None` otherwise.
fn parse_optional_float(cell: &str) -> Option<Option<f64>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || MISSING_VALUE_TOKENS.contains(&trimmed) {
        return Some(None);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(Some)
}
