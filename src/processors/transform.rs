use crate::error::{ProcessingError, Result};
use crate::models::LayerTable;
use crate::readers::LayerReader;
use crate::utils::constants::{
    COL_AVG_TEMP, COL_DATE, COL_DATE_CODE, COL_MONTH, COL_PRECIP, COL_SUNSHINE, COL_UV_INDEX,
    DATE_CODE_FORMAT, ISO_DATE_FORMAT, PRECIP_TRACE_REPAIRED, PRECIP_TRACE_SENTINEL,
    RAW_REQUIRED_COLUMNS,
};
use crate::writers::LayerWriter;
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct TransformReport {
    pub rows: usize,
    pub repaired_precip: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub destination: PathBuf,
}

impl TransformReport {
    pub fn summary(&self) -> String {
        let range = match self.date_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "no records".to_string(),
        };

        format!(
            "Cleaned {} rows ({}), repaired {} trace-rain values, wrote {}",
            self.rows,
            range,
            self.repaired_precip,
            self.destination.display()
        )
    }
}

/// Counters collected while cleaning one table
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformStats {
    pub repaired_precip: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Turns the raw layer into the cleaned layer: parses dates, repairs the
/// trace-rain sentinel, sorts by date and derives the calendar month.
pub struct Transformer {
    reader: LayerReader,
    writer: LayerWriter,
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            reader: LayerReader::new(),
            writer: LayerWriter::new(),
        }
    }

    pub fn transform_file(&self, raw_layer: &Path, cleaned_layer: &Path) -> Result<TransformReport> {
        info!("Transforming raw layer {}", raw_layer.display());

        let raw = self.reader.read(raw_layer)?;
        let (cleaned, stats) = self.transform(raw)?;
        self.writer.write_table(&cleaned, cleaned_layer)?;

        let report = TransformReport {
            rows: cleaned.len(),
            repaired_precip: stats.repaired_precip,
            date_range: stats.first_date.zip(stats.last_date),
            destination: cleaned_layer.to_path_buf(),
        };
        info!("{}", report.summary());

        Ok(report)
    }

    /// Clean a raw table in memory. Deterministic for a given input.
    pub fn transform(&self, mut table: LayerTable) -> Result<(LayerTable, TransformStats)> {
        table.require_columns(&RAW_REQUIRED_COLUMNS)?;
        for column in [COL_AVG_TEMP, COL_SUNSHINE, COL_UV_INDEX] {
            table.numeric_column(column)?;
        }

        let mut dates = parse_date_codes(&table)?;
        let repaired_precip = repair_precipitation(&mut table)?;
        debug!("Repaired {} precipitation sentinel values", repaired_precip);

        table.sort_rows_by_keys(dates.clone());
        dates.sort();

        table.set_column(
            COL_DATE,
            dates
                .iter()
                .map(|d| d.format(ISO_DATE_FORMAT).to_string())
                .collect(),
        )?;
        table.set_column(
            COL_MONTH,
            dates.iter().map(|d| d.month().to_string()).collect(),
        )?;

        let stats = TransformStats {
            repaired_precip,
            first_date: dates.first().copied(),
            last_date: dates.last().copied(),
        };

        Ok((table, stats))
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `YYYYMMDD` date code
pub fn parse_date_code(code: &str) -> Option<NaiveDate> {
    let code = code.trim();
    if code.len() != 8 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(code, DATE_CODE_FORMAT).ok()
}

pub fn is_trace_sentinel(value: f64) -> bool {
    value == PRECIP_TRACE_SENTINEL
}

/// Parse every date code, rejecting unparsable and repeated dates
fn parse_date_codes(table: &LayerTable) -> Result<Vec<NaiveDate>> {
    let codes = table.column_values(COL_DATE_CODE)?;
    let mut seen: HashMap<NaiveDate, usize> = HashMap::with_capacity(codes.len());
    let mut dates = Vec::with_capacity(codes.len());

    for (i, code) in codes.iter().enumerate() {
        let line = i + 2;
        let date = parse_date_code(code).ok_or_else(|| ProcessingError::InvalidDate {
            value: code.to_string(),
            line,
            path: table.source().to_path_buf(),
        })?;

        if seen.insert(date, line).is_some() {
            return Err(ProcessingError::DuplicateDate {
                date,
                line,
                path: table.source().to_path_buf(),
            });
        }
        dates.push(date);
    }

    Ok(dates)
}

/// Rewrite trace-rain sentinel cells in place; other cells keep their text
fn repair_precipitation(table: &mut LayerTable) -> Result<usize> {
    let index = table.column_index(COL_PRECIP)?;
    let values = table.numeric_column(COL_PRECIP)?;
    let mut repaired = 0;

    for (row, value) in values.into_iter().enumerate() {
        if value.is_some_and(is_trace_sentinel) {
            table.set_cell(row, index, PRECIP_TRACE_REPAIRED.to_string());
            repaired += 1;
        }
    }

    Ok(repaired)
}
