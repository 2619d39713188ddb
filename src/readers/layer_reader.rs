use crate::error::{ProcessingError, Result};
use crate::models::LayerTable;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Reads a comma-separated layer file with a mandatory header row.
pub struct LayerReader;

impl LayerReader {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a layer file
    pub fn read(&self, path: &Path) -> Result<LayerTable> {
        let bytes = self.read_bytes(path)?;
        self.parse(path, &bytes)
    }

    /// Raw bytes of a layer file; `SourceNotFound` when it is absent or
    /// cannot be read.
    pub fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| map_read_error(path, e))
    }

    /// Parse already-loaded bytes, labelling errors with `path`
    pub fn parse(&self, path: &Path, bytes: &[u8]) -> Result<LayerTable> {
        let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
        if had_errors {
            return Err(ProcessingError::malformed(path, "file is not valid UTF-8"));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| map_csv_error(path, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();
        self.check_headers(path, &headers)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| map_csv_error(path, e))?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        debug!(
            "Parsed {} rows x {} columns from {}",
            rows.len(),
            headers.len(),
            path.display()
        );

        LayerTable::new(path, headers, rows)
    }

    fn check_headers(&self, path: &Path, headers: &[String]) -> Result<()> {
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ProcessingError::malformed(path, "header row is missing"));
        }

        if let Some(position) = headers.iter().position(|h| h.trim().is_empty()) {
            return Err(ProcessingError::malformed(
                path,
                format!("header column {} has no name", position + 1),
            ));
        }

        let mut seen = HashSet::with_capacity(headers.len());
        for header in headers {
            if !seen.insert(header.as_str()) {
                return Err(ProcessingError::malformed(
                    path,
                    format!("header column '{}' appears more than once", header),
                ));
            }
        }

        Ok(())
    }
}

impl Default for LayerReader {
    fn default() -> Self {
        Self::new()
    }
}

fn map_csv_error(path: &Path, error: csv::Error) -> ProcessingError {
    match error.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
            ProcessingError::malformed(
                path,
                format!(
                    "line {} has {} fields, header has {}",
                    line, len, expected_len
                ),
            )
        }
        _ => ProcessingError::malformed(path, error.to_string()),
    }
}

fn map_read_error(path: &Path, error: io::Error) -> ProcessingError {
    match error.kind() {
        io::ErrorKind::NotFound => ProcessingError::SourceNotFound {
            path: path.to_path_buf(),
        },
        _ => ProcessingError::SourceUnreadable {
            path: path.to_path_buf(),
            source: error,
        },
    }
}
