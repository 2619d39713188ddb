use crate::error::{ProcessingError, Result};
use crate::models::LayerTable;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes layer files through a sibling temp file and an atomic rename, so a
/// reader sees either the previous layer or the complete new one.
pub struct LayerWriter;

impl LayerWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize a table as CSV and replace `path` with it
    pub fn write_table(&self, table: &LayerTable, path: &Path) -> Result<()> {
        let bytes = self.serialize(table)?;
        self.write_bytes(&bytes, path)
    }

    pub fn serialize(&self, table: &LayerTable) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(table.headers())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| ProcessingError::Io(e.into_error()))
    }

    /// Atomically replace `path` with `bytes`
    pub fn write_bytes(&self, bytes: &[u8], path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(parent).map_err(|e| ProcessingError::write_failure(path, e))?;

        let mut staged =
            NamedTempFile::new_in(parent).map_err(|e| ProcessingError::write_failure(path, e))?;
        staged
            .write_all(bytes)
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| ProcessingError::write_failure(path, e))?;
        staged
            .persist(path)
            .map_err(|e| ProcessingError::write_failure(path, e.error))?;

        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl Default for LayerWriter {
    fn default() -> Self {
        Self::new()
    }
}
