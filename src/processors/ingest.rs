use crate::error::Result;
use crate::readers::LayerReader;
use crate::writers::LayerWriter;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub rows: usize,
    pub columns: Vec<String>,
    pub bytes: usize,
    pub destination: PathBuf,
}

impl IngestReport {
    pub fn summary(&self) -> String {
        format!(
            "Ingested {} rows x {} columns ({} bytes) into {}",
            self.rows,
            self.columns.len(),
            self.bytes,
            self.destination.display()
        )
    }
}

/// Copies the raw source into the raw layer without semantic changes.
///
/// The source is parsed only to check its tabular shape; the bytes written
/// are the bytes read.
pub struct Ingester {
    reader: LayerReader,
    writer: LayerWriter,
}

impl Ingester {
    pub fn new() -> Self {
        Self {
            reader: LayerReader::new(),
            writer: LayerWriter::new(),
        }
    }

    pub fn ingest(&self, source: &Path, destination: &Path) -> Result<IngestReport> {
        info!("Ingesting raw source {}", source.display());

        let bytes = self.reader.read_bytes(source)?;
        let table = self.reader.parse(source, &bytes)?;
        self.writer.write_bytes(&bytes, destination)?;

        let report = IngestReport {
            rows: table.len(),
            columns: table.headers().to_vec(),
            bytes: bytes.len(),
            destination: destination.to_path_buf(),
        };
        info!("{}", report.summary());

        Ok(report)
    }
}

impl Default for Ingester {
    fn default() -> Self {
        Self::new()
    }
}
