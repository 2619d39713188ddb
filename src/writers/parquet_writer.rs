use crate::error::{ProcessingError, Result};
use crate::models::WeatherRecord;
use crate::utils::constants::{
    COL_AVG_TEMP, COL_DATE, COL_MONTH, COL_PRECIP, COL_SOLAR_KWH, COL_SUNSHINE, COL_UV_INDEX,
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::*;
use arrow::datatypes::{DataType, Date32Type, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Columnar export of the analytics layer for downstream dashboards.
pub struct ParquetWriter {
    compression: Compression,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write weather records to a Parquet file, replacing it atomically
    pub fn write_records(&self, records: &[WeatherRecord], path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| ProcessingError::write_failure(path, e))?;

        let schema = self.create_schema();
        let batch = self.records_to_batch(records, schema.clone())?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(DEFAULT_ROW_GROUP_SIZE)
            .build();

        let mut staged =
            NamedTempFile::new_in(parent).map_err(|e| ProcessingError::write_failure(path, e))?;
        {
            let mut writer = ArrowWriter::try_new(staged.as_file_mut(), schema, Some(props))?;
            writer.write(&batch)?;
            writer.close()?;
        }
        staged
            .as_file()
            .sync_all()
            .map_err(|e| ProcessingError::write_failure(path, e))?;
        staged
            .persist(path)
            .map_err(|e| ProcessingError::write_failure(path, e.error))?;

        Ok(())
    }

    /// Create Arrow schema for analytics-layer records
    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new(COL_DATE, DataType::Date32, false),
            Field::new(COL_AVG_TEMP, DataType::Float64, true),
            Field::new(COL_PRECIP, DataType::Float64, true),
            Field::new(COL_SUNSHINE, DataType::Float64, true),
            Field::new(COL_UV_INDEX, DataType::Float64, true),
            Field::new(COL_MONTH, DataType::UInt32, false),
            Field::new(COL_SOLAR_KWH, DataType::Float64, true),
        ];

        Arc::new(Schema::new(fields))
    }

    /// Convert records to Arrow RecordBatch
    fn records_to_batch(
        &self,
        records: &[WeatherRecord],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let dates: Vec<i32> = records
            .iter()
            .map(|r| Date32Type::from_naive_date(r.date))
            .collect();
        let avg_temps: Vec<Option<f64>> = records.iter().map(|r| r.avg_temp_c).collect();
        let precips: Vec<Option<f64>> = records.iter().map(|r| r.precip_mm).collect();
        let sunshine: Vec<Option<f64>> = records.iter().map(|r| r.sunshine_hours).collect();
        let uv: Vec<Option<f64>> = records.iter().map(|r| r.uv_index).collect();
        let months: Vec<u32> = records.iter().map(|r| r.month()).collect();
        let solar: Vec<Option<f64>> = records.iter().map(|r| r.solar_kwh).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Date32Array::from(dates)),
                Arc::new(Float64Array::from(avg_temps)),
                Arc::new(Float64Array::from(precips)),
                Arc::new(Float64Array::from(sunshine)),
                Arc::new(Float64Array::from(uv)),
                Arc::new(UInt32Array::from(months)),
                Arc::new(Float64Array::from(solar)),
            ],
        )?;

        Ok(batch)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = fs::metadata(path)?.len();

        let row_group_sizes = (0..row_groups)
            .map(|i| metadata.row_group(i).num_rows())
            .collect();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes,
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        let avg_rows = if self.row_groups > 0 {
            self.total_rows as f64 / self.row_groups as f64
        } else {
            0.0
        };

        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
            avg_rows
        )
    }
}
