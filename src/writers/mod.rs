pub mod layer_writer;
pub mod parquet_writer;

pub use layer_writer::LayerWriter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
