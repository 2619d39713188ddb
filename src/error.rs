use crate::processors::Stage;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Source file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Source file {} cannot be read: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed input in {}: {message}", path.display())]
    MalformedInput { path: PathBuf, message: String },

    #[error("Missing required column '{column}' in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("Invalid date '{value}' on line {line} of {}", path.display())]
    InvalidDate {
        value: String,
        line: usize,
        path: PathBuf,
    },

    #[error("Duplicate date {date} on line {line} of {}", path.display())]
    DuplicateDate {
        date: chrono::NaiveDate,
        line: usize,
        path: PathBuf,
    },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

impl ProcessingError {
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn missing_column(column: &str, path: impl Into<PathBuf>) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
            path: path.into(),
        }
    }

    pub fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }

    /// Taxonomy name shown to the operator alongside the failing stage.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } | Self::SourceUnreadable { .. } => "SourceNotFound",
            Self::MalformedInput { .. } | Self::Csv(_) | Self::InvalidFormat(_) => {
                "MalformedInput"
            }
            Self::MissingColumn { .. } => "MissingColumn",
            Self::InvalidDate { .. } => "InvalidDate",
            Self::DuplicateDate { .. } => "DuplicateDate",
            Self::WriteFailure { .. } | Self::Parquet(_) | Self::Arrow(_) => "WriteFailure",
            Self::Io(_) => "IoError",
            Self::Config(_) => "ConfigError",
            Self::Validation(_) => "ValidationError",
        }
    }
}

/// A [`ProcessingError`] tagged with the stage it aborted
#[derive(Error, Debug)]
#[error("{stage} stage failed ({kind})")]
pub struct StageError {
    pub stage: Stage,
    pub kind: &'static str,
    #[source]
    pub source: ProcessingError,
}

impl StageError {
    pub fn new(stage: Stage, source: ProcessingError) -> Self {
        Self {
            stage,
            kind: source.kind(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_input() {
        let err = ProcessingError::missing_column("UV01", "data/raw/weather_raw.csv");
        assert_eq!(err.kind(), "MissingColumn");
        assert_eq!(
            err.to_string(),
            "Missing required column 'UV01' in data/raw/weather_raw.csv"
        );

        let err = ProcessingError::SourceNotFound {
            path: PathBuf::from("weather_data.csv"),
        };
        assert_eq!(err.kind(), "SourceNotFound");
        assert!(err.to_string().contains("weather_data.csv"));
    }

    #[test]
    fn test_write_failure_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = ProcessingError::write_failure("/ro/out.csv", io);
        assert_eq!(err.kind(), "WriteFailure");
        assert!(err.source().is_some());
    }
}
