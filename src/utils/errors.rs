use crate::dataset::Label;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusPrepError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Column '{column}' not found in {path}")]
    MissingColumn { column: String, path: String },

    #[error("No usable rows for either class in {0}")]
    NoRecords(String),

    #[error("Missing class {label} in remaining data after overlap removal, cannot balance test set")]
    MissingClass { label: Label },

    #[error("No samples available for test set after filtering overlaps")]
    EmptyTestSet,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Hub error: {0}")]
    HubError(String),

    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP request error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, CorpusPrepError>;
