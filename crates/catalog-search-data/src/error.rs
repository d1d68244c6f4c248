use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;
pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Required catalog file not found: {}", .0.display())]
    RequiredFileNotFound(PathBuf),
    #[error("Catalog table '{0}' has no backing directory and was not preloaded")]
    NoDataDirProvided(&'static str),
    #[error("Duplicate {table} id {id} in catalog source")]
    DuplicateId { table: &'static str, id: i64 },
}
