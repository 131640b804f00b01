use std::io;
use std::result;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;
pub type Result<T> = result::Result<T, EventsGenError>;

#[derive(Error, Debug)]
pub enum EventsGenError {
    #[error("Internal: {0:?}")]
    Internal(String),
    #[error("Config: {0}")]
    Config(String),
    #[error("ArrowError: {0:?}")]
    ArrowError(#[from] ArrowError),
    #[error("ParquetError: {0:?}")]
    ParquetError(#[from] ParquetError),
    #[error("IOError: {0:?}")]
    IOError(#[from] io::Error),
    #[error("SerdeJsonError: {0:?}")]
    SerdeJsonError(#[from] serde_json::Error),
}
