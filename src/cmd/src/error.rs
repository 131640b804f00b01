use std::result;

use chrono::OutOfRangeError;
use events_gen::error::EventsGenError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("EventsGen: {0}")]
    EventsGen(#[from] EventsGenError),
    #[error("Internal: {0}")]
    Internal(String),
    #[error("Config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
    #[error("TimeDurationOutOfRange: {0:?}")]
    TimeDurationOutOfRange(#[from] OutOfRangeError),
    #[error("ParseDuration: {0:?}")]
    ParseDuration(#[from] parse_duration::parse::Error),
    #[error("ArrowError: {0:?}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] SetGlobalDefaultError),
    #[error("other: {0:?}")]
    Other(#[from] anyhow::Error),
}
