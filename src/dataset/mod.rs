//! Historical monthly return data

mod loader;
mod table;

pub use loader::load_returns;
pub use table::{HistoricalDataset, Instrument, ReturnRow};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating the historical return table
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read returns file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: expected 8 whitespace-delimited columns, got {got}")]
    ColumnCount { line: usize, got: usize },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("returns file holds no data rows")]
    Empty,

    #[error("row numbers are not contiguous from 1 (missing row {row})")]
    MissingRow { row: usize },
}
