use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read CSV {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to write CSV {path:?}: {source}")]
    CsvWrite { path: PathBuf, source: csv::Error },

    #[error("{path:?} line {line}: expected at least {expected} columns, found {found}")]
    ShortRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("failed to parse machine profile")]
    Profile(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv_write(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::CsvWrite {
            path: path.into(),
            source,
        }
    }
}
