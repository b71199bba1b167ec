#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    /// No row for the requested key. Expected, not a defect.
    NotFound,
    /// The project partition could not be opened or provisioned.
    ConnectionFailure {
        partition: PathBuf,
        reason: String,
    },
    /// The driver reported success for a write that changed nothing.
    NoRowsAffected {
        table: &'static str,
    },
    UnsupportedCategory(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "IO",
            Self::Sql(_) => "SQL",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::ConnectionFailure { .. } => "CONNECTION_FAILURE",
            Self::NoRowsAffected { .. } => "NO_ROWS_AFFECTED",
            Self::UnsupportedCategory(_) => "UNSUPPORTED_CATEGORY",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound => write!(f, "not found"),
            Self::ConnectionFailure { partition, reason } => write!(
                f,
                "cannot open partition {} ({reason})",
                partition.display()
            ),
            Self::NoRowsAffected { table } => {
                write!(f, "write to {table} affected no rows")
            }
            Self::UnsupportedCategory(tag) => write!(f, "unsupported event category: {tag}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sql(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
