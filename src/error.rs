use thiserror::Error;

/// Error type shared by every table operation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Group-by requires at least one key column")]
    EmptyKey,

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),
}

impl Error {
    /// Prefix the message of a statistic or arithmetic failure with the
    /// place it happened, keeping the variant intact.
    pub(crate) fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Error::TypeMismatch(msg) => Error::TypeMismatch(format!("{}: {}", ctx, msg)),
            Error::InsufficientData(msg) => Error::InsufficientData(format!("{}: {}", ctx, msg)),
            Error::ComputationError(msg) => Error::ComputationError(format!("{}: {}", ctx, msg)),
            other => other,
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_keeps_variant() {
        let err = Error::InsufficientData("need 2 values".into()).context("column 'y'");
        match err {
            Error::InsufficientData(msg) => assert_eq!(msg, "column 'y': need 2 values"),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = Error::ColumnNotFound("z".into()).context("ignored");
        assert!(matches!(err, Error::ColumnNotFound(name) if name == "z"));
    }
}
