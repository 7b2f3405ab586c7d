use thiserror::Error;

/// Failures surfaced by [`super::ExpenseStore`].
#[derive(Error, Debug)]
pub(crate) enum StoreError {
    /// Delete targeted an id with no matching row.
    #[error("expense with ID {0} not found")]
    NotFound(i64),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A running total no longer fits in a `Decimal`.
    #[error("total of {0} is too large to compute")]
    Overflow(&'static str),

    /// Any fault from the underlying SQLite storage, including rows that
    /// cannot be decoded.
    #[error("storage fault: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub(crate) type StoreResult<T> = std::result::Result<T, StoreError>;
