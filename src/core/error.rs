use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("Database '{0}' not found")]
    DatabaseNotFound(String),
    #[error("Table '{0}' not found")]
    TableNotFound(String),
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Only one database may be created per user; '{0}' already exists")]
    DatabaseLimitReached(String),
    #[error("A database is already selected: '{0}'")]
    DatabaseAlreadySelected(String),
    #[error("No database selected")]
    NoDatabaseSelected,
    #[error("Table '{0}' already exists")]
    TableAlreadyExists(String),
    #[error("Column count mismatch: expected {expected} values but got {actual}")]
    ColumnCountMismatch { expected: usize, actual: usize },
    #[error("Invalid identifier '{0}': use only letters, numbers, or underscores")]
    InvalidIdentifier(String),
    #[error("A transaction is already active for '{0}'")]
    TransactionAlreadyActive(String),
    #[error("No active transaction for '{0}'")]
    NoActiveTransaction(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
