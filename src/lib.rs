// flatsql - file-backed relational store with a SQL-like command language
// Modular architecture: parser -> executor -> storage

// Clippy configuration - allow non-critical warnings for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::significant_drop_tightening)]

// Shared types (errors, rows, filters)
pub mod core;

// Command parser (DDL, DML, meta-commands, transaction control)
pub mod parser;

// Command executor (session state, dispatch, handlers)
pub mod executor;

// Transaction registry (per-user BEGIN/COMMIT/ROLLBACK envelope)
pub mod transaction;

// Storage layer (catalog directories, flat table files, table locks)
pub mod storage;

// Re-export commonly used types for convenience
pub use crate::core::{DbError, FIELD_SEPARATOR, Row, RowFilter};
pub use crate::executor::{QueryOutcome, Session};
pub use crate::parser::{Command, parse_command};
pub use crate::storage::{Catalog, LockManager, StorageEngine, TableStore};
pub use crate::transaction::TransactionRegistry;
