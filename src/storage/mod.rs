mod catalog;
mod lock;
mod table_file;

pub use catalog::{Catalog, TABLE_EXTENSION};
pub use lock::{LockManager, ReadGuard, WriteGuard};
pub use table_file::{TableStore, resolve_column};

use crate::transaction::TransactionRegistry;
use std::path::Path;
use tracing::info;

/// One storage engine instance: the catalog root plus the process-wide
/// mutable state (table lock flags, per-user transaction contexts). Shared
/// by reference between sessions; there is no static state.
#[derive(Debug)]
pub struct StorageEngine {
    pub catalog: Catalog,
    pub locks: LockManager,
    pub transactions: TransactionRegistry,
}

impl StorageEngine {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        info!(root = %root.as_ref().display(), "storage engine opened");
        Self {
            catalog: Catalog::new(root),
            locks: LockManager::new(),
            transactions: TransactionRegistry::new(),
        }
    }

    /// Codec over one database directory of one user.
    #[must_use]
    pub fn table_store(&self, user: &str, database: &str) -> TableStore {
        TableStore::new(self.catalog.database_dir(user, database))
    }
}
