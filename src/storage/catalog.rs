use crate::core::DbError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File extension for table files inside a database directory.
pub const TABLE_EXTENSION: &str = "txt";

/// Directory hierarchy `<root>/<user>/<database>/<table>.txt`.
///
/// One namespace directory per user, at most one database directory inside
/// it, ever. Databases and tables are created once and never dropped or
/// renamed in this scope.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn user_dir(&self, user: &str) -> PathBuf {
        self.root.join(user)
    }

    #[must_use]
    pub fn database_dir(&self, user: &str, database: &str) -> PathBuf {
        self.user_dir(user).join(database)
    }

    #[must_use]
    pub fn table_path(&self, user: &str, database: &str, table: &str) -> PathBuf {
        self.database_dir(user, database)
            .join(format!("{table}.{TABLE_EXTENSION}"))
    }

    /// Creates `name` under the user's namespace. Fails if the name is not
    /// `[A-Za-z0-9_]+` or if the user already owns a database - one per
    /// user, enforced here at creation time.
    pub fn create_database(&self, user: &str, name: &str) -> Result<(), DbError> {
        if !is_valid_identifier(name) {
            return Err(DbError::InvalidIdentifier(name.to_string()));
        }

        let user_dir = self.user_dir(user);
        fs::create_dir_all(&user_dir)?;

        if let Some(existing) = self.list_databases(user)?.first() {
            return Err(DbError::DatabaseLimitReached(existing.clone()));
        }

        fs::create_dir_all(self.database_dir(user, name))?;
        info!(user, database = name, "database created");
        Ok(())
    }

    #[must_use]
    pub fn database_exists(&self, user: &str, name: &str) -> bool {
        self.database_dir(user, name).is_dir()
    }

    /// Directory names under the user's namespace, sorted. An absent
    /// namespace reads as no databases.
    pub fn list_databases(&self, user: &str) -> Result<Vec<String>, DbError> {
        list_dir(&self.user_dir(user), |entry| {
            entry.path().is_dir().then(|| entry.file_name().to_string_lossy().into_owned())
        })
    }

    /// Table names (file stems) in a database, sorted.
    pub fn list_tables(&self, user: &str, database: &str) -> Result<Vec<String>, DbError> {
        if !self.database_exists(user, database) {
            return Err(DbError::DatabaseNotFound(database.to_string()));
        }
        list_dir(&self.database_dir(user, database), |entry| {
            let path = entry.path();
            (path.extension().is_some_and(|ext| ext == TABLE_EXTENSION))
                .then(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .flatten()
        })
    }
}

fn list_dir<F>(dir: &Path, mut keep: F) -> Result<Vec<String>, DbError>
where
    F: FnMut(&fs::DirEntry) -> Option<String>,
{
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        if let Some(name) = keep(&entry?) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}
