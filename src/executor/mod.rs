mod ddl;
mod dml;

pub use ddl::DdlExecutor;
pub use dml::DmlExecutor;

use crate::core::DbError;
use crate::parser::{Command, parse_command};
use crate::storage::StorageEngine;
use std::sync::Arc;
use tracing::debug;

/// Result of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    Success(String),
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// One authenticated user context issuing commands sequentially.
///
/// Holds the username supplied by the authentication collaborator and the
/// session's active database. At most one `CREATE DATABASE` or `USE` succeeds
/// per session lifetime. All shared state (lock flags, transaction contexts,
/// files) lives in the engine, so sessions on separate threads may share one
/// engine instance.
#[derive(Debug)]
pub struct Session {
    engine: Arc<StorageEngine>,
    username: String,
    current_database: Option<String>,
}

impl Session {
    pub fn new(engine: Arc<StorageEngine>, username: impl Into<String>) -> Self {
        Self {
            engine,
            username: username.into(),
            current_database: None,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn current_database(&self) -> Option<&str> {
        self.current_database.as_deref()
    }

    /// Parses and executes one semicolon-terminated command. Errors are
    /// reported to the caller and leave the session usable.
    pub fn execute(&mut self, input: &str) -> Result<QueryOutcome, DbError> {
        let command = parse_command(input)?;
        debug!(user = %self.username, ?command, "executing command");

        match command {
            Command::ShowDatabases => DdlExecutor::show_databases(&self.engine, &self.username),
            Command::ShowTables => {
                let database = self.require_database()?;
                DdlExecutor::show_tables(&self.engine, &self.username, &database)
            }
            Command::CreateDatabase { name } => {
                let outcome = DdlExecutor::create_database(&self.engine, &self.username, &name)?;
                self.current_database = Some(name);
                Ok(outcome)
            }
            Command::UseDatabase { name } => self.use_database(name),
            Command::CreateTable { name, columns } => {
                let database = self.require_database()?;
                DdlExecutor::create_table(&self.engine, &self.username, &database, &name, &columns)
            }
            Command::Describe { table } => {
                let database = self.require_database()?;
                DdlExecutor::describe(&self.engine, &self.username, &database, &table)
            }
            Command::Insert { table, values } => {
                let database = self.require_database()?;
                let outcome =
                    DmlExecutor::insert(&self.engine, &self.username, &database, &table, &values)?;
                self.stage(input);
                Ok(outcome)
            }
            Command::Select { table, filter } => {
                let database = self.require_database()?;
                let filter = filter
                    .as_ref()
                    .map(|(column, value)| (column.as_str(), value.as_str()));
                DmlExecutor::select(&self.engine, &self.username, &database, &table, filter)
            }
            Command::Update {
                table,
                set_column,
                set_value,
                where_column,
                where_value,
            } => {
                let database = self.require_database()?;
                let outcome = DmlExecutor::update(
                    &self.engine,
                    &self.username,
                    &database,
                    &table,
                    &set_column,
                    &set_value,
                    &where_column,
                    &where_value,
                )?;
                self.stage(input);
                Ok(outcome)
            }
            Command::Delete {
                table,
                where_column,
                filter,
            } => {
                let database = self.require_database()?;
                let outcome = DmlExecutor::delete(
                    &self.engine,
                    &self.username,
                    &database,
                    &table,
                    &where_column,
                    &filter,
                )?;
                self.stage(input);
                Ok(outcome)
            }
            Command::Begin { acting_as } => {
                let acting = self.acting_user(acting_as);
                self.engine.transactions.begin(&acting)?;
                Ok(QueryOutcome::Success(format!(
                    "Transaction started for '{acting}'."
                )))
            }
            Command::Commit { acting_as } => {
                let acting = self.acting_user(acting_as);
                let staged = self.engine.transactions.commit(&acting)?;
                Ok(QueryOutcome::Success(format!(
                    "Transaction committed for '{acting}' ({} command(s) recorded).",
                    staged.len()
                )))
            }
            Command::Rollback { acting_as } => {
                let acting = self.acting_user(acting_as);
                let discarded = self.engine.transactions.rollback(&acting)?;
                Ok(QueryOutcome::Success(format!(
                    "Transaction rolled back for '{acting}' ({discarded} staged command(s) discarded)."
                )))
            }
        }
    }

    fn use_database(&mut self, name: String) -> Result<QueryOutcome, DbError> {
        // not-found is checked before the one-USE rule, as the original did
        if !self.engine.catalog.database_exists(&self.username, &name) {
            return Err(DbError::DatabaseNotFound(name));
        }
        if let Some(current) = &self.current_database {
            return Err(DbError::DatabaseAlreadySelected(current.clone()));
        }
        self.current_database = Some(name.clone());
        Ok(QueryOutcome::Success(format!("Database set to: {name}")))
    }

    fn require_database(&self) -> Result<String, DbError> {
        self.current_database
            .clone()
            .ok_or(DbError::NoDatabaseSelected)
    }

    /// Records row-mutating command text while the session user's
    /// transaction is active. Mutations themselves are already applied.
    fn stage(&self, input: &str) {
        self.engine.transactions.stage(&self.username, input.trim());
    }

    /// `AS <user>` on a transaction command retargets which user's state is
    /// touched; it never changes the session identity.
    fn acting_user(&self, acting_as: Option<String>) -> String {
        acting_as.unwrap_or_else(|| self.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session() -> (TempDir, Session) {
        let dir = TempDir::new().unwrap();
        let engine = Arc::new(StorageEngine::new(dir.path()));
        (dir, Session::new(engine, "alice"))
    }

    fn rows(outcome: &QueryOutcome) -> &Vec<Vec<String>> {
        match outcome {
            QueryOutcome::Rows { rows, .. } => rows,
            QueryOutcome::Success(msg) => panic!("expected rows, got success: {msg}"),
        }
    }

    #[test]
    fn test_round_trip() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (a, b);").unwrap();
        session.execute("INSERT INTO t VALUES (1, 2);").unwrap();

        let outcome = session.execute("SELECT * FROM t;").unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::Rows {
                columns: vec!["a".to_string(), "b".to_string()],
                rows: vec![vec!["1".to_string(), "2".to_string()]],
            }
        );
    }

    #[test]
    fn test_single_database_invariant() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();

        assert!(matches!(
            session.execute("CREATE DATABASE other;").unwrap_err(),
            DbError::DatabaseLimitReached(_)
        ));
        assert!(matches!(
            session.execute("USE shop;").unwrap_err(),
            DbError::DatabaseAlreadySelected(_)
        ));
        // the session stays on the original database
        assert_eq!(session.current_database(), Some("shop"));
    }

    #[test]
    fn test_use_missing_database_not_found_first() {
        let (_dir, mut session) = session();
        assert!(matches!(
            session.execute("USE ghost;").unwrap_err(),
            DbError::DatabaseNotFound(_)
        ));
        assert_eq!(session.current_database(), None);
    }

    #[test]
    fn test_table_commands_require_database() {
        let (_dir, mut session) = session();
        assert!(matches!(
            session.execute("SHOW TABLES;").unwrap_err(),
            DbError::NoDatabaseSelected
        ));
        assert!(matches!(
            session.execute("SELECT * FROM t;").unwrap_err(),
            DbError::NoDatabaseSelected
        ));
    }

    #[test]
    fn test_insert_arity_is_rejected() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (a, b);").unwrap();

        assert!(matches!(
            session.execute("INSERT INTO t VALUES (1);").unwrap_err(),
            DbError::ColumnCountMismatch { .. }
        ));
        assert!(rows(&session.execute("SELECT * FROM t;").unwrap()).is_empty());
    }

    #[test]
    fn test_update_all_matching_rows() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (name, city);").unwrap();
        session.execute("INSERT INTO t VALUES (alice, york);").unwrap();
        session.execute("INSERT INTO t VALUES (bob, york);").unwrap();
        session.execute("INSERT INTO t VALUES (carol, leeds);").unwrap();

        let outcome = session
            .execute("UPDATE t SET city = hull WHERE city = york;")
            .unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::Success("2 row(s) updated in 't'.".to_string())
        );

        let outcome = session.execute("SELECT * FROM t WHERE city = hull;").unwrap();
        assert_eq!(rows(&outcome).len(), 2);
    }

    #[test]
    fn test_delete_like_wildcard() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (name);").unwrap();
        session.execute("INSERT INTO t VALUES (alice);").unwrap();
        session.execute("INSERT INTO t VALUES (alan);").unwrap();
        session.execute("INSERT INTO t VALUES (bob);").unwrap();

        session
            .execute("DELETE FROM t WHERE name LIKE 'al%';")
            .unwrap();

        let outcome = session.execute("SELECT * FROM t;").unwrap();
        assert_eq!(rows(&outcome), &vec![vec!["bob".to_string()]]);
    }

    #[test]
    fn test_describe_lists_columns() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (id INT, name STRING);").unwrap();

        let outcome = session.execute("DESCRIBE t;").unwrap();
        assert_eq!(
            rows(&outcome),
            &vec![vec!["id".to_string()], vec!["name".to_string()]]
        );
    }

    #[test]
    fn test_show_databases_and_tables() {
        let (_dir, mut session) = session();
        assert!(rows(&session.execute("SHOW DATABASES;").unwrap()).is_empty());

        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (a);").unwrap();

        assert_eq!(
            rows(&session.execute("SHOW DATABASES;").unwrap()),
            &vec![vec!["shop".to_string()]]
        );
        assert_eq!(
            rows(&session.execute("SHOW TABLES;").unwrap()),
            &vec![vec!["t".to_string()]]
        );
    }

    #[test]
    fn test_transaction_bracketing() {
        let (_dir, mut session) = session();
        session.execute("BEGIN;").unwrap();
        assert!(matches!(
            session.execute("BEGIN;").unwrap_err(),
            DbError::TransactionAlreadyActive(_)
        ));
        session.execute("ROLLBACK;").unwrap();
        assert!(matches!(
            session.execute("COMMIT;").unwrap_err(),
            DbError::NoActiveTransaction(_)
        ));
    }

    #[test]
    fn test_transaction_stages_dml_text() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (a);").unwrap();

        session.execute("BEGIN;").unwrap();
        session.execute("INSERT INTO t VALUES (1);").unwrap();
        let outcome = session.execute("COMMIT;").unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::Success(
                "Transaction committed for 'alice' (1 command(s) recorded).".to_string()
            )
        );
    }

    #[test]
    fn test_rollback_does_not_undo_applied_writes() {
        let (_dir, mut session) = session();
        session.execute("CREATE DATABASE shop;").unwrap();
        session.execute("CREATE TABLE t (a);").unwrap();

        session.execute("BEGIN;").unwrap();
        session.execute("INSERT INTO t VALUES (1);").unwrap();
        session.execute("ROLLBACK;").unwrap();

        // baseline semantics: the write was applied immediately
        let outcome = session.execute("SELECT * FROM t;").unwrap();
        assert_eq!(rows(&outcome).len(), 1);
    }

    #[test]
    fn test_acting_as_targets_other_identity() {
        let (_dir, mut session) = session();
        session.execute("BEGIN AS carol;").unwrap();

        // carol's transaction is active, alice's is not
        assert!(matches!(
            session.execute("COMMIT;").unwrap_err(),
            DbError::NoActiveTransaction(_)
        ));
        session.execute("COMMIT AS carol;").unwrap();
    }

    #[test]
    fn test_error_leaves_session_usable() {
        let (_dir, mut session) = session();
        assert!(session.execute("SELECT * FROM t").is_err());
        assert!(session.execute("FROBNICATE;").is_err());
        session.execute("CREATE DATABASE shop;").unwrap();
    }
}
