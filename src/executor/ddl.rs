use super::QueryOutcome;
use crate::core::DbError;
use crate::parser::ColumnDef;
use crate::storage::StorageEngine;
use tracing::info;

pub struct DdlExecutor;

impl DdlExecutor {
    pub fn show_databases(engine: &StorageEngine, user: &str) -> Result<QueryOutcome, DbError> {
        let databases = engine.catalog.list_databases(user)?;
        Ok(QueryOutcome::Rows {
            columns: vec!["database".to_string()],
            rows: databases.into_iter().map(|name| vec![name]).collect(),
        })
    }

    pub fn show_tables(
        engine: &StorageEngine,
        user: &str,
        database: &str,
    ) -> Result<QueryOutcome, DbError> {
        let tables = engine.catalog.list_tables(user, database)?;
        Ok(QueryOutcome::Rows {
            columns: vec!["table".to_string()],
            rows: tables.into_iter().map(|name| vec![name]).collect(),
        })
    }

    pub fn create_database(
        engine: &StorageEngine,
        user: &str,
        name: &str,
    ) -> Result<QueryOutcome, DbError> {
        engine.catalog.create_database(user, name)?;
        Ok(QueryOutcome::Success(format!(
            "Database '{name}' created and set as active."
        )))
    }

    pub fn describe(
        engine: &StorageEngine,
        user: &str,
        database: &str,
        table: &str,
    ) -> Result<QueryOutcome, DbError> {
        let _guard = engine.locks.acquire_read(table);
        let columns = engine.table_store(user, database).read_columns(table)?;
        Ok(QueryOutcome::Rows {
            columns: vec!["column".to_string()],
            rows: columns.into_iter().map(|name| vec![name]).collect(),
        })
    }

    pub fn create_table(
        engine: &StorageEngine,
        user: &str,
        database: &str,
        table: &str,
        columns: &[ColumnDef],
    ) -> Result<QueryOutcome, DbError> {
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

        let _guard = engine.locks.acquire_write(table);
        engine.table_store(user, database).create_table(table, &names)?;
        info!(user, database, table, "table created");
        Ok(QueryOutcome::Success(format!(
            "Table '{table}' created successfully."
        )))
    }
}
