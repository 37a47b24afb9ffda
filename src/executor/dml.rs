use super::QueryOutcome;
use crate::core::{DbError, RowFilter};
use crate::storage::StorageEngine;

pub struct DmlExecutor;

impl DmlExecutor {
    pub fn insert(
        engine: &StorageEngine,
        user: &str,
        database: &str,
        table: &str,
        values: &[String],
    ) -> Result<QueryOutcome, DbError> {
        let _guard = engine.locks.acquire_write(table);
        engine.table_store(user, database).insert(table, values)?;
        Ok(QueryOutcome::Success(format!(
            "1 row inserted into '{table}'."
        )))
    }

    pub fn select(
        engine: &StorageEngine,
        user: &str,
        database: &str,
        table: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<QueryOutcome, DbError> {
        let _guard = engine.locks.acquire_read(table);
        let (columns, rows) = engine.table_store(user, database).scan(table, filter)?;
        Ok(QueryOutcome::Rows {
            columns,
            rows: rows.into_iter().map(|row| row.values).collect(),
        })
    }

    pub fn update(
        engine: &StorageEngine,
        user: &str,
        database: &str,
        table: &str,
        set_column: &str,
        set_value: &str,
        where_column: &str,
        where_value: &str,
    ) -> Result<QueryOutcome, DbError> {
        let _guard = engine.locks.acquire_write(table);
        let updated = engine.table_store(user, database).update_where(
            table,
            set_column,
            set_value,
            where_column,
            where_value,
        )?;

        if updated == 0 {
            Ok(QueryOutcome::Success(
                "No matching rows found for update.".to_string(),
            ))
        } else {
            Ok(QueryOutcome::Success(format!(
                "{updated} row(s) updated in '{table}'."
            )))
        }
    }

    pub fn delete(
        engine: &StorageEngine,
        user: &str,
        database: &str,
        table: &str,
        where_column: &str,
        filter: &RowFilter,
    ) -> Result<QueryOutcome, DbError> {
        let _guard = engine.locks.acquire_write(table);
        let removed = engine
            .table_store(user, database)
            .delete_where(table, where_column, filter)?;

        if removed == 0 {
            Ok(QueryOutcome::Success(
                "No matching rows found for deletion.".to_string(),
            ))
        } else {
            Ok(QueryOutcome::Success(format!(
                "{removed} row(s) deleted from '{table}'."
            )))
        }
    }
}
