use super::catalog::TABLE_EXTENSION;
use crate::core::{DbError, FIELD_SEPARATOR, Row, RowFilter};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Flat-file codec for the tables of one database directory.
///
/// A table file is a header line (column names joined by the reserved
/// separator) followed by one line per row. Whole-file rewrites go through a
/// temp file in the same directory and an atomic rename, so a crash mid-write
/// never truncates the original.
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    #[must_use]
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.{TABLE_EXTENSION}"))
    }

    /// Writes the header line of a new table. Declared column types were
    /// already dropped by the parser; only names are persisted.
    pub fn create_table(&self, table: &str, columns: &[String]) -> Result<(), DbError> {
        let path = self.table_path(table);
        if path.exists() {
            return Err(DbError::TableAlreadyExists(table.to_string()));
        }

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, format!("{}\n", columns.join(FIELD_SEPARATOR)))?;
        debug!(table, columns = columns.len(), "table file created");
        Ok(())
    }

    /// Column names parsed from the header line.
    pub fn read_columns(&self, table: &str) -> Result<Vec<String>, DbError> {
        let (columns, _) = self.load(table)?;
        Ok(columns)
    }

    /// Appends one row line after validating arity against the header.
    pub fn insert(&self, table: &str, values: &[String]) -> Result<(), DbError> {
        let (columns, _) = self.load(table)?;
        if values.len() != columns.len() {
            return Err(DbError::ColumnCountMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }

        let mut file = OpenOptions::new().append(true).open(self.table_path(table))?;
        writeln!(file, "{}", Row::new(values.to_vec()).encode())?;
        Ok(())
    }

    /// Streams all rows, or only those whose `column` field equals `value`
    /// case-insensitively. Returns the header columns alongside the rows.
    pub fn scan(
        &self,
        table: &str,
        filter: Option<(&str, &str)>,
    ) -> Result<(Vec<String>, Vec<Row>), DbError> {
        let (columns, rows) = self.load(table)?;

        let rows = match filter {
            None => rows,
            Some((column, value)) => {
                let index = resolve_column(&columns, column)?;
                let filter = RowFilter::Equals(value.to_string());
                rows.into_iter()
                    .filter(|row| row.get(index).is_some_and(|field| filter.matches(field)))
                    .collect()
            }
        };

        Ok((columns, rows))
    }

    /// Replaces `set_column` in **every** row whose `where_column` field
    /// equals `where_value` case-insensitively. Returns the number of rows
    /// changed; zero leaves the file untouched.
    pub fn update_where(
        &self,
        table: &str,
        set_column: &str,
        set_value: &str,
        where_column: &str,
        where_value: &str,
    ) -> Result<usize, DbError> {
        let (columns, mut rows) = self.load(table)?;
        let set_index = resolve_column(&columns, set_column)?;
        let where_index = resolve_column(&columns, where_column)?;
        let filter = RowFilter::Equals(where_value.to_string());

        let mut updated = 0;
        for row in &mut rows {
            let matched = row.get(where_index).is_some_and(|field| filter.matches(field));
            if matched && set_index < row.len() {
                row.values[set_index] = set_value.to_string();
                updated += 1;
            }
        }

        if updated > 0 {
            self.rewrite(table, &columns, &rows)?;
        }
        Ok(updated)
    }

    /// Removes every row whose `where_column` field matches `filter`.
    /// Returns the number of rows removed; zero leaves the file untouched.
    /// Rows too short to carry the column never match and are preserved.
    pub fn delete_where(
        &self,
        table: &str,
        where_column: &str,
        filter: &RowFilter,
    ) -> Result<usize, DbError> {
        let (columns, rows) = self.load(table)?;
        let where_index = resolve_column(&columns, where_column)?;

        let before = rows.len();
        let kept: Vec<Row> = rows
            .into_iter()
            .filter(|row| !row.get(where_index).is_some_and(|field| filter.matches(field)))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            self.rewrite(table, &columns, &kept)?;
        }
        Ok(removed)
    }

    fn load(&self, table: &str) -> Result<(Vec<String>, Vec<Row>), DbError> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(DbError::TableNotFound(table.to_string()));
        }

        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();
        let Some(header) = lines.next() else {
            return Ok((Vec::new(), Vec::new()));
        };

        let columns = header
            .split(FIELD_SEPARATOR)
            .map(str::to_string)
            .collect();
        let rows = lines.map(Row::decode).collect();
        Ok((columns, rows))
    }

    /// Writes header plus rows to a temp file in the table's directory and
    /// renames it over the original in one step.
    fn rewrite(&self, table: &str, columns: &[String], rows: &[Row]) -> Result<(), DbError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        writeln!(tmp, "{}", columns.join(FIELD_SEPARATOR))?;
        for row in rows {
            writeln!(tmp, "{}", row.encode())?;
        }
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.table_path(table))
            .map_err(|e| DbError::Io(e.error))?;

        debug!(table, rows = rows.len(), "table file rewritten");
        Ok(())
    }
}

/// Case-insensitive column lookup against header names.
pub fn resolve_column(columns: &[String], name: &str) -> Result<usize, DbError> {
    columns
        .iter()
        .position(|c| c.eq_ignore_ascii_case(name))
        .ok_or_else(|| DbError::ColumnNotFound(name.to_string()))
}
