// Module declarations
mod common;
mod ddl;
mod dml;
mod meta;
mod statement;
mod transaction;

pub use statement::{ColumnDef, Command};

use crate::core::DbError;
use nom::branch::alt;

/// Parses one semicolon-terminated command string into a [`Command`].
///
/// Keywords are matched case-insensitively; literal values keep their
/// original case. A recognized keyword with a malformed clause yields a
/// syntax error carrying the usage hint for that command; an unrecognized
/// leading keyword yields an unknown-command error.
pub fn parse_command(input: &str) -> Result<Command, DbError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DbError::Syntax("empty command".to_string()));
    }
    if !input.ends_with(';') {
        return Err(DbError::Syntax(
            "commands must end with a semicolon (;)".to_string(),
        ));
    }
    let body = input[..input.len() - 1].trim();

    let result = alt((
        meta::show_databases,
        meta::show_tables,
        meta::describe,
        ddl::create_database,
        ddl::create_table,
        ddl::use_database,
        transaction::begin,
        transaction::commit,
        transaction::rollback,
        dml::insert,
        dml::select,
        dml::update,
        dml::delete,
    ))(body);

    match result {
        Ok((remaining, command)) if remaining.trim().is_empty() => Ok(command),
        _ => Err(reject(body)),
    }
}

/// Maps a failed parse to an error based on the leading keyword: known
/// keywords get their usage hint, anything else is an unknown command.
fn reject(body: &str) -> DbError {
    let Some(first) = body.split_whitespace().next() else {
        return DbError::Syntax("empty command".to_string());
    };

    let usage = match first.to_uppercase().as_str() {
        "SHOW" => "invalid SHOW command. Use: SHOW DATABASES; or SHOW TABLES;",
        "USE" => "invalid USE syntax. Use: USE database_name;",
        "CREATE" => {
            "invalid CREATE syntax. Use: CREATE DATABASE db_name; or CREATE TABLE table_name (columns);"
        }
        "DESCRIBE" => "invalid DESCRIBE syntax. Use: DESCRIBE table_name;",
        "INSERT" => "invalid INSERT syntax. Use: INSERT INTO table_name VALUES (...);",
        "SELECT" => {
            "syntax error in SELECT statement. Use: SELECT * FROM table_name [WHERE column = value];"
        }
        "UPDATE" => {
            "syntax error in UPDATE statement. Use: UPDATE table_name SET column = value WHERE column = value;"
        }
        "DELETE" => {
            "syntax error in DELETE statement. Use: DELETE FROM table_name WHERE column = value; or DELETE FROM table_name WHERE column LIKE 'pattern%';"
        }
        "BEGIN" => "invalid BEGIN syntax. Use: BEGIN [TRANSACTION] [AS user];",
        "COMMIT" => "invalid COMMIT syntax. Use: COMMIT [AS user];",
        "ROLLBACK" => "invalid ROLLBACK syntax. Use: ROLLBACK [AS user];",
        _ => return DbError::UnknownCommand(first.to_string()),
    };
    DbError::Syntax(usage.to_string())
}
