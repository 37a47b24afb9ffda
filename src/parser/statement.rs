use crate::core::RowFilter;

/// One column in a CREATE TABLE definition. The declared type is accepted
/// syntactically but never enforced; only the name is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub declared_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ShowDatabases,
    ShowTables,
    CreateDatabase {
        name: String,
    },
    UseDatabase {
        name: String,
    },
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
    },
    Describe {
        table: String,
    },
    Insert {
        table: String,
        values: Vec<String>,
    },
    Select {
        table: String,
        filter: Option<(String, String)>,
    },
    Update {
        table: String,
        set_column: String,
        set_value: String,
        where_column: String,
        where_value: String,
    },
    Delete {
        table: String,
        where_column: String,
        filter: RowFilter,
    },
    Begin {
        acting_as: Option<String>,
    },
    Commit {
        acting_as: Option<String>,
    },
    Rollback {
        acting_as: Option<String>,
    },
}
