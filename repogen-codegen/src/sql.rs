//! The four SQL statements behind a generated repository.

use repogen_core::{DatabaseType, to_snake_case};
use serde::Serialize;

use crate::scan::SourceField;

/// A struct field mapped to a table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Field identifier as written in the struct, used in `.bind(&entity.<field>)`.
    pub field: String,
    /// Snake-cased column name.
    pub name: String,
}

impl Column {
    pub fn from_field(field: &SourceField) -> Self {
        Self {
            field: field.ident().to_string(),
            name: to_snake_case(&field.name()),
        }
    }
}

/// One SQL statement with the fields bound to its placeholders, in order.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    /// Raw SQL text.
    pub sql: String,
    /// The SQL as a Rust string literal, ready to splice into source.
    pub literal: String,
    /// Field identifiers bound to the placeholders, in placeholder order.
    pub binds: Vec<String>,
}

impl Statement {
    fn new(sql: String, binds: Vec<String>) -> Self {
        let literal = proc_macro2::Literal::string(&sql).to_string();
        Self {
            sql,
            literal,
            binds,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Statements {
    pub get: Statement,
    pub create: Statement,
    pub update: Statement,
    pub delete: Statement,
}

impl Statements {
    /// Build the statements for `table`, keyed on `primary`.
    ///
    /// `columns` must contain `primary`.
    pub fn new(
        database: DatabaseType,
        table: &str,
        columns: &[Column],
        primary: &Column,
    ) -> Self {
        let get = Statement::new(
            format!(
                "SELECT * FROM {table} WHERE {} = {} LIMIT 1",
                primary.name,
                database.placeholder(1)
            ),
            vec![primary.field.clone()],
        );

        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        let placeholders: Vec<_> = (1..=columns.len())
            .map(|i| database.placeholder(i))
            .collect();
        let create = Statement::new(
            format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                names.join(", "),
                placeholders.join(", ")
            ),
            columns.iter().map(|c| c.field.clone()).collect(),
        );

        let mut assigned: Vec<&Column> = columns.iter().filter(|c| *c != primary).collect();
        if assigned.is_empty() {
            assigned.push(primary);
        }
        let assignments: Vec<_> = assigned
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = {}", c.name, database.placeholder(i + 1)))
            .collect();
        let mut update_binds: Vec<_> = assigned.iter().map(|c| c.field.clone()).collect();
        update_binds.push(primary.field.clone());
        let update = Statement::new(
            format!(
                "UPDATE {table} SET {} WHERE {} = {}",
                assignments.join(", "),
                primary.name,
                database.placeholder(assigned.len() + 1)
            ),
            update_binds,
        );

        let delete = Statement::new(
            format!(
                "DELETE FROM {table} WHERE {} = {}",
                primary.name,
                database.placeholder(1)
            ),
            vec![primary.field.clone()],
        );

        Self {
            get,
            create,
            update,
            delete,
        }
    }
}
