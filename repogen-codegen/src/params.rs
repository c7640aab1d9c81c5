use quote::ToTokens;
use repogen_core::{DatabaseType, pluralize, to_lower_camel_case, to_snake_case};
use serde::Serialize;

use crate::{
    scan::{SourceDeclaration, SourceField},
    sql::{Column, Statements},
    task::GenerationTask,
};

/// Values substituted into the repository template for one entity.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateParameters {
    /// Struct name, verbatim.
    pub entity_name: String,
    /// Path the generated module imports the entity from.
    pub entity_path: String,
    /// Primary field in lower camel case.
    pub primary_name: String,
    /// Primary field in snake case, the key column.
    pub primary_sql_name: String,
    /// Primary field type as source text.
    pub primary_type: String,
    /// Primary field identifier as written, the `get` parameter.
    pub primary_param: String,
    pub pool_type: String,
    pub table_name: String,
    pub statements: Statements,
}

impl TemplateParameters {
    pub fn new(
        task: &GenerationTask<'_>,
        primary: &SourceField,
        database: DatabaseType,
        table_prefix: &str,
    ) -> Self {
        let declaration = task.declaration();
        let table_name = table_name(&declaration.name(), table_prefix);

        let columns: Vec<_> = declaration.fields().iter().map(Column::from_field).collect();
        let key = Column::from_field(primary);
        let statements = Statements::new(database, &table_name, &columns, &key);

        Self {
            entity_name: declaration.name(),
            entity_path: task.module().import_path(),
            primary_name: to_lower_camel_case(&primary.name()),
            primary_sql_name: key.name,
            primary_type: primary.ty().to_token_stream().to_string(),
            primary_param: primary.ident().to_string(),
            pool_type: database.pool_type().to_string(),
            table_name,
            statements,
        }
    }
}

/// First field, in declaration order, whose tag contains `tag`.
pub fn primary_field<'a>(
    declaration: &'a SourceDeclaration,
    tag: &str,
) -> Option<&'a SourceField> {
    declaration
        .fields()
        .iter()
        .find(|field| field.tag().contains(tag))
}

/// Pluralized snake-case table name for an entity.
pub fn table_name(entity: &str, prefix: &str) -> String {
    format!("{}{}", prefix, pluralize(&to_snake_case(entity)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Scanner;

    const USER: &str = r#"
/// repogen:entity
pub struct User {
    #[repogen(primary_key)]
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
}
"#;

    #[test]
    fn test_table_names() {
        assert_eq!(table_name("User", ""), "users");
        assert_eq!(table_name("Category", ""), "categories");
        assert_eq!(table_name("OrderItem", "app_"), "app_order_items");
    }

    #[test]
    fn test_first_tagged_field_wins() {
        let file = Scanner::new("repogen:entity")
            .scan_str(
                r#"
                /// repogen:entity
                pub struct Pair {
                    name: String,
                    #[db(primary)]
                    first: u32,
                    #[db(primary)]
                    second: u32,
                }
                "#,
                "pair.rs",
            )
            .unwrap();

        let field = primary_field(&file.declarations()[0], "primary").unwrap();
        assert_eq!(field.name(), "first");
    }

    #[test]
    fn test_tag_is_a_substring_match() {
        let file = Scanner::new("repogen:entity")
            .scan_str(
                "/// repogen:entity\nstruct A { #[sqlx(rename = \"primary_id\")] id: u32 }\n",
                "a.rs",
            )
            .unwrap();

        assert!(primary_field(&file.declarations()[0], "primary").is_some());
        assert!(primary_field(&file.declarations()[0], "key").is_none());
    }

    #[test]
    fn test_parameters_for_user() {
        let file = Scanner::new("repogen:entity")
            .scan_str(USER, "src/user.rs")
            .unwrap();
        let task = file.tasks()[0];
        let primary = primary_field(task.declaration(), "primary").unwrap();

        let params = TemplateParameters::new(&task, primary, DatabaseType::Postgres, "");

        assert_eq!(params.entity_name, "User");
        assert_eq!(params.entity_path, "super::user");
        assert_eq!(params.primary_name, "userId");
        assert_eq!(params.primary_sql_name, "user_id");
        assert_eq!(params.primary_type, "i64");
        assert_eq!(params.primary_param, "user_id");
        assert_eq!(params.pool_type, "PgPool");
        assert_eq!(params.table_name, "users");
        assert_eq!(
            params.statements.get.sql,
            "SELECT * FROM users WHERE user_id = $1 LIMIT 1"
        );
    }

    #[test]
    fn test_raw_identifier_primary() {
        let file = Scanner::new("repogen:entity")
            .scan_str(
                "/// repogen:entity\nstruct Slot { #[primary] r#type: String }\n",
                "slot.rs",
            )
            .unwrap();
        let task = file.tasks()[0];
        let primary = primary_field(task.declaration(), "primary").unwrap();

        let params = TemplateParameters::new(&task, primary, DatabaseType::Sqlite, "");

        assert_eq!(params.primary_param, "r#type");
        assert_eq!(params.primary_name, "type");
        assert_eq!(params.primary_sql_name, "type");
        assert_eq!(params.statements.delete.binds, vec!["r#type"]);
    }
}
