//! Fundamental types shared across repogen crates.

use serde::Deserialize;

/// SQL backend targeted by generated repositories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    #[default]
    Postgres,
    Mysql,
    Sqlite,
}

impl DatabaseType {
    /// Get the lowercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Sqlite => "sqlite",
        }
    }

    /// Name of the sqlx pool type, imported from the `sqlx` crate root.
    pub fn pool_type(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "PgPool",
            DatabaseType::Mysql => "MySqlPool",
            DatabaseType::Sqlite => "SqlitePool",
        }
    }

    /// Bind placeholder for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            DatabaseType::Postgres => format!("${}", index),
            DatabaseType::Mysql | DatabaseType::Sqlite => "?".to_string(),
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
