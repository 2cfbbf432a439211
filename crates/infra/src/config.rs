//! Store configuration loading and representation.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Table names are interpolated into SQL, so only plain identifiers pass.
static TABLE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("valid table name pattern"));

pub const DEFAULT_TABLE: &str = "employees";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid table name {0:?}: expected a plain SQL identifier")]
    InvalidTableName(String),
}

/// Which store backs the employee collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store (dev/test); contents are lost on restart.
    InMemory,
    Postgres { url: String },
}

/// Employee store settings.
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | `DATABASE_URL` | unset | Postgres connection string; in-memory store when unset |
/// | `EMPLOYEES_TABLE` | `employees` | table holding the employee collection |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: StoreBackend,
    table: String,
}

impl StoreSettings {
    pub fn postgres(url: impl Into<String>, table: impl Into<String>) -> Result<Self, ConfigError> {
        let table = table.into();
        check_table_name(&table)?;
        Ok(Self {
            backend: StoreBackend::Postgres { url: url.into() },
            table,
        })
    }

    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let table = var("EMPLOYEES_TABLE")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());

        match var("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            Some(url) => Self::postgres(url, table),
            None => Ok(Self {
                backend: StoreBackend::InMemory,
                table,
            }),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

pub(crate) fn check_table_name(table: &str) -> Result<(), ConfigError> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(ConfigError::InvalidTableName(table.to_string()))
    }
}
