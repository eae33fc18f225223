//! Validated identifiers and the full-table query built from them.

use std::fmt;

use crate::{AppError, Result};

/// A database or table name restricted to `[A-Za-z0-9_.]`.
///
/// Dots may separate parts (`catalog.schema`) but never lead, trail or repeat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier(String);

impl Identifier {
    pub fn parse(kind: &'static str, value: &str) -> Result<Self> {
        let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_';
        let valid = !value.is_empty()
            && value
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(allowed));

        if valid {
            Ok(Self(value.to_string()))
        } else {
            Err(AppError::InvalidIdentifier {
                kind,
                value: value.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `{database}.{table}` with both parts validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub database: Identifier,
    pub table: Identifier,
}

impl TableRef {
    pub fn new(database: &str, table: &str) -> Result<Self> {
        Ok(Self {
            database: Identifier::parse("database", database)?,
            table: Identifier::parse("table", table)?,
        })
    }

    pub fn select_all(&self) -> String {
        format!("SELECT * FROM {}", self)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table)
    }
}
