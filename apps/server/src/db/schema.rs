//! Table layout shared by the loader and the relational store.
//!
//! ```sql
//! CREATE TABLE spawns (
//!     id           VARCHAR(255) PRIMARY KEY,
//!     pokemon_name VARCHAR(255),
//!     features     VARCHAR(100)[],
//!     generation   INT,
//!     bucket       VARCHAR(50),
//!     level_min    INT,
//!     data         JSONB
//! );
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use crate::{Error, Result};

lazy_static! {
    static ref IDENTIFIER: Regex =
        Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier regex is valid");
}

/// A table name that is safe to interpolate into DDL and queries.
///
/// Identifiers can't be bound as parameters, so the name is restricted to
/// lower-case unquoted Postgres identifiers instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: &str) -> Result<Self> {
        if IDENTIFIER.is_match(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(Error::Config(format!(
                "invalid table name '{name}': expected a lower-case identifier ([a-z_][a-z0-9_]*)"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", self.0)
    }

    pub fn create_sql(&self) -> String {
        format!(
            "CREATE TABLE {} (
                id VARCHAR(255) PRIMARY KEY,
                pokemon_name VARCHAR(255),
                features VARCHAR(100)[],
                generation INT,
                bucket VARCHAR(50),
                level_min INT,
                data JSONB
            )",
            self.0
        )
    }

    /// Secondary indexes matching the search predicates; `features` gets GIN for `@>`.
    pub fn index_sql(&self) -> Vec<String> {
        let t = &self.0;
        vec![
            format!("CREATE INDEX {t}_pokemon_name_idx ON {t} (pokemon_name)"),
            format!("CREATE INDEX {t}_features_idx ON {t} USING GIN (features)"),
            format!("CREATE INDEX {t}_generation_idx ON {t} (generation)"),
            format!("CREATE INDEX {t}_bucket_idx ON {t} (bucket)"),
        ]
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(TableName::parse("spawns").is_ok());
        assert!(TableName::parse("_spawns_v2").is_ok());
    }

    #[test]
    fn rejects_anything_that_needs_quoting() {
        for bad in ["", "Spawns", "1spawns", "spawns;drop", "spawns table", "public.spawns"] {
            assert!(TableName::parse(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn ddl_uses_table_name() {
        let table = TableName::parse("spawns").unwrap();
        assert_eq!(table.drop_sql(), "DROP TABLE IF EXISTS spawns");
        assert!(table.create_sql().starts_with("CREATE TABLE spawns ("));
        let indexes = table.index_sql();
        assert_eq!(indexes.len(), 4);
        assert!(indexes[1].contains("USING GIN (features)"));
    }
}
