//! # Attribute Table Mapping
//!
//! Registry of the tables that hold custom attributes and the column that
//! links each of them to its owning entity.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  s_user_addresses_attributes   addressID ──► s_user_addresses.id        │
//! │  s_articles_attributes         articledetailsID ──► article detail      │
//! │  s_order_attributes            orderID ──► order                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Table and column names from this registry are interpolated into SQL, so
//! only plain identifiers (`[A-Za-z0-9_]`) are accepted.

use std::collections::HashMap;

use crate::error::{DbError, DbResult};

/// One attribute table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeTable {
    pub name: String,
    /// Column holding the id of the owning entity. Unique per table.
    pub foreign_key: String,
}

/// Known attribute tables, keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct TableMapping {
    tables: HashMap<String, AttributeTable>,
}

impl TableMapping {
    /// An empty mapping. See [`TableMapping::standard`] for the built-in tables.
    pub fn new() -> Self {
        TableMapping::default()
    }

    /// The attribute tables created by the bundled migrations.
    pub fn standard() -> Self {
        TableMapping::new()
            .with_table("s_user_addresses_attributes", "addressID")
            .with_table("s_articles_attributes", "articledetailsID")
            .with_table("s_order_attributes", "orderID")
    }

    pub fn with_table(mut self, name: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        let name = name.into();
        self.tables.insert(
            name.clone(),
            AttributeTable {
                name,
                foreign_key: foreign_key.into(),
            },
        );
        self
    }

    pub fn is_attribute_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Looks up `name`.
    ///
    /// ## Errors
    /// - `Table <name> is no attribute table` for unknown tables
    /// - a validation error if the registered names are not plain identifiers
    pub fn get(&self, name: &str) -> DbResult<&AttributeTable> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| DbError::validation(format!("Table {name} is no attribute table")))?;

        ensure_identifier(&table.name)?;
        ensure_identifier(&table.foreign_key)?;
        Ok(table)
    }

    /// Registered table names, sorted.
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Rejects anything but `[A-Za-z0-9_]+`.
pub(crate) fn ensure_identifier(name: &str) -> DbResult<()> {
    let valid = !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DbError::validation(format!("Invalid identifier {name}")))
    }
}
