//! # Attribute Repository
//!
//! Loads and persists the custom attribute row of an entity.
//!
//! ## Round Trip
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  persist({"text1": "foo"}, "s_user_addresses_attributes", 2)            │
//! │       │                                                                 │
//! │       ├── foreign key falsy?          → "No foreign key provided"       │
//! │       ├── table not in TableMapping?  → "Table .. is no attribute table"│
//! │       ├── column not in table?        → "Column .. does not exist .."   │
//! │       ▼                                                                 │
//! │  INSERT .. ON CONFLICT(addressID) DO UPDATE SET text1 = excluded.text1  │
//! │                                                                         │
//! │  load("s_user_addresses_attributes", 2)                                 │
//! │       ▼                                                                 │
//! │  { "id": 1, "addressID": 2, "text1": "foo", "text2": null, ... }        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Foreign keys are taken as JSON values so that callers holding untyped
//! request data get the same validation as typed callers: `0`, `false`,
//! `null`, `""` and `"0"` all count as "no foreign key".

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Number, Value};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::mapping::{ensure_identifier, AttributeTable, TableMapping};

/// Column name → value of one attribute row.
pub type AttributeData = Map<String, Value>;

// =============================================================================
// Data Loader
// =============================================================================

/// Reads attribute rows.
#[derive(Debug, Clone)]
pub struct DataLoader {
    pool: SqlitePool,
    mapping: Arc<TableMapping>,
}

impl DataLoader {
    pub fn new(pool: SqlitePool, mapping: Arc<TableMapping>) -> Self {
        DataLoader { pool, mapping }
    }

    /// Loads the attribute row of `foreign_key` from `table`.
    ///
    /// Returns an empty map when the entity has no attribute row yet.
    ///
    /// ## Errors
    /// - `No foreign key provided` for falsy keys
    /// - `Table <table> is no attribute table` for unknown tables
    pub async fn load(&self, table: &str, foreign_key: impl Into<Value>) -> DbResult<AttributeData> {
        let foreign_key = parse_foreign_key(&foreign_key.into())?;
        let table = self.mapping.get(table)?;

        let sql = format!(
            "SELECT * FROM {} WHERE {} = ? LIMIT 1",
            table.name, table.foreign_key
        );

        let row = sqlx::query(&sql)
            .bind(foreign_key)
            .fetch_optional(&self.pool)
            .await?;

        let data = row.map(|row| decode_row(&row)).unwrap_or_default();

        debug!(
            table = %table.name,
            foreign_key,
            columns = data.len(),
            "Loaded attributes"
        );

        Ok(data)
    }
}

// =============================================================================
// Data Persister
// =============================================================================

/// Writes attribute rows.
#[derive(Debug, Clone)]
pub struct DataPersister {
    pool: SqlitePool,
    mapping: Arc<TableMapping>,
}

impl DataPersister {
    pub fn new(pool: SqlitePool, mapping: Arc<TableMapping>) -> Self {
        DataPersister { pool, mapping }
    }

    /// Upserts `values` into the attribute row of `foreign_key`.
    ///
    /// Columns not named in `values` keep their current value. With no
    /// values at all, an empty row is created if none exists.
    ///
    /// ## Errors
    /// Same as [`DataLoader::load`], plus `Column <c> does not exist in
    /// <table>` for unknown columns and for the `id` and foreign key columns.
    pub async fn persist(
        &self,
        values: &AttributeData,
        table: &str,
        foreign_key: impl Into<Value>,
    ) -> DbResult<()> {
        let foreign_key = parse_foreign_key(&foreign_key.into())?;
        let table = self.mapping.get(table)?;

        let writable = self.writable_columns(table).await?;
        for column in values.keys() {
            ensure_identifier(column)?;
            if !writable.contains(column) {
                return Err(DbError::validation(format!(
                    "Column {column} does not exist in {}",
                    table.name
                )));
            }
        }

        let sql = upsert_sql(table, values);
        let mut query = sqlx::query(&sql).bind(foreign_key);
        for value in values.values() {
            query = bind_value(query, value);
        }
        query.execute(&self.pool).await?;

        debug!(
            table = %table.name,
            foreign_key,
            columns = values.len(),
            "Persisted attributes"
        );

        Ok(())
    }

    /// Columns callers may write: everything but `id` and the foreign key.
    async fn writable_columns(&self, table: &AttributeTable) -> DbResult<HashSet<String>> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", table.name))
            .fetch_all(&self.pool)
            .await?;

        let mut columns = HashSet::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("name")?;
            if name != "id" && name != table.foreign_key {
                columns.insert(name);
            }
        }

        Ok(columns)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Validates a foreign key given as a JSON value.
fn parse_foreign_key(value: &Value) -> DbResult<i64> {
    let missing = || DbError::validation("No foreign key provided");
    let invalid = || DbError::validation(format!("Invalid foreign key {value}"));

    let id = match value {
        Value::Null | Value::Bool(false) => return Err(missing()),
        Value::Number(number) => number.as_i64().ok_or_else(invalid)?,
        Value::String(text) if text.is_empty() => return Err(missing()),
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if id == 0 {
        return Err(missing());
    }

    Ok(id)
}

/// `INSERT .. ON CONFLICT(fk) DO UPDATE` for the given columns.
///
/// Column names must already be checked against the table.
fn upsert_sql(table: &AttributeTable, values: &AttributeData) -> String {
    let columns: Vec<&str> = std::iter::once(table.foreign_key.as_str())
        .chain(values.keys().map(String::as_str))
        .collect();
    let placeholders = vec!["?"; columns.len()].join(", ");

    let on_conflict = if values.is_empty() {
        "DO NOTHING".to_string()
    } else {
        let assignments: Vec<String> = values
            .keys()
            .map(|column| format!("{column} = excluded.{column}"))
            .collect();
        format!("DO UPDATE SET {}", assignments.join(", "))
    };

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {}",
        table.name,
        columns.join(", "),
        placeholders,
        table.foreign_key,
        on_conflict
    )
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(flag) => query.bind(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => query.bind(integer),
            None => query.bind(number.as_f64()),
        },
        Value::String(text) => query.bind(text.clone()),
        // Arrays and objects are stored as JSON text.
        other => query.bind(other.to_string()),
    }
}

/// Converts a row into column → JSON value, following SQLite's dynamic
/// typing per value.
fn decode_row(row: &SqliteRow) -> AttributeData {
    let mut data = AttributeData::new();

    for column in row.columns() {
        let index = column.ordinal();

        let value = if let Ok(integer) = row.try_get::<Option<i64>, _>(index) {
            integer.map(Value::from).unwrap_or(Value::Null)
        } else if let Ok(Some(real)) = row.try_get::<Option<f64>, _>(index) {
            Number::from_f64(real).map(Value::Number).unwrap_or(Value::Null)
        } else if let Ok(Some(text)) = row.try_get::<Option<String>, _>(index) {
            Value::String(text)
        } else {
            Value::Null
        };

        data.insert(column.name().to_string(), value);
    }

    data
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde_json::json;

    const ADDRESSES: &str = "s_user_addresses_attributes";

    async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn values(value: Value) -> AttributeData {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_parse_foreign_key() {
        assert_eq!(parse_foreign_key(&json!(2)).unwrap(), 2);
        assert_eq!(parse_foreign_key(&json!("15")).unwrap(), 15);

        for falsy in [json!(false), json!(null), json!(0), json!(""), json!("0")] {
            assert_eq!(
                parse_foreign_key(&falsy).unwrap_err().to_string(),
                "No foreign key provided"
            );
        }

        assert!(parse_foreign_key(&json!("abc")).is_err());
        assert!(parse_foreign_key(&json!(1.5)).is_err());
        assert!(parse_foreign_key(&json!(true)).is_err());
    }

    #[test]
    fn test_upsert_sql() {
        let table = AttributeTable {
            name: ADDRESSES.to_string(),
            foreign_key: "addressID".to_string(),
        };

        assert_eq!(
            upsert_sql(&table, &values(json!({"text1": "foo"}))),
            "INSERT INTO s_user_addresses_attributes (addressID, text1) VALUES (?, ?) \
             ON CONFLICT(addressID) DO UPDATE SET text1 = excluded.text1"
        );
        assert_eq!(
            upsert_sql(&table, &AttributeData::new()),
            "INSERT INTO s_user_addresses_attributes (addressID) VALUES (?) \
             ON CONFLICT(addressID) DO NOTHING"
        );
    }

    #[tokio::test]
    async fn test_load_returns_empty_map_when_missing() {
        let db = database().await;
        let result = db.data_loader().load(ADDRESSES, 555).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_load_returns_persisted_values() {
        let db = database().await;
        db.data_persister()
            .persist(&values(json!({"text1": "foo"})), ADDRESSES, 2)
            .await
            .unwrap();

        let result = db.data_loader().load(ADDRESSES, 2).await.unwrap();

        assert!(!result.is_empty());
        assert_eq!(result["text1"], json!("foo"));
        assert_eq!(result["addressID"], json!(2));
        assert_eq!(result["text2"], Value::Null);
    }

    #[tokio::test]
    async fn test_load_foreign_key_validation() {
        let db = database().await;
        let loader = db.data_loader();

        for input in [json!(false), json!(null), json!(0), json!("")] {
            let err = loader.load(ADDRESSES, input).await.unwrap_err();
            assert_eq!(err.to_string(), "No foreign key provided");
        }
    }

    #[tokio::test]
    async fn test_load_with_unknown_table() {
        let db = database().await;
        let err = db
            .data_loader()
            .load("table_does_not_exists", 1)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Table table_does_not_exists is no attribute table");
    }

    #[tokio::test]
    async fn test_persist_updates_existing_row() {
        let db = database().await;
        let persister = db.data_persister();

        persister
            .persist(&values(json!({"text1": "foo", "text2": "bar"})), ADDRESSES, 7)
            .await
            .unwrap();
        persister
            .persist(&values(json!({"text1": "baz"})), ADDRESSES, "7")
            .await
            .unwrap();

        let result = db.data_loader().load(ADDRESSES, 7).await.unwrap();
        assert_eq!(result["text1"], json!("baz"));
        assert_eq!(result["text2"], json!("bar"));
    }

    #[tokio::test]
    async fn test_persist_numbers_and_nulls() {
        let db = database().await;
        db.data_persister()
            .persist(
                &values(json!({"position": 12, "rating": 2.5, "attr1": null})),
                "s_articles_attributes",
                3,
            )
            .await
            .unwrap();

        let result = db.data_loader().load("s_articles_attributes", 3).await.unwrap();
        assert_eq!(result["position"], json!(12));
        assert_eq!(result["rating"], json!(2.5));
        assert_eq!(result["attr1"], Value::Null);
    }

    #[tokio::test]
    async fn test_persist_rejects_unknown_and_key_columns() {
        let db = database().await;
        let persister = db.data_persister();

        let err = persister
            .persist(&values(json!({"nope": 1})), ADDRESSES, 1)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column nope does not exist in s_user_addresses_attributes"
        );

        assert!(persister
            .persist(&values(json!({"addressID": 9})), ADDRESSES, 1)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_persist_validates_key_and_table() {
        let db = database().await;
        let persister = db.data_persister();

        let err = persister
            .persist(&AttributeData::new(), ADDRESSES, 0)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No foreign key provided");

        let err = persister
            .persist(&AttributeData::new(), "s_unknown", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_persist_without_values_creates_row() {
        let db = database().await;
        db.data_persister()
            .persist(&AttributeData::new(), "s_order_attributes", 4)
            .await
            .unwrap();

        let result = db.data_loader().load("s_order_attributes", 4).await.unwrap();
        assert_eq!(result["orderID"], json!(4));
    }
}
