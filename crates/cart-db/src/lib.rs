//! # cart-db: Attribute Storage for the Cart Engine
//!
//! SQLite storage for custom attributes: free-form columns attached to
//! addresses, articles and orders, loaded and written as JSON maps.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cart-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │   │
//! │  │   │   (pool.rs)   │    │ (attribute.rs)│    │  (embedded)  │    │   │
//! │  │   │               │    │               │    │              │    │   │
//! │  │   │ SqlitePool    │◄───│ DataLoader    │    │ 001_attribute│    │   │
//! │  │   │ TableMapping  │    │ DataPersister │    │   _tables    │    │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`mapping`] - Registry of attribute tables
//! - [`error`] - Database error types
//! - [`repository`] - Attribute loader and persister
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cart_db::{Database, DbConfig};
//! use serde_json::json;
//!
//! let db = Database::new(DbConfig::new("cart.db")).await?;
//!
//! let values = json!({"text1": "foo"}).as_object().cloned().unwrap_or_default();
//! db.data_persister().persist(&values, "s_user_addresses_attributes", 2).await?;
//!
//! let attributes = db.data_loader().load("s_user_addresses_attributes", 2).await?;
//! assert_eq!(attributes["text1"], "foo");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod mapping;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use mapping::{AttributeTable, TableMapping};
pub use pool::{Database, DbConfig};

pub use repository::attribute::{AttributeData, DataLoader, DataPersister};

/// Default log filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,cart=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cart_db=trace` - Show trace for this crate only
/// - Default: [`DEFAULT_LOG_FILTER`]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
