//! # Repository Module
//!
//! Database repository implementations for the cart engine.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller                                                                 │
//! │       │  db.data_loader().load("s_user_addresses_attributes", 2)        │
//! │       ▼                                                                 │
//! │  DataLoader / DataPersister                                             │
//! │  ├── load(&self, table, foreign_key)                                    │
//! │  └── persist(&self, values, table, foreign_key)                         │
//! │       │                                                                 │
//! │       │  SQL Query (tables from TableMapping only)                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`DataLoader`](attribute::DataLoader) - Attribute row lookup
//! - [`DataPersister`](attribute::DataPersister) - Attribute row upsert

pub mod attribute;
