//! # Seed Data Generator
//!
//! Populates the attribute tables with development data.
//!
//! ## Usage
//! ```bash
//! # Seed 500 entities per table (default)
//! cargo run -p cart-db --bin seed
//!
//! # Custom amount and database path
//! cargo run -p cart-db --bin seed -- --count 2000 --db ./data/cart.db
//! ```
//!
//! Each address gets `text1`/`text2`, each article detail `attr1`,
//! `position` and `rating`, each order `attribute1`.

use std::env;

use cart_db::{init_tracing, AttributeData, Database, DbConfig};
use serde_json::{json, Value};
use tracing::{info, warn};

/// Delivery notes cycled through for addresses.
const DELIVERY_NOTES: &[&str] = &[
    "Leave at the door",
    "Ring twice",
    "Deliver to neighbour",
    "Reception desk",
    "Back entrance",
];

/// Badges cycled through for articles.
const BADGES: &[&str] = &["new", "bestseller", "limited", "eco", "sale"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count: i64 = 500;
    let mut db_path = String::from("./cart_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(500);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cart Engine Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Entities per attribute table (default: 500)");
                println!("  -d, --db <PATH>    Database file path (default: ./cart_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    info!(db = %db_path, count, "Seeding attribute tables");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.data_loader().load("s_user_addresses_attributes", 1).await?;
    if !existing.is_empty() {
        warn!("Database already has attribute data, skipping seed");
        return Ok(());
    }

    let persister = db.data_persister();
    let start = std::time::Instant::now();
    let mut written = 0usize;

    for id in 1..=count {
        let rows = [
            ("s_user_addresses_attributes", address_attributes(id)),
            ("s_articles_attributes", article_attributes(id)),
            ("s_order_attributes", order_attributes(id)),
        ];

        for (table, values) in rows {
            if let Err(e) = persister.persist(&values, table, id).await {
                warn!(table, id, error = %e, "Failed to persist attributes");
                continue;
            }
            written += 1;
        }

        if id % 100 == 0 {
            info!(entities = id, "Seeding in progress");
        }
    }

    info!(rows = written, elapsed = ?start.elapsed(), "Seed complete");

    let sample = db.data_loader().load("s_articles_attributes", 1).await?;
    info!(sample = %serde_json::Value::Object(sample), "Sample article attributes");

    db.close().await;
    Ok(())
}

fn object(value: Value) -> AttributeData {
    match value {
        Value::Object(map) => map,
        _ => AttributeData::new(),
    }
}

fn address_attributes(id: i64) -> AttributeData {
    let note = DELIVERY_NOTES[id as usize % DELIVERY_NOTES.len()];
    object(json!({
        "text1": note,
        "text2": format!("Floor {}", id % 12),
    }))
}

fn article_attributes(id: i64) -> AttributeData {
    let badge = BADGES[id as usize % BADGES.len()];
    object(json!({
        "attr1": badge,
        "position": id,
        "rating": ((id * 7) % 50) as f64 / 10.0,
    }))
}

fn order_attributes(id: i64) -> AttributeData {
    object(json!({
        "attribute1": format!("ORDER-{id:06}"),
    }))
}
