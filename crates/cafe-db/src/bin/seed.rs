//! # Seed Data Loader
//!
//! Populates the database with a working sample cafe for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default dev database
//! cargo run -p cafe-db --bin seed
//!
//! # Specify database path
//! cargo run -p cafe-db --bin seed -- --db ./data/cafe.db
//! ```
//!
//! ## Seeded Data
//! - Default admin account plus one staff terminal account
//! - Menu categories and drinks with VND prices
//! - Numbered tables
//! - Inventory items with an opening stock delivery on the ledger
//!
//! Everything goes through the same validated repository paths as the
//! interactive flows; invalid rows are impossible by construction.

use std::env;

use cafe_db::{Database, DbConfig};
use cafe_core::Role;

/// (category, description, items as (name, price VND))
const MENU: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Cà phê",
        "Coffee",
        &[
            ("Cà phê đen", 20_000),
            ("Cà phê sữa", 25_000),
            ("Bạc xỉu", 28_000),
            ("Espresso", 25_000),
            ("Latte", 35_000),
            ("Cappuccino", 35_000),
        ],
    ),
    (
        "Trà",
        "Tea",
        &[
            ("Trà đào", 30_000),
            ("Trà sữa", 32_000),
            ("Trà gừng", 25_000),
        ],
    ),
    (
        "Bánh",
        "Pastry",
        &[
            ("Bánh mì", 15_000),
            ("Croissant", 25_000),
            ("Tiramisu", 40_000),
        ],
    ),
];

/// (number, seats)
const TABLES: &[(i64, i64)] = &[(1, 2), (2, 2), (3, 4), (4, 4), (5, 6), (6, 8)];

/// (name, unit, threshold, opening stock, unit cost VND, supplier)
const INVENTORY: &[(&str, &str, i64, i64, i64, &str)] = &[
    ("Coffee beans", "kg", 5, 20, 180_000, "Trung Nguyên"),
    ("Fresh milk", "liter", 10, 40, 12_000, "Vinamilk"),
    ("Condensed milk", "can", 6, 24, 22_000, "Vinamilk"),
    ("Sugar", "kg", 3, 10, 25_000, "Biên Hòa"),
    ("Tea leaves", "kg", 2, 5, 90_000, "Thái Nguyên"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./cafe_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cafe POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./cafe_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Cafe POS Seed Data Loader");
    println!("============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Refuse to double-seed
    if !db.menu().list_items(None).await?.is_empty() {
        println!("⚠ Database already has menu items");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding...");

    db.users().ensure_default_admin().await?;
    db.users()
        .create("thungan", "thungan", Role::Staff, None, None)
        .await?;
    println!("✓ Accounts (admin/admin, thungan/thungan)");

    let mut item_count = 0;
    for (category, description, items) in MENU {
        let cat = db.menu().create_category(category, Some(description)).await?;
        for (name, price) in *items {
            db.menu().create_item(Some(cat.id), name, None, *price).await?;
            item_count += 1;
        }
    }
    println!("✓ {} categories, {} menu items", MENU.len(), item_count);

    for (number, capacity) in TABLES {
        db.tables().create(*number, *capacity).await?;
    }
    println!("✓ {} tables", TABLES.len());

    for (name, unit, threshold, opening, cost, supplier) in INVENTORY {
        let item = db.inventory().create(name, 0, unit, *threshold).await?;
        db.inventory()
            .import_stock(
                item.id,
                *opening,
                Some(*cost),
                Some(supplier),
                Some("opening stock"),
            )
            .await?;
    }
    println!("✓ {} inventory items with opening stock", INVENTORY.len());

    println!();
    println!("Done.");

    Ok(())
}
