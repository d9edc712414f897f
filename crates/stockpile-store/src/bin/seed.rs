//! # Seed Data Generator
//!
//! Populates a SQLite store with demo products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 products (default)
//! cargo run -p stockpile-store --bin seed
//!
//! # Generate custom amount
//! cargo run -p stockpile-store --bin seed -- --count 200
//!
//! # Specify database path
//! cargo run -p stockpile-store --bin seed -- --db ./data/stockpile.db
//! ```
//!
//! ## Generated Products
//! Products are spread over the five default categories. Each one gets:
//! - A fresh UUID and a staggered `createdAt`
//! - Price: $0.99 - $20.98
//! - Quantity: 0 - 40 (so some are out of stock)
//! - Low-stock threshold: 5 - 15 (so some are low stock)

use std::env;

use chrono::{Duration, Utc};
use stockpile_core::codec::{decode_products, encode_categories, encode_products};
use stockpile_core::{CategorySet, Product, ProductDraft, CATEGORIES_KEY, PRODUCTS_KEY};
use stockpile_store::{KeyValueStore, SqliteStore, StoreConfig};
use uuid::Uuid;

const DEFAULT_COUNT: usize = 50;
const DEFAULT_DB_PATH: &str = "./stockpile_dev.db";

/// Demo product names per default category.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Electronics",
        &[
            "USB-C Cable",
            "Wireless Mouse",
            "Mechanical Keyboard",
            "HDMI Adapter",
            "Bluetooth Speaker",
            "Phone Charger",
            "Webcam",
            "Headphones",
        ],
    ),
    (
        "Clothing",
        &[
            "Denim Jacket",
            "Cotton T-Shirt",
            "Wool Socks",
            "Rain Coat",
            "Baseball Cap",
            "Running Shoes",
            "Scarf",
            "Leather Belt",
        ],
    ),
    (
        "Food",
        &[
            "Green Apples",
            "Rolled Oats",
            "Basmati Rice",
            "Olive Oil",
            "Dark Chocolate",
            "Coffee Beans",
            "Honey",
            "Pasta",
        ],
    ),
    (
        "Furniture",
        &[
            "Desk Lamp",
            "Office Chair",
            "Bookshelf",
            "Side Table",
            "Floor Rug",
            "Wall Mirror",
            "Storage Box",
            "Coat Rack",
        ],
    ),
    (
        "Other",
        &[
            "Notebook",
            "Gel Pens",
            "Water Bottle",
            "Umbrella",
            "Batteries AA",
            "Gift Card",
            "Tote Bag",
            "Candle",
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;
    let mut db_path = String::from(DEFAULT_DB_PATH);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(DEFAULT_COUNT);
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
                println!("Stockpile Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  -c, --count <N>    Number of products to generate (default: {DEFAULT_COUNT})"
                );
                println!("  -d, --db <PATH>    Database file path (default: {DEFAULT_DB_PATH})");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Stockpile Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let store = SqliteStore::new(StoreConfig::new(&db_path)).await?;

    println!("✓ Connected to store");
    println!("✓ Migrations applied");

    let existing = match store.get(PRODUCTS_KEY).await? {
        Some(raw) => decode_products(&raw)?.len(),
        None => 0,
    };
    if existing > 0 {
        println!("⚠ Store already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let products = generate_products(count);

    let mut entries = vec![(PRODUCTS_KEY.to_string(), encode_products(&products)?)];
    if store.get(CATEGORIES_KEY).await?.is_none() {
        entries.push((CATEGORIES_KEY.to_string(), encode_categories(&CategorySet::default())?));
    }
    store.set_many(&entries).await?;

    let low = products.iter().filter(|p| p.is_low_stock()).count();
    let out = products.iter().filter(|p| p.is_out_of_stock()).count();

    println!();
    println!("✓ Generated {} products", products.len());
    println!("  Low stock:    {}", low);
    println!("  Out of stock: {}", out);

    store.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates `count` demo products, cycling through the catalog.
fn generate_products(count: usize) -> Vec<Product> {
    let start = Utc::now() - Duration::minutes(count as i64);

    CATALOG
        .iter()
        .flat_map(|(category, names)| names.iter().map(move |name| (*category, *name)))
        .cycle()
        .take(count)
        .enumerate()
        .map(|(seed, (category, name))| {
            let round = seed / catalog_len();
            let name = if round == 0 {
                name.to_string()
            } else {
                format!("{} #{}", name, round + 1)
            };
            Product::from_draft(
                Uuid::new_v4().to_string(),
                generate_draft(&name, category, seed),
                start + Duration::minutes(seed as i64),
            )
        })
        .collect()
}

/// Deterministic pseudo-random figures derived from `seed`.
fn generate_draft(name: &str, category: &str, seed: usize) -> ProductDraft {
    let price_cents = 99 + (seed * 37) % 2000;
    let quantity = (seed * 7) % 41;
    let threshold = 5 + (seed % 11);

    ProductDraft::new(
        name,
        category,
        price_cents as f64 / 100.0,
        quantity as u32,
        threshold as u32,
    )
}

fn catalog_len() -> usize {
    CATALOG.iter().map(|(_, names)| names.len()).sum()
}
