//! # Buttery Seed Data
//!
//! Creates the first admin account and a small starter catalog at Main
//! Campus so a fresh install can be logged into and sold from.
//!
//! ## Usage
//! ```bash
//! SEED_ADMIN_EMAIL=admin@buttery.ng SEED_ADMIN_PASSWORD=changeme \
//!     cargo run -p buttery-db --bin seed
//! ```
//!
//! `BUTTERY_DATABASE_URL` selects the database (default `sqlite://buttery.db`).
//! Running it twice is harmless: an existing admin email or a database that
//! already has products is left alone.

use std::env;

use anyhow::{bail, Context};
use buttery_core::validation::{validate_email, validate_password};
use buttery_core::{NewProduct, Role};
use buttery_db::{Database, DbConfig, NewUser, ProductFilter};
use tracing::{info, warn};

const MAIN_CAMPUS: &str = "6f0c2a9e-6b7d-4c1e-9a2f-1d5e8b7c4a01";
const BEVERAGES: &str = "8a4d6e2b-1f3c-4b5a-8d7e-2c9f0a1b3e01";
const SNACKS: &str = "8a4d6e2b-1f3c-4b5a-8d7e-2c9f0a1b3e02";
const STATIONERY: &str = "8a4d6e2b-1f3c-4b5a-8d7e-2c9f0a1b3e03";

/// (name, category, price in kobo, opening stock, low-stock threshold)
const STARTER_CATALOG: &[(&str, &str, i64, i64, i64)] = &[
    ("Bottled Water 75cl", BEVERAGES, 20_000, 120, 24),
    ("Malt Drink", BEVERAGES, 50_000, 48, 12),
    ("Zobo 50cl", BEVERAGES, 30_000, 30, 10),
    ("Meat Pie", SNACKS, 80_000, 40, 10),
    ("Plantain Chips", SNACKS, 25_000, 60, 15),
    ("Gala Sausage Roll", SNACKS, 30_000, 50, 15),
    ("Exercise Book 60 Leaves", STATIONERY, 40_000, 25, 5),
    ("Biro (Blue)", STATIONERY, 10_000, 100, 20),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .init();

    let database_url =
        env::var("BUTTERY_DATABASE_URL").unwrap_or_else(|_| "sqlite://buttery.db".to_string());
    let admin_email = env::var("SEED_ADMIN_EMAIL").context("SEED_ADMIN_EMAIL is not set")?;
    let admin_password = env::var("SEED_ADMIN_PASSWORD").context("SEED_ADMIN_PASSWORD is not set")?;

    let admin_email = validate_email(&admin_email)?;
    if let Err(e) = validate_password(&admin_password) {
        bail!("SEED_ADMIN_PASSWORD rejected: {e}");
    }

    info!(database_url = %database_url, "Seeding database");
    let db = Database::new(DbConfig::new(&database_url)).await?;

    match db.users().get_by_email(&admin_email).await? {
        Some(existing) => {
            warn!(email = %existing.email, "Admin already exists, leaving it unchanged");
        }
        None => {
            let admin = db
                .users()
                .create(&NewUser {
                    name: "System Administrator".to_string(),
                    email: admin_email,
                    phone: "08000000000".to_string(),
                    password: admin_password,
                    role: Role::Admin,
                    location_id: Some(MAIN_CAMPUS.to_string()),
                })
                .await?;
            info!(id = %admin.id, email = %admin.email, "Admin created");
        }
    }

    let existing = db.products().list(&ProductFilter::default()).await?;
    if !existing.is_empty() {
        warn!(count = existing.len(), "Products already present, skipping starter catalog");
        db.close().await;
        return Ok(());
    }

    for (name, category, price_cents, stock, threshold) in STARTER_CATALOG {
        let product = db
            .products()
            .create(&NewProduct {
                name: (*name).to_string(),
                category_id: Some((*category).to_string()),
                price_cents: *price_cents,
                stock_quantity: *stock,
                low_stock_threshold: Some(*threshold),
                location_id: Some(MAIN_CAMPUS.to_string()),
            })
            .await
            .with_context(|| format!("failed to create {name}"))?;
        info!(id = %product.id, name = %product.name, "Product created");
    }

    info!(count = STARTER_CATALOG.len(), "Seed complete");
    db.close().await;
    Ok(())
}
