//! # buttery-db
//!
//! SQLite persistence for the Buttery Management System, built on sqlx.
//!
//! [`Database`] owns the pool and hands out one repository per aggregate.
//! Repositories that move stock (`sales`, `inventory`) open their own
//! transaction, so a sale's header, lines, stock decrements and ledger rows
//! land together or not at all.
//!
//! | module | contents |
//! |---|---|
//! | [`pool`] | [`DbConfig`] and [`Database`] |
//! | [`migrations`] | embedded schema and reference data |
//! | [`repository`] | users, catalog, products, sales, inventory, reports |
//! | [`password`] | Argon2 hashing of stored credentials |
//! | [`error`] | [`DbError`] |
//!
//! ```rust,ignore
//! use buttery_db::{Database, DbConfig, ProductFilter};
//!
//! let db = Database::new(DbConfig::new("sqlite://buttery.db")).await?;
//! let receipt = db.sales().record_sale(&vendor_id, &location_id, PaymentMethod::Cash, &draft).await?;
//! let low = db.products().list(&ProductFilter { low_stock: true, ..Default::default() }).await?;
//! ```

pub mod error;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::{CategoryRepository, LocationRepository};
pub use repository::inventory::{InventoryRepository, InventoryTransactionView, DEFAULT_LEDGER_LIMIT};
pub use repository::product::{ProductFilter, ProductRepository, ProductView};
pub use repository::report::{
    ActivityEntry, DashboardStats, InventorySummary, PeriodReport, ReportRepository, SalesSummary,
};
pub use repository::sale::{SaleDetail, SaleItemView, SaleReceipt, SaleRepository, SaleView};
pub use repository::user::{NewUser, UserRepository, UserUpdate};
