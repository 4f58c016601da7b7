//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(vendor, location, method, &draft)      │
//! │       ▼                                                                 │
//! │  SaleRepository                                                        │
//! │  ├── record_sale  (one transaction: header, items, stock, ledger)     │
//! │  ├── list         (newest first, with names)                          │
//! │  └── get_with_items                                                    │
//! │       │                                                                 │
//! │       │  Parameterized SQL                                             │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts, roles, status
//! - [`LocationRepository`](catalog::LocationRepository) / [`CategoryRepository`](catalog::CategoryRepository) - Reference data
//! - [`ProductRepository`](product::ProductRepository) - Product catalog
//! - [`SaleRepository`](sale::SaleRepository) - Atomic sale recording
//! - [`InventoryRepository`](inventory::InventoryRepository) - Stock ledger
//! - [`ReportRepository`](report::ReportRepository) - Dashboard aggregates

pub mod catalog;
pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;

/// Generates a new entity id.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
