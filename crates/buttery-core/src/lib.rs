//! # buttery-core
//!
//! Domain model of the Buttery Management System: what a product, sale and
//! stock movement are, and the rules they obey.
//!
//! ```text
//!   browser dashboard
//!         │  JSON over HTTP
//!   buttery-api   sessions, role gates, handlers
//!         │
//!   buttery-db    SQLite pool, migrations, repositories
//!         │
//!   buttery-core  entity types, Money, stock rules, validation   (this crate)
//! ```
//!
//! Nothing here performs I/O. Both crates above depend on it.
//!
//! | module | contents |
//! |---|---|
//! | [`types`] | entities, enums and request payloads |
//! | [`money`] | kobo-denominated [`Money`] with checked arithmetic |
//! | [`stock`] | movement direction and [`stock::SaleDraft`] |
//! | [`report`] | dashboard periods and their windows |
//! | [`validation`] | field checks shared by every endpoint |
//! | [`error`] | [`CoreError`] and [`ValidationError`] |
//!
//! ```rust
//! use buttery_core::stock::SaleDraft;
//! use buttery_core::types::NewSaleLine;
//!
//! // Ten bottles of water at 100 each
//! let draft = SaleDraft::from_lines(&[NewSaleLine {
//!     product_id: "water".to_string(),
//!     quantity: 10,
//!     unit_price_cents: 100,
//! }])
//! .unwrap();
//! assert_eq!(draft.total_amount_cents, 1000);
//! ```

pub mod error;
pub mod money;
pub mod report;
pub mod stock;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Upper bound on lines in one sale; keeps the write transaction short.
pub const MAX_SALE_ITEMS: usize = 100;

/// Largest quantity accepted for one sale line or one stock movement.
pub const MAX_ITEM_QUANTITY: i64 = 100_000;

/// Reason recorded on inventory transactions created by a sale.
pub const SALE_MOVEMENT_REASON: &str = "Sale";

/// Default low-stock threshold applied when a product is created without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;
