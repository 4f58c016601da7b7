//! Entities and enums shared by the store and the HTTP layer.
//!
//! ```text
//!   Location 1──N Product N──1 Category
//!      │             │
//!      1             ├──N SaleItem N──1 Sale N──1 User (vendor)
//!      N             │
//!    User            └──N InventoryTransaction (IN / OUT / DAMAGE)
//! ```
//!
//! ## Identity
//! Every entity uses a UUID v4 string as its primary key. Money fields are
//! integer minor units and carry a `_cents` suffix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// ---- Role ------------------------------------------------------------------

/// Role of a user, deciding which mutating endpoints they may call.
///
/// ## Permission Matrix
/// ```text
/// ┌──────────────────────┬────────┬───────────────────┬────────┐
/// │ Action               │ vendor │ inventory_manager │ admin  │
/// ├──────────────────────┼────────┼───────────────────┼────────┤
/// │ record sale          │   ✓    │                   │   ✓    │
/// │ create/edit product  │        │         ✓         │   ✓    │
/// │ inventory movement   │        │         ✓         │   ✓    │
/// │ delete product       │        │                   │   ✓    │
/// │ manage users         │        │                   │   ✓    │
/// └──────────────────────┴────────┴───────────────────┴────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Records sales at a buttery.
    Vendor,
    /// Maintains products and stock.
    InventoryManager,
    /// Full access, including user management.
    Admin,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Role; 3] = [Role::Vendor, Role::InventoryManager, Role::Admin];

    /// Wire/database representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Vendor => "vendor",
            Role::InventoryManager => "inventory_manager",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vendor" => Ok(Role::Vendor),
            "inventory_manager" | "inventorymanager" => Ok(Role::InventoryManager),
            "admin" => Ok(Role::Admin),
            _ => Err(ValidationError::not_allowed(
                "role",
                &["vendor", "inventory_manager", "admin"],
            )),
        }
    }
}

// ---- Status ----------------------------------------------------------------

/// Active/inactive flag shared by users and products.
///
/// Nothing is physically deleted; deactivation flips this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }

    /// Returns the opposite status.
    pub const fn toggled(&self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }
}

// ---- Payment Method --------------------------------------------------------

/// How the customer paid for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Card payment on a POS terminal.
    Pos,
    /// Bank transfer.
    Transfer,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Pos => "pos",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

// ---- Transaction Type ------------------------------------------------------

/// Direction of an inventory movement.
///
/// `IN` restocks; `OUT` and `DAMAGE` remove stock, clamped at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Restock.
    In,
    /// Sale or transfer out.
    Out,
    /// Damage, expiry or loss.
    Damage,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::In => "IN",
            TransactionType::Out => "OUT",
            TransactionType::Damage => "DAMAGE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---- User ------------------------------------------------------------------

/// A staff member who can log in.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique, stored lowercase.
    pub email: String,
    pub phone: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip)]
    #[ts(skip)]
    pub password_hash: String,
    pub role: Role,
    /// Buttery this user is assigned to.
    pub location_id: Option<String>,
    pub status: Status,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Checks whether the user's role is in the allow-list.
    pub fn has_any_role(&self, allowed: &[Role]) -> bool {
        allowed.contains(&self.role)
    }
}

// ---- Location & Category ---------------------------------------------------

/// A physical outlet (a buttery).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Classification label for products.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// ---- Product ---------------------------------------------------------------

/// A product stocked at a buttery.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    pub category_id: Option<String>,

    /// Catalog price in minor units. Sales snapshot this value per line.
    pub price_cents: i64,

    /// Current stock. Never negative; changed only by inventory movements.
    pub stock_quantity: i64,

    /// At or below this quantity the product is flagged for restocking.
    pub low_stock_threshold: i64,

    pub location_id: Option<String>,

    /// Soft-delete flag.
    pub status: Status,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// ---- Sale ------------------------------------------------------------------

/// Header record of a completed sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Always equals the sum of the items' `total_price_cents`.
    pub total_amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub location_id: String,
    /// User who recorded the sale.
    pub vendor_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

/// A line item in a sale.
/// Uses snapshot pattern to freeze the unit price at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in minor units at time of sale (frozen).
    pub unit_price_cents: i64,
    /// `quantity × unit_price_cents` (frozen).
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// ---- Inventory Transaction -------------------------------------------------

/// Audit-log entry of a stock quantity change.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryTransaction {
    pub id: String,
    pub product_id: String,
    pub transaction_type: TransactionType,
    /// Requested movement size (before any clamping at zero).
    pub quantity: i64,
    pub reason: Option<String>,
    /// User who performed the movement.
    pub user_id: String,
    /// Originating sale, for movements created by a sale.
    pub sale_id: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// ---- Inputs ----------------------------------------------------------------
// Request payloads accepted by the API and consumed by the repositories.

/// Payload for creating a product.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub category_id: Option<String>,
    #[serde(alias = "price")]
    pub price_cents: i64,
    /// Opening stock. Defaults to zero.
    #[serde(default, alias = "stock")]
    pub stock_quantity: i64,
    pub low_stock_threshold: Option<i64>,
    pub location_id: Option<String>,
}

/// Payload for editing a product's catalog fields.
///
/// Stock is deliberately absent: it only moves through inventory transactions.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    pub name: String,
    pub category_id: Option<String>,
    #[serde(alias = "price")]
    pub price_cents: i64,
    pub low_stock_threshold: i64,
    pub location_id: Option<String>,
}

/// One requested line of a sale.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleLine {
    #[serde(alias = "productId")]
    pub product_id: String,
    pub quantity: i64,
    #[serde(alias = "unitPrice", alias = "unit_price", alias = "unitPriceCents")]
    pub unit_price_cents: i64,
}

/// Payload for recording a sale.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub items: Vec<NewSaleLine>,
    #[serde(alias = "paymentMethod")]
    pub payment_method: PaymentMethod,
    /// Falls back to the vendor's assigned location when absent.
    #[serde(default, alias = "locationId")]
    pub location_id: Option<String>,
    /// Optional client-computed total; must match the server's computation.
    #[serde(default, alias = "totalAmount", alias = "total_amount", alias = "totalAmountCents")]
    pub total_amount_cents: Option<i64>,
}

/// Payload for a manual inventory movement.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryTransaction {
    #[serde(alias = "productId")]
    pub product_id: String,
    #[serde(alias = "type", alias = "transactionType")]
    pub transaction_type: TransactionType,
    pub quantity: i64,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Payload for creating a location or category.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct NewLabel {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("cashier".parse::<Role>().is_err());
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&Role::InventoryManager).unwrap();
        assert_eq!(json, "\"inventory_manager\"");
    }

    #[test]
    fn test_transaction_type_wire_format() {
        let parsed: TransactionType = serde_json::from_str("\"DAMAGE\"").unwrap();
        assert_eq!(parsed, TransactionType::Damage);
        assert_eq!(serde_json::to_string(&TransactionType::In).unwrap(), "\"IN\"");
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(Status::Active.toggled(), Status::Inactive);
        assert_eq!(Status::Inactive.toggled(), Status::Active);
        assert_eq!(Status::default(), Status::Active);
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: "u-1".to_string(),
            name: "Mercy".to_string(),
            email: "mercy@example.com".to_string(),
            phone: "0800".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::Admin,
            location_id: None,
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
        assert!(user.has_any_role(&[Role::Admin, Role::Vendor]));
        assert!(!user.has_any_role(&[Role::Vendor]));
    }

    #[test]
    fn test_new_sale_accepts_camel_case() {
        let json = r#"{
            "items": [{"productId": "p-1", "quantity": 2, "unitPrice": 150}],
            "paymentMethod": "cash",
            "locationId": "loc-1",
            "totalAmount": 300
        }"#;
        let sale: NewSale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.items[0].product_id, "p-1");
        assert_eq!(sale.items[0].unit_price_cents, 150);
        assert_eq!(sale.payment_method, PaymentMethod::Cash);
        assert_eq!(sale.location_id.as_deref(), Some("loc-1"));
        assert_eq!(sale.total_amount_cents, Some(300));
    }
}
