//! # Validation Module
//!
//! Input validation for request payloads, run before any database work.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (buttery-api)                                 │
//! │  └── JSON shape and enum values (serde) → 400 on mismatch             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths, formats                                 │
//! │  └── Quantities, prices, sale size limits                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (emails, location/category names)                          │
//! │  ├── CHECK (stock_quantity >= 0)                                       │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use buttery_core::validation::{validate_email, validate_quantity};
//!
//! assert_eq!(validate_email("  Ada@Example.com ").unwrap(), "ada@example.com");
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{NewInventoryTransaction, NewLabel, NewProduct, NewSaleLine, ProductUpdate};
use crate::{MAX_ITEM_QUANTITY, MAX_SALE_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

const MAX_NAME_LENGTH: usize = 200;
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_REASON_LENGTH: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required display name and returns it trimmed.
///
/// ```rust
/// use buttery_core::validation::validate_name;
///
/// assert_eq!(validate_name("name", " Water ").unwrap(), "Water");
/// assert!(validate_name("name", "   ").is_err());
/// ```
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(value.to_string())
}

/// Validates an email address and returns it trimmed and lowercased.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a dot that is neither first nor last
/// - No whitespace
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rfind('.') {
        Some(dot) if dot > 0 && dot < domain.len() - 1 && !domain.starts_with('.') => {}
        _ => return Err(invalid()),
    }

    Ok(email)
}

/// Validates a new password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

/// Validates a phone number and returns it trimmed.
///
/// Accepts digits with an optional leading `+` and spaces or hyphens as
/// separators; at least 7 digits.
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    let body = phone.strip_prefix('+').unwrap_or(phone);
    let well_formed = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    let digits = body.chars().filter(char::is_ascii_digit).count();

    if !well_formed || !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain 7 to 15 digits".to_string(),
        });
    }

    Ok(phone.to_string())
}

/// Trims an optional free-text field; empty input becomes `None`.
pub fn validate_optional_text(field: &str, value: Option<&str>) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) if text.chars().count() > MAX_REASON_LENGTH => Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_REASON_LENGTH,
        }),
        Some(text) => Ok(Some(text.to_string())),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sale-line or stock-movement quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in minor units. Zero is allowed.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a non-negative stock figure (opening stock or threshold).
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID reference.
///
/// ```rust
/// use buttery_core::validation::validate_uuid;
///
/// assert!(validate_uuid("product_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("product_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

fn validate_optional_uuid(field: &str, id: Option<&str>) -> ValidationResult<()> {
    match id {
        Some(id) => validate_uuid(field, id),
        None => Ok(()),
    }
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates the line items of a sale request.
///
/// Checks non-emptiness, the item cap, and each line's product id,
/// quantity and unit price.
pub fn validate_sale_lines(lines: &[NewSaleLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if lines.len() > MAX_SALE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_ITEMS as i64,
        });
    }

    for line in lines {
        validate_uuid("product_id", &line.product_id)?;
        validate_quantity(line.quantity)?;
        validate_price_cents(line.unit_price_cents)?;
    }

    Ok(())
}

/// Validates a product creation payload.
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_price_cents(input.price_cents)?;
    validate_stock_level("stock_quantity", input.stock_quantity)?;
    if let Some(threshold) = input.low_stock_threshold {
        validate_stock_level("low_stock_threshold", threshold)?;
    }
    validate_optional_uuid("category_id", input.category_id.as_deref())?;
    validate_optional_uuid("location_id", input.location_id.as_deref())?;
    Ok(())
}

/// Validates a product edit payload.
pub fn validate_product_update(input: &ProductUpdate) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_price_cents(input.price_cents)?;
    validate_stock_level("low_stock_threshold", input.low_stock_threshold)?;
    validate_optional_uuid("category_id", input.category_id.as_deref())?;
    validate_optional_uuid("location_id", input.location_id.as_deref())?;
    Ok(())
}

/// Validates a manual inventory movement payload.
pub fn validate_inventory_transaction(input: &NewInventoryTransaction) -> ValidationResult<()> {
    validate_uuid("product_id", &input.product_id)?;
    validate_quantity(input.quantity)?;
    validate_optional_text("reason", input.reason.as_deref())?;
    Ok(())
}

/// Validates a location or category payload.
pub fn validate_label(input: &NewLabel) -> ValidationResult<()> {
    validate_name("name", &input.name)?;
    validate_optional_text("description", input.description.as_deref())?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;

    const PRODUCT_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn line(quantity: i64, unit_price_cents: i64) -> NewSaleLine {
        NewSaleLine {
            product_id: PRODUCT_ID.to_string(),
            quantity,
            unit_price_cents,
        }
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("Admin@Buttery.ng").unwrap(), "admin@buttery.ng");
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a@example.").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(matches!(
            validate_password("short"),
            Err(ValidationError::TooShort { min: 6, .. })
        ));
        assert!(matches!(
            validate_password(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone(" +234 801-234-5678 ").unwrap(), "+234 801-234-5678");
        assert!(validate_phone("08012345678").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("0801abc5678").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Water").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(validate_optional_text("reason", None).unwrap(), None);
        assert_eq!(validate_optional_text("reason", Some("  ")).unwrap(), None);
        assert_eq!(
            validate_optional_text("reason", Some(" Expired ")).unwrap(),
            Some("Expired".to_string())
        );
        assert!(validate_optional_text("reason", Some(&"x".repeat(501))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(15000).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_sale_lines() {
        assert!(validate_sale_lines(&[line(10, 100)]).is_ok());
        assert!(validate_sale_lines(&[]).is_err());
        assert!(validate_sale_lines(&[line(0, 100)]).is_err());
        assert!(validate_sale_lines(&[line(1, -1)]).is_err());

        let too_many: Vec<_> = (0..=MAX_SALE_ITEMS).map(|_| line(1, 100)).collect();
        assert!(validate_sale_lines(&too_many).is_err());

        let bad_id = NewSaleLine {
            product_id: "water".to_string(),
            quantity: 1,
            unit_price_cents: 100,
        };
        assert!(validate_sale_lines(&[bad_id]).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut input = NewProduct {
            name: "Water".to_string(),
            category_id: None,
            price_cents: 100,
            stock_quantity: 100,
            low_stock_threshold: Some(10),
            location_id: Some(PRODUCT_ID.to_string()),
        };
        assert!(validate_new_product(&input).is_ok());

        input.stock_quantity = -5;
        assert!(validate_new_product(&input).is_err());

        input.stock_quantity = 0;
        input.location_id = Some("main".to_string());
        assert!(validate_new_product(&input).is_err());
    }

    #[test]
    fn test_validate_inventory_transaction() {
        let input = NewInventoryTransaction {
            product_id: PRODUCT_ID.to_string(),
            transaction_type: TransactionType::Damage,
            quantity: 3,
            reason: Some("Crushed carton".to_string()),
        };
        assert!(validate_inventory_transaction(&input).is_ok());

        let zero = NewInventoryTransaction { quantity: 0, ..input };
        assert!(validate_inventory_transaction(&zero).is_err());
    }
}
