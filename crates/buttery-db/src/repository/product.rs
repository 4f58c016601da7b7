//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Filtered listing with category/location names
//! - Create, edit, soft delete
//!
//! Stock is never written here after creation: it only moves through
//! [`InventoryRepository`](super::inventory::InventoryRepository) and
//! [`SaleRepository`](super::sale::SaleRepository).

use buttery_core::{NewProduct, Product, ProductUpdate, Status, DEFAULT_LOW_STOCK_THRESHOLD};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use super::new_id;
use crate::error::{DbError, DbResult};

const PRODUCT_VIEW_SELECT: &str = r#"
    SELECT
        p.id, p.name, p.category_id, p.price_cents, p.stock_quantity,
        p.low_stock_threshold, p.location_id, p.status, p.created_at, p.updated_at,
        c.name AS category_name,
        l.name AS location_name
    FROM products p
    LEFT JOIN categories c ON p.category_id = c.id
    LEFT JOIN locations l ON p.location_id = l.id
"#;

/// A product joined with its category and location names.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub product: Product,
    pub category_name: Option<String>,
    pub location_name: Option<String>,
}

/// Listing filters. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub location_id: Option<String>,
    pub category_id: Option<String>,
    /// Only products at or below their low-stock threshold.
    pub low_stock: bool,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let low = repo.list(&ProductFilter { low_stock: true, ..Default::default() }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists active products ordered by name.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<ProductView>> {
        debug!(?filter, "Listing products");

        let sql = format!(
            r#"{PRODUCT_VIEW_SELECT}
            WHERE p.status = 'active'
              AND (?1 IS NULL OR p.location_id = ?1)
              AND (?2 IS NULL OR p.category_id = ?2)
              AND (?3 = 0 OR p.stock_quantity <= p.low_stock_threshold)
            ORDER BY p.name
            "#
        );

        let products = sqlx::query_as::<_, ProductView>(&sql)
            .bind(&filter.location_id)
            .bind(&filter.category_id)
            .bind(filter.low_stock)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ProductView>> {
        let sql = format!("{PRODUCT_VIEW_SELECT} WHERE p.id = ?1");
        let product = sqlx::query_as::<_, ProductView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    /// Gets a product only while it is on sale; soft-deleted rows read as absent.
    pub async fn get_active(&self, id: &str) -> DbResult<Option<ProductView>> {
        let sql = format!("{PRODUCT_VIEW_SELECT} WHERE p.id = ?1 AND p.status = 'active'");
        let product = sqlx::query_as::<_, ProductView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    /// Inserts a new active product.
    ///
    /// Opening stock is stored as-is; no ledger row is written for it.
    pub async fn create(&self, input: &NewProduct) -> DbResult<Product> {
        let now = Utc::now();
        let product = Product {
            id: new_id(),
            name: input.name.trim().to_string(),
            category_id: input.category_id.clone(),
            price_cents: input.price_cents,
            stock_quantity: input.stock_quantity,
            low_stock_threshold: input.low_stock_threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD),
            location_id: input.location_id.clone(),
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, category_id, price_cents, stock_quantity,
                low_stock_threshold, location_id, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.low_stock_threshold)
        .bind(&product.location_id)
        .bind(product.status)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates catalog fields of an active product.
    pub async fn update(&self, id: &str, input: &ProductUpdate) -> DbResult<ProductView> {
        debug!(id = %id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                category_id = ?3,
                price_cents = ?4,
                low_stock_threshold = ?5,
                location_id = ?6,
                updated_at = ?7
            WHERE id = ?1 AND status = 'active'
            "#,
        )
        .bind(id)
        .bind(input.name.trim())
        .bind(&input.category_id)
        .bind(input.price_cents)
        .bind(input.low_stock_threshold)
        .bind(&input.location_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Soft-deletes a product (status becomes `inactive`).
    ///
    /// Sale and ledger history keep referencing it.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating product");

        let result = sqlx::query(
            "UPDATE products SET status = 'inactive', updated_at = ?2 WHERE id = ?1 AND status = 'active'",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    const MAIN_CAMPUS: &str = "6f0c2a9e-6b7d-4c1e-9a2f-1d5e8b7c4a01";
    const BEVERAGES: &str = "8a4d6e2b-1f3c-4b5a-8d7e-2c9f0a1b3e01";

    fn new_product(name: &str, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            category_id: Some(BEVERAGES.to_string()),
            price_cents: 100,
            stock_quantity: stock,
            low_stock_threshold: None,
            location_id: Some(MAIN_CAMPUS.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_with_names() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.products().create(&new_product("Water", 100)).await.unwrap();

        assert_eq!(created.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);

        let view = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(view.product.name, "Water");
        assert_eq!(view.product.stock_quantity, 100);
        assert_eq!(view.category_name.as_deref(), Some("Beverages"));
        assert_eq!(view.location_name.as_deref(), Some("Main Campus"));
    }

    #[tokio::test]
    async fn test_list_filters() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products().create(&new_product("Water", 100)).await.unwrap();
        db.products().create(&new_product("Zobo", 4)).await.unwrap();

        let all = db.products().list(&ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].product.name, "Water");

        let low = db
            .products()
            .list(&ProductFilter {
                low_stock: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].product.name, "Zobo");

        let elsewhere = db
            .products()
            .list(&ProductFilter {
                location_id: Some("6f0c2a9e-6b7d-4c1e-9a2f-1d5e8b7c4a02".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(elsewhere.is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.products().create(&new_product("Water", 100)).await.unwrap();

        let updated = db
            .products()
            .update(
                &created.id,
                &ProductUpdate {
                    name: "Water 75cl".to_string(),
                    category_id: None,
                    price_cents: 150,
                    low_stock_threshold: 20,
                    location_id: Some(MAIN_CAMPUS.to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.product.name, "Water 75cl");
        assert_eq!(updated.product.price_cents, 150);
        assert_eq!(updated.product.stock_quantity, 100);
        assert_eq!(updated.category_name, None);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.products().create(&new_product("Water", 100)).await.unwrap();

        db.products().deactivate(&created.id).await.unwrap();

        assert!(db.products().list(&ProductFilter::default()).await.unwrap().is_empty());
        let still_there = db.products().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(still_there.product.status, Status::Inactive);
        assert!(db.products().get_active(&created.id).await.unwrap().is_none());

        // second delete finds no active product
        let err = db.products().deactivate(&created.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_category_is_fk_violation() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut input = new_product("Water", 1);
        input.category_id = Some("00000000-0000-4000-8000-000000000000".to_string());

        let err = db.products().create(&input).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
