//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    record_sale (ONE transaction)                        │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    INSERT sales            (header, total = Σ line totals)             │
//! │    for each line:                                                      │
//! │      UPDATE products       stock = MAX(0, stock - q)  ── 0 rows? ──┐   │
//! │      INSERT sale_items     (snapshot of q, unit price, total)      │   │
//! │      INSERT inventory_transactions (OUT, "Sale", sale_id)          │   │
//! │  COMMIT                                                            │   │
//! │                                                                    ▼   │
//! │  Any error drops the transaction ──────────────────────────► ROLLBACK  │
//! │  Nothing is persisted unless every step succeeded.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use buttery_core::stock::SaleDraft;
use buttery_core::{InventoryTransaction, PaymentMethod, Sale, SaleItem, TransactionType, SALE_MOVEMENT_REASON};
use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use super::new_id;
use crate::error::{DbError, DbResult};

/// Everything written by a successful [`SaleRepository::record_sale`].
#[derive(Debug, Clone, Serialize)]
pub struct SaleReceipt {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    #[serde(skip)]
    pub movements: Vec<InventoryTransaction>,
}

/// A sale joined with vendor/location names and its item count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SaleView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub sale: Sale,
    pub vendor_name: Option<String>,
    pub location_name: Option<String>,
    pub item_count: i64,
}

/// A sale item joined with its product name.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SaleItemView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub item: SaleItem,
    pub product_name: Option<String>,
}

/// A sale with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetail {
    pub sale: SaleView,
    pub items: Vec<SaleItemView>,
}

const SALE_VIEW_SELECT: &str = r#"
    SELECT
        s.id, s.total_amount_cents, s.payment_method, s.location_id, s.vendor_id, s.created_at,
        u.name AS vendor_name,
        l.name AS location_name,
        (SELECT COUNT(*) FROM sale_items si WHERE si.sale_id = s.id) AS item_count
    FROM sales s
    LEFT JOIN users u ON s.vendor_id = u.id
    LEFT JOIN locations l ON s.location_id = l.id
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale atomically.
    ///
    /// `draft` comes from [`SaleDraft::from_lines`], so line totals and the
    /// sale total are already computed and overflow-checked.
    ///
    /// ## Errors
    /// - `NotFound { entity: "Product" }` when a line names an unknown or
    ///   inactive product; the whole sale is rolled back
    /// - `ForeignKeyViolation` for an unknown vendor or location
    pub async fn record_sale(
        &self,
        vendor_id: &str,
        location_id: &str,
        payment_method: PaymentMethod,
        draft: &SaleDraft,
    ) -> DbResult<SaleReceipt> {
        let now = Utc::now();
        let sale = Sale {
            id: new_id(),
            total_amount_cents: draft.total_amount_cents,
            payment_method,
            location_id: location_id.to_string(),
            vendor_id: vendor_id.to_string(),
            created_at: now,
        };

        debug!(id = %sale.id, lines = draft.lines.len(), total = sale.total_amount_cents, "Recording sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_amount_cents, payment_method, location_id, vendor_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.total_amount_cents)
        .bind(sale.payment_method)
        .bind(&sale.location_id)
        .bind(&sale.vendor_id)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(draft.lines.len());
        let mut movements = Vec::with_capacity(draft.lines.len());

        for line in &draft.lines {
            // Single-statement decrement, so concurrent sales serialize on the write lock
            let remaining: Option<i64> = sqlx::query_scalar(
                r#"
                UPDATE products
                SET stock_quantity = MAX(0, stock_quantity - ?1), updated_at = ?2
                WHERE id = ?3 AND status = 'active'
                RETURNING stock_quantity
                "#,
            )
            .bind(line.quantity)
            .bind(now)
            .bind(&line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(remaining) = remaining else {
                // tx is dropped here, rolling back the header and earlier lines
                return Err(DbError::not_found("Product", &line.product_id));
            };

            if remaining == 0 {
                warn!(product_id = %line.product_id, sale_id = %sale.id, "Sale left product out of stock");
            }

            let item = SaleItem {
                id: new_id(),
                sale_id: sale.id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                total_price_cents: line.total_price_cents,
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, quantity,
                    unit_price_cents, total_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            let movement = InventoryTransaction {
                id: new_id(),
                product_id: line.product_id.clone(),
                transaction_type: TransactionType::Out,
                quantity: line.quantity,
                reason: Some(SALE_MOVEMENT_REASON.to_string()),
                user_id: vendor_id.to_string(),
                sale_id: Some(sale.id.clone()),
                created_at: now,
            };

            super::inventory::insert_transaction(&mut tx, &movement).await?;

            items.push(item);
            movements.push(movement);
        }

        tx.commit().await?;

        info!(
            id = %sale.id,
            vendor_id = %vendor_id,
            total = sale.total_amount_cents,
            items = items.len(),
            "Sale recorded"
        );

        Ok(SaleReceipt { sale, items, movements })
    }

    /// Lists sales newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> DbResult<Vec<SaleView>> {
        let sql = format!("{SALE_VIEW_SELECT} ORDER BY s.created_at DESC, s.rowid DESC LIMIT ?1 OFFSET ?2");
        let sales = sqlx::query_as::<_, SaleView>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }

    /// Gets a sale with its items.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<SaleDetail>> {
        let sql = format!("{SALE_VIEW_SELECT} WHERE s.id = ?1");
        let Some(sale) = sqlx::query_as::<_, SaleView>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, SaleItemView>(
            r#"
            SELECT
                si.id, si.sale_id, si.product_id, si.quantity,
                si.unit_price_cents, si.total_price_cents, si.created_at,
                p.name AS product_name
            FROM sale_items si
            LEFT JOIN products p ON si.product_id = p.id
            WHERE si.sale_id = ?1
            ORDER BY si.rowid
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SaleDetail { sale, items }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
