//! # Inventory Repository
//!
//! The stock ledger. Every stock change writes one `inventory_transactions`
//! row in the same database transaction as the stock update.
//!
//! ```text
//! IN      ──► stock_quantity + q
//! OUT     ──► MAX(0, stock_quantity - q)
//! DAMAGE  ──► MAX(0, stock_quantity - q)
//! ```

use buttery_core::{InventoryTransaction, NewInventoryTransaction, TransactionType};
use chrono::Utc;
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use super::new_id;
use crate::error::{DbError, DbResult};

/// Default page size for ledger listings.
pub const DEFAULT_LEDGER_LIMIT: i64 = 100;

/// A ledger row joined with product, handler and location names.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InventoryTransactionView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub transaction: InventoryTransaction,
    pub product_name: Option<String>,
    pub handler_name: Option<String>,
    pub location_name: Option<String>,
}

/// Inserts one ledger row inside an open transaction.
pub(crate) async fn insert_transaction(
    tx: &mut Transaction<'_, Sqlite>,
    movement: &InventoryTransaction,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory_transactions (
            id, product_id, transaction_type, quantity,
            reason, user_id, sale_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&movement.id)
    .bind(&movement.product_id)
    .bind(movement.transaction_type)
    .bind(movement.quantity)
    .bind(&movement.reason)
    .bind(&movement.user_id)
    .bind(&movement.sale_id)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Repository for the inventory ledger.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Records a manual stock movement and adjusts the product's stock.
    ///
    /// ## Errors
    /// - `NotFound { entity: "Product" }` for an unknown or deactivated product
    ///   (nothing is written)
    pub async fn record_transaction(
        &self,
        input: &NewInventoryTransaction,
        user_id: &str,
    ) -> DbResult<InventoryTransaction> {
        let now = Utc::now();
        let movement = InventoryTransaction {
            id: new_id(),
            product_id: input.product_id.clone(),
            transaction_type: input.transaction_type,
            quantity: input.quantity,
            reason: input
                .reason
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            user_id: user_id.to_string(),
            sale_id: None,
            created_at: now,
        };

        debug!(
            product_id = %movement.product_id,
            kind = %movement.transaction_type,
            quantity = movement.quantity,
            "Recording inventory transaction"
        );

        let mut tx = self.pool.begin().await?;

        let stock_sql = match movement.transaction_type {
            TransactionType::In => {
                "UPDATE products SET stock_quantity = stock_quantity + ?1, updated_at = ?2 WHERE id = ?3 AND status = 'active' RETURNING stock_quantity"
            }
            TransactionType::Out | TransactionType::Damage => {
                "UPDATE products SET stock_quantity = MAX(0, stock_quantity - ?1), updated_at = ?2 WHERE id = ?3 AND status = 'active' RETURNING stock_quantity"
            }
        };

        let remaining: Option<i64> = sqlx::query_scalar(stock_sql)
            .bind(movement.quantity)
            .bind(now)
            .bind(&movement.product_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(remaining) = remaining else {
            return Err(DbError::not_found("Product", &movement.product_id));
        };

        if remaining == 0 && !movement.transaction_type.is_inbound() {
            warn!(
                product_id = %movement.product_id,
                kind = %movement.transaction_type,
                quantity = movement.quantity,
                "Stock movement left product at zero"
            );
        }

        insert_transaction(&mut tx, &movement).await?;

        tx.commit().await?;

        info!(
            id = %movement.id,
            product_id = %movement.product_id,
            kind = %movement.transaction_type,
            quantity = movement.quantity,
            "Inventory transaction recorded"
        );

        Ok(movement)
    }

    /// Lists ledger rows newest first, optionally for one product.
    pub async fn list_recent(
        &self,
        limit: i64,
        product_id: Option<&str>,
    ) -> DbResult<Vec<InventoryTransactionView>> {
        let rows = sqlx::query_as::<_, InventoryTransactionView>(
            r#"
            SELECT
                it.id, it.product_id, it.transaction_type, it.quantity,
                it.reason, it.user_id, it.sale_id, it.created_at,
                p.name AS product_name,
                u.name AS handler_name,
                l.name AS location_name
            FROM inventory_transactions it
            LEFT JOIN products p ON it.product_id = p.id
            LEFT JOIN users u ON it.user_id = u.id
            LEFT JOIN locations l ON p.location_id = l.id
            WHERE (?1 IS NULL OR it.product_id = ?1)
            ORDER BY it.created_at DESC, it.rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
