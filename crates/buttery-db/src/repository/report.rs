//! # Report Repository
//!
//! Read-only aggregates for the dashboards.
//!
//! ```text
//! /reports/dashboard?period=week
//!        │
//!        ▼
//! ReportPeriod::Week.window_start(now) ──► created_at >= start
//!        │
//!        ├── sales:     revenue, transactions, items sold
//!        ├── inventory: low-stock count, active products (not windowed)
//!        └── recent_activity: latest 5 sales ∪ latest 5 movements, newest 10
//! ```

use buttery_core::report::ReportPeriod;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Sales totals inside a report window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub revenue_cents: i64,
    pub transactions: i64,
    pub items_sold: i64,
}

/// Current inventory health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub low_stock_count: i64,
    pub total_products: i64,
}

/// One entry of the recent activity feed.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityEntry {
    /// `sale` or `inventory`.
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub description: String,
    pub location: Option<String>,
    /// Sale total; absent for inventory movements.
    pub amount_cents: Option<i64>,
}

/// Response of the period dashboard report.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub since: DateTime<Utc>,
    pub sales: SalesSummary,
    pub inventory: InventorySummary,
    pub recent_activity: Vec<ActivityEntry>,
}

/// Headline numbers for the home dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub today: SalesSummary,
    pub inventory: InventorySummary,
    pub out_of_stock_count: i64,
    pub active_users: i64,
    pub locations: i64,
}

const RECENT_ACTIVITY_SQL: &str = r#"
    SELECT kind, created_at, description, location, amount_cents FROM (
        SELECT
            'sale' AS kind,
            s.created_at AS created_at,
            'Sale recorded - ' || (SELECT COUNT(*) FROM sale_items si WHERE si.sale_id = s.id) || ' items' AS description,
            l.name AS location,
            s.total_amount_cents AS amount_cents
        FROM sales s
        LEFT JOIN locations l ON s.location_id = l.id
        ORDER BY s.created_at DESC
        LIMIT 5
    )
    UNION ALL
    SELECT kind, created_at, description, location, amount_cents FROM (
        SELECT
            'inventory' AS kind,
            it.created_at AS created_at,
            it.transaction_type || ' - ' || COALESCE(p.name, 'Unknown product') || ' (' || it.quantity || ' units)' AS description,
            l.name AS location,
            NULL AS amount_cents
        FROM inventory_transactions it
        LEFT JOIN products p ON it.product_id = p.id
        LEFT JOIN locations l ON p.location_id = l.id
        ORDER BY it.created_at DESC
        LIMIT 5
    )
    ORDER BY created_at DESC
    LIMIT 10
"#;

/// Repository for dashboard aggregates.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Builds the period report as of `now`.
    pub async fn period_report(&self, period: ReportPeriod, now: DateTime<Utc>) -> DbResult<PeriodReport> {
        let since = period.window_start(now);
        debug!(period = %period, since = %since, "Building period report");

        Ok(PeriodReport {
            period,
            since,
            sales: self.sales_since(since).await?,
            inventory: self.inventory_summary().await?,
            recent_activity: self.recent_activity().await?,
        })
    }

    /// Builds the home dashboard as of `now`.
    pub async fn dashboard_stats(&self, now: DateTime<Utc>) -> DbResult<DashboardStats> {
        let today = self.sales_since(ReportPeriod::Today.window_start(now)).await?;
        let inventory = self.inventory_summary().await?;

        let out_of_stock_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE status = 'active' AND stock_quantity = 0",
        )
        .fetch_one(&self.pool)
        .await?;

        let active_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;

        let locations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&self.pool)
            .await?;

        Ok(DashboardStats {
            today,
            inventory,
            out_of_stock_count,
            active_users,
            locations,
        })
    }

    async fn sales_since(&self, since: DateTime<Utc>) -> DbResult<SalesSummary> {
        let (transactions, revenue_cents): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total_amount_cents), 0) FROM sales WHERE created_at >= ?1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let items_sold: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(si.quantity), 0)
            FROM sale_items si
            JOIN sales s ON si.sale_id = s.id
            WHERE s.created_at >= ?1
            "#,
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesSummary {
            revenue_cents,
            transactions,
            items_sold,
        })
    }

    async fn inventory_summary(&self) -> DbResult<InventorySummary> {
        let (total_products, low_stock_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN stock_quantity <= low_stock_threshold THEN 1 ELSE 0 END), 0)
            FROM products
            WHERE status = 'active'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(InventorySummary {
            low_stock_count,
            total_products,
        })
    }

    async fn recent_activity(&self) -> DbResult<Vec<ActivityEntry>> {
        let entries = sqlx::query_as::<_, ActivityEntry>(RECENT_ACTIVITY_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::user::NewUser;
    use crate::{Database, DbConfig};
    use buttery_core::stock::SaleDraft;
    use buttery_core::{NewInventoryTransaction, NewProduct, NewSaleLine, PaymentMethod, Role, TransactionType};

    const MAIN_CAMPUS: &str = "6f0c2a9e-6b7d-4c1e-9a2f-1d5e8b7c4a01";

    #[tokio::test]
    async fn test_empty_database_report() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let report = db.reports().period_report(ReportPeriod::Today, Utc::now()).await.unwrap();

        assert_eq!(report.sales, SalesSummary::default());
        assert_eq!(report.inventory, InventorySummary::default());
        assert!(report.recent_activity.is_empty());
    }

    #[tokio::test]
    async fn test_report_after_sale_and_restock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vendor = db
            .users()
            .create(&NewUser {
                name: "Vendor".to_string(),
                email: "vendor@buttery.ng".to_string(),
                phone: "08011111111".to_string(),
                password: "password123".to_string(),
                role: Role::Admin,
                location_id: None,
            })
            .await
            .unwrap();
        let water = db
            .products()
            .create(&NewProduct {
                name: "Water".to_string(),
                category_id: None,
                price_cents: 100,
                stock_quantity: 12,
                low_stock_threshold: Some(5),
                location_id: Some(MAIN_CAMPUS.to_string()),
            })
            .await
            .unwrap();

        let draft = SaleDraft::from_lines(&[NewSaleLine {
            product_id: water.id.clone(),
            quantity: 10,
            unit_price_cents: 100,
        }])
        .unwrap();
        db.sales()
            .record_sale(&vendor.id, MAIN_CAMPUS, PaymentMethod::Cash, &draft)
            .await
            .unwrap();
        db.inventory()
            .record_transaction(
                &NewInventoryTransaction {
                    product_id: water.id.clone(),
                    transaction_type: TransactionType::In,
                    quantity: 1,
                    reason: None,
                },
                &vendor.id,
            )
            .await
            .unwrap();

        let report = db.reports().period_report(ReportPeriod::Month, Utc::now()).await.unwrap();
        assert_eq!(
            report.sales,
            SalesSummary {
                revenue_cents: 1000,
                transactions: 1,
                items_sold: 10
            }
        );
        // 3 left, threshold 5
        assert_eq!(report.inventory.low_stock_count, 1);
        assert_eq!(report.inventory.total_products, 1);

        // one sale + its OUT movement + the IN movement
        assert_eq!(report.recent_activity.len(), 3);
        let sale_entry = report.recent_activity.iter().find(|a| a.kind == "sale").unwrap();
        assert_eq!(sale_entry.description, "Sale recorded - 1 items");
        assert_eq!(sale_entry.amount_cents, Some(1000));
        assert_eq!(sale_entry.location.as_deref(), Some("Main Campus"));
        assert!(report
            .recent_activity
            .iter()
            .any(|a| a.description == "IN - Water (1 units)" && a.amount_cents.is_none()));

        let stats = db.reports().dashboard_stats(Utc::now()).await.unwrap();
        assert_eq!(stats.today.transactions, 1);
        assert_eq!(stats.active_users, 1);
        assert_eq!(stats.locations, 3);
        assert_eq!(stats.out_of_stock_count, 0);
    }

    #[tokio::test]
    async fn test_sales_outside_window_excluded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let far_future = Utc::now() + chrono::Duration::days(400);

        let report = db.reports().period_report(ReportPeriod::Today, far_future).await.unwrap();
        assert_eq!(report.sales.transactions, 0);
    }
}
