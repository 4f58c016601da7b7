//! Locations and categories: small reference tables with unique names.

use buttery_core::{Category, Location};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::new_id;
use crate::error::DbResult;

/// Repository for butteries (physical outlets).
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: SqlitePool,
}

impl LocationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LocationRepository { pool }
    }

    /// Lists all locations by name.
    pub async fn list(&self) -> DbResult<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(
            "SELECT id, name, description, created_at FROM locations ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(locations)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(
            "SELECT id, name, description, created_at FROM locations WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(location)
    }

    /// Creates a location; a duplicate name yields `UniqueViolation`.
    pub async fn create(&self, name: &str, description: Option<&str>) -> DbResult<Location> {
        let location = Location {
            id: new_id(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %location.id, name = %location.name, "Creating location");

        sqlx::query("INSERT INTO locations (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&location.id)
            .bind(&location.name)
            .bind(&location.description)
            .bind(location.created_at)
            .execute(&self.pool)
            .await?;

        Ok(location)
    }
}

/// Repository for product categories.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories by name.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Creates a category; a duplicate name yields `UniqueViolation`.
    pub async fn create(&self, name: &str, description: Option<&str>) -> DbResult<Category> {
        let category = Category {
            id: new_id(),
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %category.id, name = %category.name, "Creating category");

        sqlx::query("INSERT INTO categories (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.description)
            .bind(category.created_at)
            .execute(&self.pool)
            .await?;

        Ok(category)
    }
}
