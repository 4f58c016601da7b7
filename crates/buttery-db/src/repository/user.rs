//! # User Repository
//!
//! Accounts, roles and activation status. Users are never deleted; an admin
//! deactivates them instead, which also ends their sessions (the session
//! extractor reloads the user on every request).

use buttery_core::{Role, Status, User};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::new_id;
use crate::error::{DbError, DbResult};
use crate::password::hash_password;

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, location_id, status, created_at, updated_at";

/// Data for a new account. The password is hashed before storage.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    /// Expected lowercase (see `validate_email`).
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
    pub location_id: Option<String>,
}

/// Admin edit of a user's profile fields.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub location_id: Option<String>,
}

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Creates an active user.
    ///
    /// ## Errors
    /// - `UniqueViolation { field: "email" }` when the email is taken
    /// - `ForeignKeyViolation` for an unknown location
    pub async fn create(&self, new: &NewUser) -> DbResult<User> {
        let now = Utc::now();
        let user = User {
            id: new_id(),
            name: new.name.clone(),
            email: new.email.clone(),
            phone: new.phone.clone(),
            password_hash: hash_password(&new.password)?,
            role: new.role,
            location_id: new.location_id.clone(),
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %user.id, email = %user.email, role = %user.role, "Creating user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, phone, password_hash,
                role, location_id, status, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.location_id)
        .bind(user.status)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Looks a user up by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Lists all users, newest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC");
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    /// Updates profile fields and returns the stored user.
    pub async fn update(&self, id: &str, update: &UserUpdate) -> DbResult<User> {
        debug!(id = %id, "Updating user");

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = ?2,
                email = ?3,
                phone = ?4,
                role = ?5,
                location_id = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(update.role)
        .bind(&update.location_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Sets a user's activation status.
    pub async fn set_status(&self, id: &str, status: Status) -> DbResult<User> {
        debug!(id = %id, status = status.as_str(), "Setting user status");

        let result = sqlx::query("UPDATE users SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;
    use crate::{Database, DbConfig};

    fn vendor(email: &str) -> NewUser {
        NewUser {
            name: "Mercy Okafor".to_string(),
            email: email.to_string(),
            phone: "08012345678".to_string(),
            password: "password123".to_string(),
            role: Role::Vendor,
            location_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.users().create(&vendor("mercy@buttery.ng")).await.unwrap();

        assert_eq!(created.status, Status::Active);
        assert!(verify_password("password123", &created.password_hash));

        let by_email = db.users().get_by_email("MERCY@buttery.ng").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
        assert_eq!(by_email.role, Role::Vendor);

        let by_id = db.users().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "mercy@buttery.ng");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.users().create(&vendor("dup@buttery.ng")).await.unwrap();

        let err = db.users().create(&vendor("dup@buttery.ng")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field } if field == "email"));
    }

    #[tokio::test]
    async fn test_update_and_toggle_status() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db.users().create(&vendor("tunde@buttery.ng")).await.unwrap();

        let updated = db
            .users()
            .update(
                &user.id,
                &UserUpdate {
                    name: "Tunde Bakare".to_string(),
                    email: "tunde@buttery.ng".to_string(),
                    phone: "08099999999".to_string(),
                    role: Role::InventoryManager,
                    location_id: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.role, Role::InventoryManager);
        assert_eq!(updated.name, "Tunde Bakare");

        let inactive = db.users().set_status(&user.id, Status::Inactive).await.unwrap();
        assert_eq!(inactive.status, Status::Inactive);

        let missing = db.users().set_status("nope", Status::Active).await.unwrap_err();
        assert!(matches!(missing, DbError::NotFound { .. }));
    }
}
