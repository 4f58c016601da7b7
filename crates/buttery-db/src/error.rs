//! Failures surfaced by the store.
//!
//! sqlx errors are folded into [`DbError`] here so callers can tell a missing
//! row or a constraint hit apart from an outage. The HTTP layer maps each
//! variant to a status code; only constraint and lookup failures reach the
//! client verbatim.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// Lookup by an unknown id, including a sale line or stock movement
    /// naming a product that is absent or deactivated.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Duplicate email, location name or category name. `field` is the column.
    #[error("{field} already exists")]
    UniqueViolation { field: String },

    #[error("Referenced row missing: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Could not open database: {0}")]
    ConnectionFailed(String),

    #[error("Schema migration error: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for a reason other than a constraint.
    #[error("Statement rejected: {0}")]
    QueryFailed(String),

    /// Every pooled connection stayed busy past the acquire timeout.
    #[error("No database connection available")]
    PoolExhausted,

    /// Password hashing or hash parsing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database failure: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound { entity: entity.into(), id: id.into() }
    }
}

/// Constraint failures are recognised from SQLite's message text:
/// `UNIQUE constraint failed: <table>.<column>` and
/// `FOREIGN KEY constraint failed`.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if let Some(target) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    let field = target
                        .split(',')
                        .next()
                        .and_then(|col| col.trim().rsplit('.').next())
                        .unwrap_or("value")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation { message: msg.into() }
                } else {
                    DbError::QueryFailed(msg.into())
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".into()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<argon2::password_hash::Error> for DbError {
    fn from(err: argon2::password_hash::Error) -> Self {
        DbError::PasswordHash(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DbError::not_found("Product", "p-1").to_string(),
            "Product not found: p-1"
        );
        assert_eq!(
            DbError::UniqueViolation {
                field: "email".to_string()
            }
            .to_string(),
            "email already exists"
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
