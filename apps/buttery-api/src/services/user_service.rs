//! Staff administration. Every endpoint here is admin-only.

use axum::{
    extract::{Path, State},
    routing::{get, patch, put},
    Json, Router,
};
use buttery_core::validation::{validate_email, validate_name, validate_phone, validate_uuid};
use buttery_core::Role;
use buttery_db::UserUpdate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", put(update_user))
        .route("/users/{id}/status", patch(toggle_status))
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    #[serde(default, alias = "locationId")]
    pub location_id: Option<String>,
}

async fn list_users(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Admin])?;

    let users = state.db.users().list().await?;
    Ok(Json(json!({ "users": users })))
}

async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Admin])?;

    let location_id = req.location_id.filter(|l| !l.trim().is_empty());
    if let Some(location) = &location_id {
        validate_uuid("location_id", location)?;
    }

    let update = UserUpdate {
        name: validate_name("name", &req.name)?,
        email: validate_email(&req.email)?,
        phone: validate_phone(&req.phone)?,
        role: req.role,
        location_id,
    };

    let user = state.db.users().update(&id, &update).await?;
    info!(user_id = %user.id, role = %user.role, admin_id = %auth.user.id, "User updated");

    Ok(Json(json!({ "user": user })))
}

/// Flips a user between active and inactive.
async fn toggle_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Admin])?;

    if id == auth.user.id {
        return Err(ApiError::bad_request("You cannot change your own status"));
    }

    let current = state
        .db
        .users()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let user = state.db.users().set_status(&id, current.status.toggled()).await?;
    info!(
        user_id = %user.id,
        status = user.status.as_str(),
        admin_id = %auth.user.id,
        "User status changed"
    );

    Ok(Json(json!({ "user": user })))
}
