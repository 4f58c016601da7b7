//! Login, registration and session endpoints.
//!
//! Both login and registration answer with `{success, user}` and set the
//! `auth-token` cookie; the same token also works as a Bearer header.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use buttery_core::validation::{
    validate_email, validate_name, validate_password, validate_phone, validate_uuid,
};
use buttery_core::{Role, User};
use buttery_db::password::{verify_against_dummy, verify_password};
use buttery_db::{Database, DbError, NewUser};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::auth::{clear_session_cookie, session_cookie, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, alias = "locationId")]
    pub location_id: Option<String>,
}

/// Checks an email/password pair against the stored argon2 hash.
///
/// Unknown email, wrong password and inactive account are indistinguishable
/// to the caller.
pub async fn authenticate(db: &Database, email: &str, password: &str) -> ApiResult<User> {
    let Some(user) = db.users().get_by_email(email).await? else {
        verify_against_dummy(password);
        warn!(email = %email, "Login failed: unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    if !user.is_active() {
        warn!(user_id = %user.id, "Login failed: account inactive");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}

fn session_response(state: &AppState, status: StatusCode, user: &User) -> ApiResult<impl IntoResponse> {
    let token = state.jwt.issue_token(user)?;
    let cookie = session_cookie(&token, state.jwt.lifetime_secs(), state.config.is_production());

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "success": true, "user": user })),
    ))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let user = authenticate(&state.db, &req.email, &req.password).await?;
    info!(user_id = %user.id, role = %user.role, "User logged in");

    session_response(&state, StatusCode::OK, &user)
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if [&req.name, &req.email, &req.phone, &req.password, &req.role]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(ApiError::bad_request("All fields are required"));
    }

    let name = validate_name("name", &req.name)?;
    let email = validate_email(&req.email)?;
    let phone = validate_phone(&req.phone)?;
    validate_password(&req.password)?;
    let role: Role = req.role.parse()?;

    let location_id = match req.location_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {
            validate_uuid("location_id", id)?;
            Some(id.to_string())
        }
        _ => None,
    };

    if state.db.users().get_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    let user = state
        .db
        .users()
        .create(&NewUser {
            name,
            email,
            phone,
            password: req.password,
            role,
            location_id,
        })
        .await
        .map_err(|e| match e {
            DbError::UniqueViolation { .. } => ApiError::bad_request("User already exists"),
            other => other.into(),
        })?;

    info!(user_id = %user.id, role = %user.role, "User registered");

    session_response(&state, StatusCode::CREATED, &user)
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.config.is_production()))],
        Json(json!({ "success": true, "message": "Logged out successfully" })),
    )
}

async fn me(auth: AuthUser) -> Json<serde_json::Value> {
    Json(json!({ "user": auth.user }))
}
