//! Locations and categories.
//!
//! Listing is public so the login and registration screens can offer the
//! location picker; creating requires an admin.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use buttery_core::validation::{validate_label, validate_name, validate_optional_text};
use buttery_core::{NewLabel, Role};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route("/categories", get(list_categories).post(create_category))
}

/// Validates and normalizes a name/description pair.
fn clean_label(input: &NewLabel) -> ApiResult<(String, Option<String>)> {
    validate_label(input)?;
    let name = validate_name("name", &input.name)?;
    let description = validate_optional_text("description", input.description.as_deref())?;
    Ok((name, description))
}

async fn list_locations(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let locations = state.db.locations().list().await?;
    Ok(Json(json!({ "locations": locations })))
}

async fn create_location(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<NewLabel>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth.require_role(&[Role::Admin])?;
    let (name, description) = clean_label(&input)?;

    let location = state.db.locations().create(&name, description.as_deref()).await?;
    info!(location_id = %location.id, name = %location.name, "Location created");

    Ok((StatusCode::CREATED, Json(json!({ "location": location }))))
}

async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let categories = state.db.categories().list().await?;
    Ok(Json(json!({ "categories": categories })))
}

async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<NewLabel>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth.require_role(&[Role::Admin])?;
    let (name, description) = clean_label(&input)?;

    let category = state.db.categories().create(&name, description.as_deref()).await?;
    info!(category_id = %category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(json!({ "category": category }))))
}
