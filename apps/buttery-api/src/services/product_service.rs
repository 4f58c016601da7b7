//! Product catalog endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use buttery_core::validation::{validate_name, validate_new_product, validate_product_update};
use buttery_core::{NewProduct, ProductUpdate, Role};
use buttery_db::ProductFilter;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::AppState;

const PRODUCT_EDITORS: &[Role] = &[Role::Admin, Role::InventoryManager];

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub location_id: Option<String>,
    pub category_id: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
}

async fn list_products(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ProductQuery>,
) -> ApiResult<Json<Value>> {
    let filter = ProductFilter {
        location_id: query.location_id.filter(|id| !id.is_empty()),
        category_id: query.category_id.filter(|id| !id.is_empty()),
        low_stock: query.low_stock,
    };

    let products = state.db.products().list(&filter).await?;
    Ok(Json(json!({ "products": products })))
}

async fn get_product(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let product = state
        .db
        .products()
        .get_active(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "product": product })))
}

async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(mut input): ValidatedJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth.require_role(PRODUCT_EDITORS)?;

    validate_new_product(&input)?;
    input.name = validate_name("name", &input.name)?;

    let product = state.db.products().create(&input).await?;
    info!(
        product_id = %product.id,
        name = %product.name,
        user_id = %auth.user.id,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(mut input): ValidatedJson<ProductUpdate>,
) -> ApiResult<Json<Value>> {
    auth.require_role(PRODUCT_EDITORS)?;

    validate_product_update(&input)?;
    input.name = validate_name("name", &input.name)?;

    let product = state.db.products().update(&id, &input).await?;
    info!(product_id = %id, user_id = %auth.user.id, "Product updated");

    Ok(Json(json!({ "product": product })))
}

async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    auth.require_role(&[Role::Admin])?;

    state.db.products().deactivate(&id).await?;
    info!(product_id = %id, user_id = %auth.user.id, "Product deactivated");

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
