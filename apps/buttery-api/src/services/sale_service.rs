//! Point-of-sale endpoints.
//!
//! ```text
//! POST /sales
//!   │
//!   ├── role ∈ {admin, vendor}                      403
//!   ├── validate_sale_lines                         400
//!   ├── SaleDraft::from_lines + submitted total     400
//!   ├── location: body, else the vendor's own       400 when neither
//!   └── SaleRepository::record_sale (one transaction)
//!         └── unknown/inactive product              404, nothing written
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use buttery_core::stock::SaleDraft;
use buttery_core::validation::{validate_sale_lines, validate_uuid};
use buttery_core::{NewSale, Role};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::AppState;

/// Page size when `limit` is absent.
pub const DEFAULT_SALES_LIMIT: i64 = 50;

/// Largest accepted `limit`.
pub const MAX_SALES_LIMIT: i64 = 200;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route("/sales/{id}", get(get_sale))
}

#[derive(Debug, Default, Deserialize)]
pub struct SalesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

async fn list_sales(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<SalesQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(DEFAULT_SALES_LIMIT).clamp(1, MAX_SALES_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let sales = state.db.sales().list(limit, offset).await?;
    Ok(Json(json!({ "sales": sales })))
}

async fn get_sale(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let detail = state
        .db
        .sales()
        .get_with_items(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sale not found".to_string()))?;

    Ok(Json(json!({ "sale": detail.sale, "items": detail.items })))
}

async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<NewSale>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth.require_role(&[Role::Admin, Role::Vendor])?;

    validate_sale_lines(&input.items)?;
    let draft = SaleDraft::from_lines(&input.items)?;
    draft.verify_submitted_total(input.total_amount_cents)?;

    let location_id = input
        .location_id
        .filter(|id| !id.trim().is_empty())
        .or_else(|| auth.user.location_id.clone())
        .ok_or_else(|| ApiError::bad_request("location_id is required"))?;
    validate_uuid("location_id", &location_id)?;

    let receipt = state
        .db
        .sales()
        .record_sale(&auth.user.id, &location_id, input.payment_method, &draft)
        .await?;

    info!(
        sale_id = %receipt.sale.id,
        vendor_id = %auth.user.id,
        total = %receipt.sale.total_amount(),
        items = draft.items_sold(),
        "Sale created"
    );

    Ok((StatusCode::CREATED, Json(json!({ "sale": receipt }))))
}
