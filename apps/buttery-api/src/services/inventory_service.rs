//! Inventory ledger endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use buttery_core::validation::validate_inventory_transaction;
use buttery_core::{NewInventoryTransaction, Role};
use buttery_db::DEFAULT_LEDGER_LIMIT;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::{ValidatedJson, ValidatedQuery};
use crate::AppState;

/// Largest accepted `limit`.
pub const MAX_LEDGER_LIMIT: i64 = 500;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/inventory/transactions",
        get(list_transactions).post(create_transaction),
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub limit: Option<i64>,
    pub product_id: Option<String>,
}

async fn list_transactions(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<LedgerQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(DEFAULT_LEDGER_LIMIT).clamp(1, MAX_LEDGER_LIMIT);
    let product_id = query.product_id.as_deref().filter(|id| !id.is_empty());

    let transactions = state.db.inventory().list_recent(limit, product_id).await?;
    Ok(Json(json!({ "transactions": transactions })))
}

async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<NewInventoryTransaction>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    auth.require_role(&[Role::Admin, Role::InventoryManager])?;
    validate_inventory_transaction(&input)?;

    let transaction = state
        .db
        .inventory()
        .record_transaction(&input, &auth.user.id)
        .await?;

    info!(
        transaction_id = %transaction.id,
        product_id = %transaction.product_id,
        kind = %transaction.transaction_type,
        user_id = %auth.user.id,
        "Inventory transaction created"
    );

    Ok((StatusCode::CREATED, Json(json!({ "transaction": transaction }))))
}
