//! Dashboard and report endpoints.

use axum::{extract::State, routing::get, Json, Router};
use buttery_core::report::ReportPeriod;
use buttery_db::{DashboardStats, PeriodReport};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ValidatedQuery;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/reports/dashboard", get(period_report))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    /// `today` (default), `week` or `month`
    pub period: Option<String>,
}

async fn dashboard(State(state): State<AppState>, _auth: AuthUser) -> ApiResult<Json<DashboardStats>> {
    let stats = state.db.reports().dashboard_stats(Utc::now()).await?;
    Ok(Json(stats))
}

async fn period_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ReportQuery>,
) -> ApiResult<Json<PeriodReport>> {
    let period = match query.period.as_deref() {
        None | Some("") => ReportPeriod::default(),
        Some(raw) => raw.parse()?,
    };

    let report = state.db.reports().period_report(period, Utc::now()).await?;
    Ok(Json(report))
}
