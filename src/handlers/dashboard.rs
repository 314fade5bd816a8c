// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{DailySummary, FinancialSummary},
};

// GET /api/dashboard/resumo
#[utoipa::path(
    get,
    path = "/api/dashboard/resumo",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Vendas do dia, pedidos a confirmar e estoque crítico", body = DailySummary)
    )
)]
pub async fn get_summary(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.get_summary(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/financeiro
#[utoipa::path(
    get,
    path = "/api/dashboard/financeiro",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Faturamento por canal, vendas recentes e pedidos por hora", body = FinancialSummary)
    )
)]
pub async fn get_financial(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.get_financial(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(summary)))
}
