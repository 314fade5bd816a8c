// src/handlers/products.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
    },
    config::AppState,
    handlers::MessageResponse,
    models::product::{ProductDetail, ProductPayload},
};

// GET /api/produtos
#[utoipa::path(
    get,
    path = "/api/produtos",
    tag = "Produtos",
    responses(
        (status = 200, description = "Cardápio com as fichas técnicas", body = Vec<ProductDetail>)
    )
)]
pub async fn list_products(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(products)))
}

// GET /api/produtos/{id}
#[utoipa::path(
    get,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, body = ProductDetail),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(product)))
}

// POST /api/produtos
#[utoipa::path(
    post,
    path = "/api/produtos",
    tag = "Produtos",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado com a ficha técnica", body = ProductDetail),
        (status = 400, description = "Dados inválidos ou nome duplicado"),
        (status = 404, description = "Insumo da ficha técnica não encontrado")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate_all()?;

    let product = app_state.product_service.create(&app_state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /api/produtos/{id}
// A ficha técnica enviada substitui a anterior por completo.
#[utoipa::path(
    put,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = ProductDetail),
        (status = 400, description = "Dados inválidos ou nome duplicado"),
        (status = 404, description = "Produto ou insumo não encontrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate_all()?;

    let product = app_state
        .product_service
        .update(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/produtos/{id}
#[utoipa::path(
    delete,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    params(("id" = i32, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto e ficha técnica removidos", body = MessageResponse),
        (status = 400, description = "Produto presente em pedidos"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("Produto deletado"))))
}
