// src/handlers/orders.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath, AppQuery},
    },
    config::AppState,
    handlers::MessageResponse,
    models::order::{CreateOrderPayload, DeleteOrderQuery, Order, OrderDetail, UpdateOrderStatusPayload},
};

// GET /api/pedidos
#[utoipa::path(
    get,
    path = "/api/pedidos",
    tag = "Pedidos",
    responses(
        (status = 200, description = "Pedidos do mais recente ao mais antigo", body = Vec<OrderDetail>)
    )
)]
pub async fn list_orders(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/pedidos/{id}
#[utoipa::path(
    get,
    path = "/api/pedidos/{id}",
    tag = "Pedidos",
    params(("id" = i32, Path, description = "ID do pedido")),
    responses(
        (status = 200, body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(order)))
}

// POST /api/pedidos
#[utoipa::path(
    post,
    path = "/api/pedidos",
    tag = "Pedidos",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado e estoque baixado", body = OrderDetail),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto ou insumo não encontrado; nada foi gravado")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let order = app_state.order_service.create(&app_state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// PUT /api/pedidos/{id}/status  (e PUT /api/pedidos/{id}, usado pelo kanban)
#[utoipa::path(
    put,
    path = "/api/pedidos/{id}/status",
    tag = "Pedidos",
    params(("id" = i32, Path, description = "ID do pedido")),
    request_body = UpdateOrderStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Order),
        (status = 400, description = "Status desconhecido ou transição inválida"),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateOrderStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .update_status(&app_state.db_pool, id, &payload.status)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

// DELETE /api/pedidos/{id}?devolverEstoque=true
#[utoipa::path(
    delete,
    path = "/api/pedidos/{id}",
    tag = "Pedidos",
    params(
        ("id" = i32, Path, description = "ID do pedido"),
        DeleteOrderQuery
    ),
    responses(
        (status = 200, description = "Pedido excluído", body = MessageResponse),
        (status = 404, description = "Pedido não encontrado")
    )
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppQuery(query): AppQuery<DeleteOrderQuery>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .order_service
        .delete(&app_state.db_pool, id, query.devolver_estoque)
        .await?;

    Ok((StatusCode::OK, Json(MessageResponse::new("Pedido deletado com sucesso"))))
}
