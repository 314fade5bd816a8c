// src/handlers/ingredients.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath, AppQuery},
    },
    config::AppState,
    handlers::MessageResponse,
    models::ingredient::{
        CreateIngredientPayload, Ingredient, IngredientCategory, IngredientFilter,
        UpdateIngredientPayload,
    },
};

// GET /api/insumos
#[utoipa::path(
    get,
    path = "/api/insumos",
    tag = "Insumos",
    params(IngredientFilter),
    responses(
        (status = 200, description = "Insumos ordenados por id", body = Vec<Ingredient>)
    )
)]
pub async fn list_ingredients(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<IngredientFilter>,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state
        .ingredient_service
        .list(&app_state.db_pool, filter.categoria.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(items)))
}

// GET /api/insumos/categorias
#[utoipa::path(
    get,
    path = "/api/insumos/categorias",
    tag = "Insumos",
    responses(
        (status = 200, description = "Categorias com a quantidade de insumos", body = Vec<IngredientCategory>)
    )
)]
pub async fn list_categories(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.ingredient_service.list_categories(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(categories)))
}

// GET /api/insumos/{id}
#[utoipa::path(
    get,
    path = "/api/insumos/{id}",
    tag = "Insumos",
    params(("id" = i32, Path, description = "ID do insumo")),
    responses(
        (status = 200, body = Ingredient),
        (status = 404, description = "Insumo não encontrado")
    )
)]
pub async fn get_ingredient(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let item = app_state.ingredient_service.get(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(item)))
}

// POST /api/insumos
#[utoipa::path(
    post,
    path = "/api/insumos",
    tag = "Insumos",
    request_body = CreateIngredientPayload,
    responses(
        (status = 201, description = "Insumo criado", body = Ingredient),
        (status = 400, description = "Dados inválidos ou nome duplicado")
    )
)]
pub async fn create_ingredient(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateIngredientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate_all()?;

    let item = app_state
        .ingredient_service
        .create(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PUT /api/insumos/{id}
#[utoipa::path(
    put,
    path = "/api/insumos/{id}",
    tag = "Insumos",
    params(("id" = i32, Path, description = "ID do insumo")),
    request_body = UpdateIngredientPayload,
    responses(
        (status = 200, description = "Insumo atualizado", body = Ingredient),
        (status = 400, description = "Dados inválidos ou nome duplicado"),
        (status = 404, description = "Insumo não encontrado")
    )
)]
pub async fn update_ingredient(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateIngredientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate_all()?;

    let item = app_state
        .ingredient_service
        .update(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/insumos/{id}
#[utoipa::path(
    delete,
    path = "/api/insumos/{id}",
    tag = "Insumos",
    params(("id" = i32, Path, description = "ID do insumo")),
    responses(
        (status = 200, description = "Insumo e referências nas fichas removidos", body = MessageResponse),
        (status = 404, description = "Insumo não encontrado")
    )
)]
pub async fn delete_ingredient(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    app_state.ingredient_service.delete(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(MessageResponse::new("Insumo deletado"))))
}

// DELETE /api/insumos/categoria/{nome}
#[utoipa::path(
    delete,
    path = "/api/insumos/categoria/{nome}",
    tag = "Insumos",
    params(("nome" = String, Path, description = "Nome exato da categoria")),
    responses(
        (status = 200, description = "Quantidade de insumos removidos", body = MessageResponse)
    )
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    AppPath(category): AppPath<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = app_state
        .ingredient_service
        .delete_by_category(&app_state.db_pool, &category)
        .await?;

    let message = format!("{deleted} insumos da categoria '{category}' foram deletados com sucesso.");
    Ok((StatusCode::OK, Json(MessageResponse::new(message))))
}
