// src/lib.rs

use axum::{
    http::HeaderValue,
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc};

/// Monta o router completo da API (rotas, swagger, CORS e trace).
pub fn app(app_state: AppState, cors_origin: Option<&str>) -> Router {
    let ingredient_routes = Router::new()
        .route(
            "/",
            get(handlers::ingredients::list_ingredients).post(handlers::ingredients::create_ingredient),
        )
        .route("/categorias", get(handlers::ingredients::list_categories))
        .route("/categoria/{nome}", delete(handlers::ingredients::delete_category))
        .route(
            "/{id}",
            get(handlers::ingredients::get_ingredient)
                .put(handlers::ingredients::update_ingredient)
                .delete(handlers::ingredients::delete_ingredient),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        );

    // PUT /{id} também muda o status: é o que o kanban chama.
    let order_routes = Router::new()
        .route(
            "/",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/{id}",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order_status)
                .delete(handlers::orders::delete_order),
        )
        .route("/{id}/status", put(handlers::orders::update_order_status));

    let customer_routes = Router::new()
        .route(
            "/",
            get(handlers::customers::list_customers).post(handlers::customers::create_customer),
        )
        .route(
            "/{id}",
            get(handlers::customers::get_customer)
                .put(handlers::customers::update_customer)
                .delete(handlers::customers::delete_customer),
        );

    let dashboard_routes = Router::new()
        .route("/resumo", get(handlers::dashboard::get_summary))
        .route("/financeiro", get(handlers::dashboard::get_financial));

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .nest("/api/insumos", ingredient_routes)
        .nest("/api/produtos", product_routes)
        .nest("/api/pedidos", order_routes)
        .nest("/api/clientes", customer_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(app_state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allowed = origin.and_then(|raw| match HeaderValue::from_str(raw.trim()) {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("CORS_ORIGIN inválida ({}), liberando qualquer origem", raw);
            None
        }
    });

    match allowed {
        Some(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    }
}
