// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Takashi Sushi - Back Office",
        description = "Insumos, cardápio com fichas técnicas, pedidos com baixa de estoque, clientes e dashboard."
    ),
    paths(
        // --- Health ---
        handlers::health::health,

        // --- Insumos ---
        handlers::ingredients::list_ingredients,
        handlers::ingredients::list_categories,
        handlers::ingredients::get_ingredient,
        handlers::ingredients::create_ingredient,
        handlers::ingredients::update_ingredient,
        handlers::ingredients::delete_ingredient,
        handlers::ingredients::delete_category,

        // --- Produtos ---
        handlers::products::list_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Pedidos ---
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::update_order_status,
        handlers::orders::delete_order,

        // --- Clientes ---
        handlers::customers::list_customers,
        handlers::customers::get_customer,
        handlers::customers::create_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_financial,
    ),
    components(
        schemas(
            handlers::MessageResponse,

            // --- Insumos ---
            models::ingredient::UnitOfMeasure,
            models::ingredient::Ingredient,
            models::ingredient::IngredientCategory,
            models::ingredient::CreateIngredientPayload,
            models::ingredient::UpdateIngredientPayload,

            // --- Produtos ---
            models::product::Product,
            models::product::RecipeEntry,
            models::product::ProductDetail,
            models::product::RecipeEntryPayload,
            models::product::ProductPayload,

            // --- Pedidos ---
            models::order::OrderChannel,
            models::order::OrderStatus,
            models::order::Order,
            models::order::OrderItem,
            models::order::OrderDetail,
            models::order::OrderItemPayload,
            models::order::CreateOrderPayload,
            models::order::UpdateOrderStatusPayload,

            // --- Clientes ---
            models::customer::Customer,
            models::customer::CustomerPayload,

            // --- Dashboard ---
            models::dashboard::LowStockItem,
            models::dashboard::DailySummary,
            models::dashboard::FinancialSummary,
            models::dashboard::ChannelRevenue,
            models::dashboard::RecentSale,
            models::dashboard::HourlyOrders,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Insumos", description = "Estoque de insumos"),
        (name = "Produtos", description = "Cardápio e fichas técnicas"),
        (name = "Pedidos", description = "Kanban de pedidos com baixa e estorno de estoque"),
        (name = "Clientes", description = "Cadastro de clientes"),
        (name = "Dashboard", description = "Indicadores do dia e financeiro")
    )
)]
pub struct ApiDoc;
