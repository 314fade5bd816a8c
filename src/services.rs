pub mod customer_service;
pub mod dashboard_service;
pub mod ingredient_service;
pub mod order_service;
pub mod product_service;
pub mod stock_plan;
