pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod ingredient_repo;
pub use ingredient_repo::IngredientRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
