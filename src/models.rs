pub mod customer;
pub mod dashboard;
pub mod ingredient;
pub mod order;
pub mod product;
