use serde::Serialize;
use utoipa::ToSchema;

pub mod customers;
pub mod dashboard;
pub mod health;
pub mod ingredients;
pub mod orders;
pub mod products;

// Resposta das exclusões: { "message": "..." }
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Insumo deletado")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
