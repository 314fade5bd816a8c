// src/common/error.rs

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::db_utils::is_out_of_range, models::order::OrderStatus};

// Tipo de erro único da aplicação. Cada handler devolve Result<_, AppError>
// e a conversão para HTTP acontece aqui, em um só lugar.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Já existe um insumo chamado \"{0}\".")]
    IngredientAlreadyExists(String),

    #[error("Já existe um produto chamado \"{0}\".")]
    ProductAlreadyExists(String),

    #[error("Status de pedido desconhecido: \"{0}\".")]
    UnknownOrderStatus(String),

    #[error("Não é possível mudar o pedido de \"{from}\" para \"{to}\".")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("O produto {0} está em pedidos registrados e não pode ser excluído.")]
    ProductInUse(i32),

    #[error("Insumo {0} não encontrado.")]
    IngredientNotFound(i32),

    #[error("Produto {0} não encontrado.")]
    ProductNotFound(i32),

    #[error("Pedido {0} não encontrado.")]
    OrderNotFound(i32),

    #[error("Cliente {0} não encontrado.")]
    CustomerNotFound(i32),

    #[error("Valor fora do limite aceito.")]
    ValueOutOfRange,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::IngredientAlreadyExists(_)
            | AppError::ProductAlreadyExists(_)
            | AppError::UnknownOrderStatus(_)
            | AppError::InvalidStatusTransition { .. }
            | AppError::ProductInUse(_)
            | AppError::ValueOutOfRange => StatusCode::BAD_REQUEST,
            AppError::IngredientNotFound(_)
            | AppError::ProductNotFound(_)
            | AppError::OrderNotFound(_)
            | AppError::CustomerNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Devolve os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            // O erro real só vai para o log, o cliente recebe uma mensagem genérica.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            e => json!({ "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

// Estouro de coluna numérica é erro do cliente; o resto do banco continua 500.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if is_out_of_range(&err) {
            tracing::warn!("Valor recusado pelo banco: {}", err);
            return AppError::ValueOutOfRange;
        }
        AppError::DatabaseError(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("JSON inválido: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(format!("Parâmetros inválidos: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(format!("Parâmetro de rota inválido: {}", rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn duplicate_ingredient_is_a_bad_request_naming_the_duplicate() {
        let (status, body) = body_json(AppError::IngredientAlreadyExists("Salmão".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Já existe um insumo chamado \"Salmão\".");
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = body_json(AppError::OrderNotFound(42)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Pedido 42 não encontrado.");
    }

    #[tokio::test]
    async fn database_errors_hide_the_details() {
        let (status, body) = body_json(AppError::DatabaseError(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Ocorreu um erro inesperado.");
    }

    #[tokio::test]
    async fn out_of_range_values_are_bad_requests() {
        let (status, body) = body_json(AppError::ValueOutOfRange).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Valor fora do limite aceito.");
    }

    #[test]
    fn other_sqlx_errors_stay_database_errors() {
        assert!(matches!(AppError::from(sqlx::Error::RowNotFound), AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn invalid_transition_names_both_states() {
        let err = AppError::InvalidStatusTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Preparing,
        };
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Não é possível mudar o pedido de \"Entregue\" para \"Em Preparo\"."
        );
    }
}
