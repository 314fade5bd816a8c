// src/models/order.rs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    error::AppError,
    validation::{validate_not_blank, validate_not_negative},
};

// --- Enums ---

// Canal de origem do pedido (CREATE TYPE order_channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_channel")]
pub enum OrderChannel {
    #[sqlx(rename = "iFood")]
    #[serde(rename = "iFood")]
    IFood,
    WhatsApp,
    OlaClick,
    Local,
}

impl OrderChannel {
    pub const ALL: [OrderChannel; 4] = [
        OrderChannel::IFood,
        OrderChannel::WhatsApp,
        OrderChannel::OlaClick,
        OrderChannel::Local,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderChannel::IFood => "iFood",
            OrderChannel::WhatsApp => "WhatsApp",
            OrderChannel::OlaClick => "OlaClick",
            OrderChannel::Local => "Local",
        }
    }
}

// Etapas do kanban de pedidos (CREATE TYPE order_status)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    #[sqlx(rename = "Novo")]
    #[serde(rename = "Novo")]
    New,
    #[sqlx(rename = "Em Preparo")]
    #[serde(rename = "Em Preparo")]
    Preparing,
    #[sqlx(rename = "Saiu para Entrega")]
    #[serde(rename = "Saiu para Entrega")]
    OutForDelivery,
    #[sqlx(rename = "Entregue")]
    #[serde(rename = "Entregue")]
    Delivered,
    #[sqlx(rename = "Cancelado")]
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::New,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "Novo",
            OrderStatus::Preparing => "Em Preparo",
            OrderStatus::OutForDelivery => "Saiu para Entrega",
            OrderStatus::Delivered => "Entregue",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Próxima etapa do fluxo normal (Novo -> Em Preparo -> Saiu para Entrega -> Entregue).
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Só avança uma etapa por vez; "Cancelado" vale a partir de qualquer etapa não final.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == OrderStatus::Cancelled || self.next() == Some(target)
    }

    pub fn transition_to(self, target: OrderStatus) -> Result<OrderStatus, AppError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(AppError::InvalidStatusTransition { from: self, to: target })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or_else(|| AppError::UnknownOrderStatus(value.to_string()))
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    #[schema(example = 1024)]
    pub id: i32,
    #[serde(rename = "cliente")]
    #[schema(example = "Maria")]
    pub customer_name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    #[serde(rename = "canal")]
    pub channel: OrderChannel,
    pub status: OrderStatus,
    #[serde(rename = "valor")]
    #[schema(example = 104.70)]
    pub total: Decimal,
    #[serde(rename = "dataHora")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizadoEm")]
    pub updated_at: DateTime<Utc>,
}

// Item do pedido já com o nome do produto (JOIN), como o kanban exibe.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: i32,
    #[serde(rename = "pedidoId")]
    pub order_id: i32,
    #[serde(rename = "produtoId")]
    pub product_id: i32,
    #[serde(rename = "quantidade")]
    #[schema(example = 3)]
    pub quantity: i32,
    #[serde(rename = "nomeProduto")]
    pub product_name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    #[serde(rename = "itens")]
    pub items: Vec<OrderItem>,
}

/// Par (produto, quantidade) usado para calcular a movimentação de estoque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: i32,
    pub quantity: i32,
}

impl From<&OrderItem> for OrderLine {
    fn from(item: &OrderItem) -> Self {
        OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemPayload {
    #[serde(rename = "produtoId")]
    pub product_id: i32,

    #[serde(rename = "quantidade")]
    #[validate(range(min = 1, max = 1000, message = "A quantidade deve ficar entre 1 e 1000."))]
    #[schema(example = 3)]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrderPayload {
    #[serde(rename = "cliente")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Maria")]
    pub customer_name: String,

    #[serde(rename = "telefone", default)]
    pub phone: String,

    #[serde(rename = "canal")]
    pub channel: OrderChannel,

    // Total calculado pelo front (soma dos itens); gravado como veio.
    #[serde(rename = "valor")]
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 104.70)]
    pub total: Decimal,

    #[serde(rename = "itens")]
    #[validate(length(min = 1, message = "O pedido precisa de pelo menos um item."), nested)]
    pub items: Vec<OrderItemPayload>,
}

impl CreateOrderPayload {
    pub fn lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect()
    }
}

// O status chega como texto para que um valor desconhecido vire 400 com mensagem própria.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateOrderStatusPayload {
    #[schema(example = "Em Preparo")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteOrderQuery {
    /// Devolve ao estoque os insumos consumidos pelo pedido (só o texto "true" liga)
    #[serde(default, deserialize_with = "only_literal_true")]
    pub devolver_estoque: bool,
}

// Qualquer valor diferente de "true" conta como false, em vez de virar 400.
fn only_literal_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_sequence_is_allowed_one_step_at_a_time() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn skipping_or_going_back_is_rejected() {
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::Preparing));
    }

    #[test]
    fn cancel_is_reachable_from_every_open_stage() {
        for status in [OrderStatus::New, OrderStatus::Preparing, OrderStatus::OutForDelivery] {
            assert!(status.can_transition_to(OrderStatus::Cancelled), "{status}");
        }
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for target in OrderStatus::ALL {
            assert!(!OrderStatus::Delivered.can_transition_to(target));
            assert!(!OrderStatus::Cancelled.can_transition_to(target));
        }
    }

    #[test]
    fn transition_error_carries_both_states() {
        let err = OrderStatus::Cancelled.transition_to(OrderStatus::New).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidStatusTransition { from: OrderStatus::Cancelled, to: OrderStatus::New }
        ));
    }

    #[test]
    fn parses_the_kanban_labels() {
        assert_eq!("Saiu para Entrega".parse::<OrderStatus>().unwrap(), OrderStatus::OutForDelivery);
        assert_eq!(" Novo ".parse::<OrderStatus>().unwrap(), OrderStatus::New);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "Pronto".parse::<OrderStatus>().unwrap_err();
        assert!(matches!(err, AppError::UnknownOrderStatus(ref s) if s == "Pronto"));
    }

    #[test]
    fn order_payload_requires_items_with_positive_quantities() {
        let payload: CreateOrderPayload = serde_json::from_str(
            r#"{ "cliente": "Ana", "canal": "WhatsApp", "valor": 10, "itens": [] }"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());

        let payload: CreateOrderPayload = serde_json::from_str(
            r#"{ "cliente": "Ana", "canal": "WhatsApp", "valor": 10,
                 "itens": [{ "produtoId": 1, "quantidade": 0, "nomeProduto": "Temaki" }] }"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn item_quantity_has_an_upper_bound() {
        let payload: CreateOrderPayload = serde_json::from_str(
            r#"{ "cliente": "Ana", "canal": "Local", "valor": 10,
                 "itens": [{ "produtoId": 1, "quantidade": 2000000000 }] }"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());

        let payload: CreateOrderPayload = serde_json::from_str(
            r#"{ "cliente": "Ana", "canal": "Local", "valor": 10,
                 "itens": [{ "produtoId": 1, "quantidade": 1000 }] }"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
    }

    fn delete_query(uri: &str) -> DeleteOrderQuery {
        let uri: axum::http::Uri = uri.parse().unwrap();
        axum::extract::Query::<DeleteOrderQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn restock_flag_is_only_set_by_literal_true() {
        assert!(delete_query("/api/pedidos/1?devolverEstoque=true").devolver_estoque);
        assert!(!delete_query("/api/pedidos/1?devolverEstoque=false").devolver_estoque);
        assert!(!delete_query("/api/pedidos/1?devolverEstoque=abc").devolver_estoque);
        assert!(!delete_query("/api/pedidos/1?devolverEstoque=TRUE").devolver_estoque);
        assert!(!delete_query("/api/pedidos/1").devolver_estoque);
    }

    #[test]
    fn order_payload_maps_to_lines() {
        let payload: CreateOrderPayload = serde_json::from_str(
            r#"{ "cliente": "Ana", "telefone": "119", "canal": "iFood", "valor": 104.7,
                 "itens": [{ "produtoId": 7, "quantidade": 3 }] }"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.lines(), vec![OrderLine { product_id: 7, quantity: 3 }]);
    }

    #[test]
    fn unknown_channel_fails_to_deserialize() {
        let result = serde_json::from_str::<CreateOrderPayload>(
            r#"{ "cliente": "Ana", "canal": "Telefone", "valor": 1, "itens": [] }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn statuses_serialize_with_their_labels() {
        assert_eq!(serde_json::to_string(&OrderStatus::Preparing).unwrap(), "\"Em Preparo\"");
        assert_eq!(serde_json::to_string(&OrderChannel::IFood).unwrap(), "\"iFood\"");
    }
}
