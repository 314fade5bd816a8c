// src/models/customer.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::validate_not_blank;

// --- CLIENTE ---
// O endereço fica desnormalizado na própria linha (não há tabela de endereços).
// Não existe chave estrangeira para pedidos: o pedido guarda nome e telefone.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub id: i32,
    #[serde(rename = "nome")]
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[serde(rename = "telefone")]
    #[schema(example = "(11) 98888-7777")]
    pub phone: String,
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(rename = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    #[serde(rename = "estado")]
    pub state: Option<String>,
    #[serde(rename = "cep")]
    #[schema(example = "01001-000")]
    pub postal_code: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizadoEm")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CustomerPayload {
    #[serde(rename = "nome")]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(rename = "telefone", default)]
    pub phone: String,
    #[serde(rename = "logradouro")]
    pub street: Option<String>,
    #[serde(rename = "numero")]
    pub number: Option<String>,
    #[serde(rename = "bairro")]
    pub neighborhood: Option<String>,
    #[serde(rename = "cidade")]
    pub city: Option<String>,
    #[serde(rename = "estado")]
    #[validate(length(max = 2, message = "Use a sigla do estado (ex: SP)."))]
    pub state: Option<String>,
    #[serde(rename = "cep")]
    #[validate(length(max = 9, message = "CEP inválido."))]
    pub postal_code: Option<String>,
    #[serde(rename = "complemento")]
    pub complement: Option<String>,
}

impl CustomerPayload {
    // Campos de endereço vazios ("") viram NULL no banco.
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }
        self.name = self.name.trim().to_string();
        self.phone = self.phone.trim().to_string();
        self.street = blank_to_none(self.street);
        self.number = blank_to_none(self.number);
        self.neighborhood = blank_to_none(self.neighborhood);
        self.city = blank_to_none(self.city);
        self.state = blank_to_none(self.state);
        self.postal_code = blank_to_none(self.postal_code);
        self.complement = blank_to_none(self.complement);
        self
    }
}
