// src/models/ingredient.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::common::validation::{
    check_optional, validate_not_blank, validate_not_negative,
};

// --- Unidades de Medida ---
// Mapeia o CREATE TYPE unit_of_measure do banco. No JSON usamos o mesmo símbolo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unit_of_measure")]
pub enum UnitOfMeasure {
    #[default]
    #[sqlx(rename = "un")]
    #[serde(rename = "un")]
    Unit,
    #[sqlx(rename = "kg")]
    #[serde(rename = "kg")]
    Kilogram,
    #[sqlx(rename = "g")]
    #[serde(rename = "g")]
    Gram,
    #[sqlx(rename = "L")]
    #[serde(rename = "L")]
    Liter,
    #[sqlx(rename = "ml")]
    #[serde(rename = "ml")]
    Milliliter,
}

impl UnitOfMeasure {
    pub fn symbol(self) -> &'static str {
        match self {
            UnitOfMeasure::Unit => "un",
            UnitOfMeasure::Kilogram => "kg",
            UnitOfMeasure::Gram => "g",
            UnitOfMeasure::Liter => "L",
            UnitOfMeasure::Milliliter => "ml",
        }
    }
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// --- Insumo ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Ingredient {
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "nome")]
    #[schema(example = "Salmão")]
    pub name: String,
    #[serde(rename = "categoria")]
    #[schema(example = "Insumos")]
    pub category: String,
    #[serde(rename = "unidade")]
    pub unit: UnitOfMeasure,
    // Pode ficar negativo: não existe piso para o estoque.
    #[serde(rename = "estoque")]
    #[schema(example = 10.0)]
    pub stock: Decimal,
    #[serde(rename = "estoqueMinimo")]
    #[schema(example = 5.0)]
    pub min_stock: Decimal,
    #[serde(rename = "preco")]
    pub unit_cost: Option<Decimal>,
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizadoEm")]
    pub updated_at: DateTime<Utc>,
}

// Agrupamento usado pela tela de insumos (abas por categoria).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct IngredientCategory {
    #[serde(rename = "categoria")]
    pub category: String,
    pub total: i64,
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateIngredientPayload {
    #[serde(rename = "nome")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Salmão")]
    pub name: String,

    #[serde(rename = "categoria", default)]
    #[schema(example = "Insumos")]
    pub category: String,

    // Se não vier, assume "un"
    #[serde(rename = "unidade", default)]
    pub unit: UnitOfMeasure,

    #[serde(rename = "estoque", default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub stock: Decimal,

    #[serde(rename = "estoqueMinimo", default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub min_stock: Decimal,

    #[serde(rename = "preco")]
    pub unit_cost: Option<Decimal>,
}

impl CreateIngredientPayload {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        check_optional(&mut errors, "unit_cost", self.unit_cost.as_ref(), validate_not_negative);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// Edição campo a campo: só o que vier no JSON é alterado.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateIngredientPayload {
    #[serde(rename = "nome")]
    pub name: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "unidade")]
    pub unit: Option<UnitOfMeasure>,
    // Ajuste direto de estoque (inventário): aceita qualquer valor.
    #[serde(rename = "estoque")]
    pub stock: Option<Decimal>,
    #[serde(rename = "estoqueMinimo")]
    pub min_stock: Option<Decimal>,
    #[serde(rename = "preco")]
    pub unit_cost: Option<Decimal>,
}

impl UpdateIngredientPayload {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            if let Err(e) = validate_not_blank(name) {
                errors.add("name", e);
            }
        }
        check_optional(&mut errors, "min_stock", self.min_stock.as_ref(), validate_not_negative);
        check_optional(&mut errors, "unit_cost", self.unit_cost.as_ref(), validate_not_negative);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientFilter {
    /// Filtra pela categoria exata
    pub categoria: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn create_payload_defaults_to_unit_and_zero_stock() {
        let payload: CreateIngredientPayload =
            serde_json::from_str(r#"{ "nome": "Kani", "categoria": "Insumos" }"#).unwrap();
        assert_eq!(payload.unit, UnitOfMeasure::Unit);
        assert_eq!(payload.stock, Decimal::ZERO);
        assert!(payload.validate_all().is_ok());
    }

    #[test]
    fn create_payload_rejects_blank_name_and_negative_cost() {
        let payload: CreateIngredientPayload =
            serde_json::from_str(r#"{ "nome": "  ", "preco": -2 }"#).unwrap();
        let errors = payload.validate_all().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("unit_cost"));
    }

    #[test]
    fn update_payload_allows_negative_stock_but_not_negative_minimum() {
        let payload: UpdateIngredientPayload =
            serde_json::from_str(r#"{ "estoque": -1.5 }"#).unwrap();
        assert!(payload.validate_all().is_ok());

        let payload: UpdateIngredientPayload =
            serde_json::from_str(r#"{ "estoqueMinimo": -1 }"#).unwrap();
        assert!(payload.validate_all().is_err());
    }

    #[test]
    fn unit_symbols_round_trip_through_json() {
        let json = serde_json::to_string(&UnitOfMeasure::Liter).unwrap();
        assert_eq!(json, "\"L\"");
        let parsed: UnitOfMeasure = serde_json::from_str("\"ml\"").unwrap();
        assert_eq!(parsed, UnitOfMeasure::Milliliter);
    }
}
