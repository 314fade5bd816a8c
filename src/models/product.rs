// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    common::validation::{check_optional, validate_not_blank, validate_not_negative, validate_recipe_quantity},
    models::ingredient::UnitOfMeasure,
};

// --- Produto (item do cardápio) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "nome")]
    #[schema(example = "TEMAKI SALMÃO")]
    pub name: String,
    #[serde(rename = "preco")]
    #[schema(example = 34.90)]
    pub price: Decimal,
    #[serde(rename = "precoPromocional")]
    pub promo_price: Option<Decimal>,
    #[serde(rename = "categoria")]
    #[schema(example = "TEMAKIS")]
    pub category: String,
    #[serde(rename = "criadoEm")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "atualizadoEm")]
    pub updated_at: DateTime<Utc>,
}

// --- Ficha Técnica ---
// Uma linha da receita: quanto de cada insumo uma unidade do produto consome.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RecipeEntry {
    pub id: i32,
    #[serde(rename = "produtoId")]
    pub product_id: i32,
    #[serde(rename = "insumoId")]
    pub ingredient_id: i32,
    #[serde(rename = "quantidade")]
    #[schema(example = 0.1)]
    pub quantity: Decimal,
    #[serde(rename = "medida")]
    pub unit: UnitOfMeasure,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "fichaTecnica")]
    pub recipe: Vec<RecipeEntry>,
}

/// Linha de receita usada no cálculo de baixa de estoque.
///
/// A `medida` da ficha é só informativa: a quantidade é aplicada ao estoque
/// como está, sem conversão para a unidade do insumo.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RecipeLine {
    pub product_id: i32,
    pub ingredient_id: i32,
    pub quantity: Decimal,
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecipeEntryPayload {
    #[serde(rename = "insumoId")]
    pub ingredient_id: i32,

    #[serde(rename = "quantidade")]
    #[validate(custom(function = "validate_recipe_quantity"))]
    #[schema(example = 0.1)]
    pub quantity: Decimal,

    // Aceita "medida" (atual) ou "unidade" (formato antigo); sem nenhum dos dois, "un".
    #[serde(rename = "medida", alias = "unidade", default)]
    pub unit: UnitOfMeasure,
}

// Usado tanto na criação quanto na edição: a ficha técnica sempre chega inteira.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    #[serde(rename = "nome")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "TEMAKI SALMÃO")]
    pub name: String,

    #[serde(rename = "preco")]
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = 34.90)]
    pub price: Decimal,

    #[serde(rename = "precoPromocional")]
    pub promo_price: Option<Decimal>,

    #[serde(rename = "categoria", default)]
    pub category: String,

    #[serde(rename = "fichaTecnica", default)]
    #[validate(nested)]
    pub recipe: Vec<RecipeEntryPayload>,
}

impl ProductPayload {
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        check_optional(&mut errors, "promo_price", self.promo_price.as_ref(), validate_not_negative);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// O front manda 0 quando não há promoção.
    pub fn effective_promo_price(&self) -> Option<Decimal> {
        self.promo_price.filter(|p| !p.is_zero())
    }
}
