// src/common/validation.rs

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors};

// ---
// Validações customizadas usadas pelos payloads
// ---

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

/// Maior quantidade aceita numa linha de ficha técnica.
pub const MAX_RECIPE_QUANTITY: u32 = 100_000;

// As quantidades são NUMERIC(14,4) no banco.
const QUANTITY_SCALE: u32 = 4;

/// Quantidade de ficha técnica: maior que zero, até 4 casas decimais e dentro do limite.
pub fn validate_recipe_quantity(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    if val.normalize().scale() > QUANTITY_SCALE {
        let mut err = ValidationError::new("scale");
        err.add_param("max".into(), &QUANTITY_SCALE);
        err.message = Some("Use no máximo 4 casas decimais.".into());
        return Err(err);
    }
    if *val > Decimal::from(MAX_RECIPE_QUANTITY) {
        let mut err = ValidationError::new("range");
        err.add_param("max".into(), &MAX_RECIPE_QUANTITY);
        err.message = Some(format!("O valor não pode passar de {}.", MAX_RECIPE_QUANTITY).into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("O campo é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

/// Versão para campos opcionais: só valida quando o valor veio no JSON.
pub fn check_optional(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&Decimal>,
    rule: fn(&Decimal) -> Result<(), ValidationError>,
) {
    if let Some(v) = value {
        if let Err(e) = rule(v) {
            errors.add(field, e);
        }
    }
}
