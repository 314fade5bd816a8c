// src/common/db_utils.rs

// Helpers para interpretar os erros do Postgres que sustentam regras de negócio.

/// Violação de índice único (ex: nome de insumo repetido).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Violação de chave estrangeira (ex: apagar um produto que está em pedidos).
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

/// Valor que não cabe na coluna: estouro de NUMERIC (22003) ou CHECK violado (23514).
pub(crate) fn is_out_of_range(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| is_out_of_range_code(&code)),
        _ => false,
    }
}

fn is_out_of_range_code(code: &str) -> bool {
    matches!(code, "22003" | "23514")
}
