// src/db/ingredient_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{
    common::{db_utils::is_unique_violation, error::AppError},
    models::ingredient::{
        CreateIngredientPayload, Ingredient, IngredientCategory, UpdateIngredientPayload,
    },
};

const INGREDIENT_COLUMNS: &str =
    "id, name, category, unit, stock, min_stock, unit_cost, created_at, updated_at";

// O repositório de insumos: todo acesso à tabela 'ingredients' passa por aqui.
#[derive(Clone, Default)]
pub struct IngredientRepository;

impl IngredientRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    pub async fn list<'e, E>(
        &self,
        executor: E,
        category: Option<&str>,
    ) -> Result<Vec<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, Ingredient>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients
             WHERE ($1::text IS NULL OR category = $1)
             ORDER BY id ASC"
        ))
        .bind(category)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<IngredientCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, IngredientCategory>(
            "SELECT category, COUNT(*) AS total FROM ingredients GROUP BY category ORDER BY category ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(categories)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Ingredient>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    /// Busca por nome sem diferenciar maiúsculas, ignorando opcionalmente o próprio registro.
    pub async fn find_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
        excluding_id: Option<i32>,
    ) -> Result<Option<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, Ingredient>(&format!(
            "SELECT {INGREDIENT_COLUMNS} FROM ingredients
             WHERE LOWER(name) = LOWER($1) AND ($2::int IS NULL OR id <> $2)
             LIMIT 1"
        ))
        .bind(name)
        .bind(excluding_id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn existing_ids<'e, E>(&self, executor: E, ids: &[i32]) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found: Vec<i32> = sqlx::query_scalar("SELECT id FROM ingredients WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(found)
    }

    pub async fn ids_by_category<'e, E>(&self, executor: E, category: &str) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<i32> = sqlx::query_scalar("SELECT id FROM ingredients WHERE category = $1")
            .bind(category)
            .fetch_all(executor)
            .await?;
        Ok(ids)
    }

    // ---
    // Escrita (pode rodar dentro de uma transação)
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        payload: &CreateIngredientPayload,
    ) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ingredient>(&format!(
            "INSERT INTO ingredients (name, category, unit, stock, min_stock, unit_cost)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {INGREDIENT_COLUMNS}"
        ))
        .bind(name)
        .bind(payload.category.trim())
        .bind(payload.unit)
        .bind(payload.stock)
        .bind(payload.min_stock)
        .bind(payload.unit_cost)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // O índice único em LOWER(name) é a última barreira contra duplicidade.
            if is_unique_violation(&e) {
                return AppError::IngredientAlreadyExists(name.to_string());
            }
            e.into()
        })
    }

    /// Atualiza só os campos presentes (COALESCE mantém o valor atual).
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        name: Option<&str>,
        changes: &UpdateIngredientPayload,
    ) -> Result<Option<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ingredient>(&format!(
            "UPDATE ingredients SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                unit = COALESCE($4, unit),
                stock = COALESCE($5, stock),
                min_stock = COALESCE($6, min_stock),
                unit_cost = COALESCE($7, unit_cost),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {INGREDIENT_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(changes.category.as_deref().map(str::trim))
        .bind(changes.unit)
        .bind(changes.stock)
        .bind(changes.min_stock)
        .bind(changes.unit_cost)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::IngredientAlreadyExists(name.unwrap_or_default().to_string());
            }
            e.into()
        })
    }

    /// Soma `delta` ao estoque de forma atômica (o próprio UPDATE lê e grava a linha).
    /// Devolve o novo saldo, ou None se o insumo não existe.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        id: i32,
        delta: Decimal,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stock: Option<Decimal> = sqlx::query_scalar(
            "UPDATE ingredients SET stock = stock + $2, updated_at = NOW() WHERE id = $1 RETURNING stock",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;
        Ok(stock)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_many<'e, E>(&self, executor: E, ids: &[i32]) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM ingredients WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
