// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{
    common::{
        db_utils::{is_foreign_key_violation, is_unique_violation},
        error::AppError,
    },
    models::product::{Product, RecipeEntry, RecipeEntryPayload, RecipeLine},
};

const PRODUCT_COLUMNS: &str = "id, name, price, promo_price, category, created_at, updated_at";

#[derive(Clone, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name ASC"
        ))
        .fetch_all(executor)
        .await?;
        Ok(products)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    pub async fn find_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
        excluding_id: Option<i32>,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE LOWER(name) = LOWER($1) AND ($2::int IS NULL OR id <> $2)
             LIMIT 1"
        ))
        .bind(name)
        .bind(excluding_id)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }

    /// Quais dos ids informados existem (trava as linhas até o fim da transação).
    pub async fn existing_ids_for_share<'e, E>(&self, executor: E, ids: &[i32]) -> Result<Vec<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let found: Vec<i32> =
            sqlx::query_scalar("SELECT id FROM products WHERE id = ANY($1) FOR SHARE")
                .bind(ids)
                .fetch_all(executor)
                .await?;
        Ok(found)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        price: Decimal,
        promo_price: Option<Decimal>,
        category: &str,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, price, promo_price, category)
             VALUES ($1, $2, $3, $4)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(price)
        .bind(promo_price)
        .bind(category)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::ProductAlreadyExists(name.to_string());
            }
            e.into()
        })
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        name: &str,
        price: Decimal,
        promo_price: Option<Decimal>,
        category: &str,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                name = $2, price = $3, promo_price = $4, category = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(promo_price)
        .bind(category)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::ProductAlreadyExists(name.to_string());
            }
            e.into()
        })
    }

    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                // order_items.product_id é RESTRICT: produto com pedidos não sai.
                if is_foreign_key_violation(&e) {
                    return AppError::ProductInUse(id);
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  FICHA TÉCNICA
    // =========================================================================

    pub async fn list_recipe_entries<'e, E>(
        &self,
        executor: E,
        product_ids: &[i32],
    ) -> Result<Vec<RecipeEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, RecipeEntry>(
            "SELECT id, product_id, ingredient_id, quantity, unit
             FROM recipe_entries
             WHERE product_id = ANY($1)
             ORDER BY product_id ASC, position ASC, id ASC",
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    /// Linhas de receita dos produtos, para o cálculo de estoque.
    pub async fn recipe_lines<'e, E>(
        &self,
        executor: E,
        product_ids: &[i32],
    ) -> Result<Vec<RecipeLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lines = sqlx::query_as::<_, RecipeLine>(
            "SELECT product_id, ingredient_id, quantity
             FROM recipe_entries
             WHERE product_id = ANY($1)
             ORDER BY product_id ASC, position ASC, id ASC",
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(lines)
    }

    pub async fn insert_recipe_entry<'e, E>(
        &self,
        executor: E,
        product_id: i32,
        position: i32,
        entry: &RecipeEntryPayload,
    ) -> Result<RecipeEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RecipeEntry>(
            "INSERT INTO recipe_entries (product_id, ingredient_id, quantity, unit, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, product_id, ingredient_id, quantity, unit",
        )
        .bind(product_id)
        .bind(entry.ingredient_id)
        .bind(entry.quantity)
        .bind(entry.unit)
        .bind(position)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::IngredientNotFound(entry.ingredient_id);
            }
            e.into()
        })
    }

    pub async fn delete_recipe_for_product<'e, E>(&self, executor: E, product_id: i32) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM recipe_entries WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Remove as referências aos insumos que vão ser apagados.
    pub async fn delete_recipe_for_ingredients<'e, E>(
        &self,
        executor: E,
        ingredient_ids: &[i32],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM recipe_entries WHERE ingredient_id = ANY($1)")
            .bind(ingredient_ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

