// src/services/ingredient_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{IngredientRepository, ProductRepository},
    models::ingredient::{
        CreateIngredientPayload, Ingredient, IngredientCategory, UpdateIngredientPayload,
    },
};

#[derive(Clone)]
pub struct IngredientService {
    repo: IngredientRepository,
    product_repo: ProductRepository,
}

impl IngredientService {
    pub fn new(repo: IngredientRepository, product_repo: ProductRepository) -> Self {
        Self { repo, product_repo }
    }

    pub async fn list<'e, E>(&self, executor: E, category: Option<&str>) -> Result<Vec<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // "?categoria=" vazio equivale a não filtrar.
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        self.repo.list(executor, category).await
    }

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<IngredientCategory>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_categories(executor).await
    }

    pub async fn get<'e, E>(&self, executor: E, id: i32) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::IngredientNotFound(id))
    }

    pub async fn create<'e, E>(&self, executor: E, payload: &CreateIngredientPayload) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let name = payload.name.trim();
        let mut conn = executor.acquire().await?;

        if let Some(existing) = self.repo.find_by_name(&mut *conn, name, None).await? {
            tracing::warn!("Insumo duplicado recusado: {}", existing.name);
            return Err(AppError::IngredientAlreadyExists(existing.name));
        }

        let ingredient = self.repo.create(&mut *conn, name, payload).await?;
        tracing::info!(id = ingredient.id, unit = %ingredient.unit, "Insumo criado: {}", ingredient.name);
        Ok(ingredient)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        changes: &UpdateIngredientPayload,
    ) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let name = changes.name.as_deref().map(str::trim);
        let mut conn = executor.acquire().await?;

        // Renomear exige que o novo nome não pertença a outro insumo.
        if let Some(name) = name {
            if let Some(existing) = self.repo.find_by_name(&mut *conn, name, Some(id)).await? {
                tracing::warn!("Renomeação recusada, nome já usado: {}", existing.name);
                return Err(AppError::IngredientAlreadyExists(existing.name));
            }
        }

        self.repo
            .update(&mut *conn, id, name, changes)
            .await?
            .ok_or(AppError::IngredientNotFound(id))
    }

    /// Apaga o insumo e as linhas de ficha técnica que o usam. Os produtos ficam.
    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let removed_entries = self.product_repo.delete_recipe_for_ingredients(&mut *tx, &[id]).await?;
        let deleted = self.repo.delete(&mut *tx, id).await?;
        if deleted == 0 {
            // O drop da transação desfaz a limpeza das fichas.
            return Err(AppError::IngredientNotFound(id));
        }

        tx.commit().await?;
        tracing::info!(id, removed_entries, "Insumo excluído");
        Ok(())
    }

    /// Exclusão em massa de uma categoria inteira. Devolve quantos insumos saíram.
    pub async fn delete_by_category<'e, E>(&self, executor: E, category: &str) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let ids = self.repo.ids_by_category(&mut *tx, category).await?;
        if ids.is_empty() {
            return Ok(0);
        }

        self.product_repo.delete_recipe_for_ingredients(&mut *tx, &ids).await?;
        let deleted = self.repo.delete_many(&mut *tx, &ids).await?;

        tx.commit().await?;
        tracing::info!(category, deleted, "Categoria de insumos excluída");
        Ok(deleted)
    }
}
