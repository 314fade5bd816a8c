// src/services/product_service.rs

use std::collections::{HashMap, HashSet};

use sqlx::{Acquire, Executor, PgConnection, Postgres};

use crate::{
    common::error::AppError,
    db::{IngredientRepository, ProductRepository},
    models::product::{Product, ProductDetail, ProductPayload, RecipeEntry, RecipeEntryPayload},
};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    ingredient_repo: IngredientRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository, ingredient_repo: IngredientRepository) -> Self {
        Self { repo, ingredient_repo }
    }

    // --- LEITURA ---

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<ProductDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let products = self.repo.list(&mut *conn).await?;
        let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
        let entries = self.repo.list_recipe_entries(&mut *conn, &ids).await?;

        Ok(attach_recipes(products, entries))
    }

    pub async fn get<'e, E>(&self, executor: E, id: i32) -> Result<ProductDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let product = self
            .repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::ProductNotFound(id))?;
        let recipe = self.repo.list_recipe_entries(&mut *conn, &[id]).await?;

        Ok(ProductDetail { product, recipe })
    }

    // --- ESCRITA ---

    pub async fn create<'e, E>(&self, executor: E, payload: &ProductPayload) -> Result<ProductDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let name = payload.name.trim();
        let mut tx = executor.begin().await?;

        if let Some(existing) = self.repo.find_by_name(&mut *tx, name, None).await? {
            tracing::warn!("Produto duplicado recusado: {}", existing.name);
            return Err(AppError::ProductAlreadyExists(existing.name));
        }
        self.ensure_ingredients_exist(&mut *tx, &payload.recipe).await?;

        let product = self
            .repo
            .create(&mut *tx, name, payload.price, payload.effective_promo_price(), payload.category.trim())
            .await?;
        let recipe = self.insert_recipe(&mut *tx, product.id, &payload.recipe).await?;

        tx.commit().await?;
        tracing::info!(id = product.id, entries = recipe.len(), "Produto criado: {}", product.name);
        Ok(ProductDetail { product, recipe })
    }

    /// Atualiza o produto e troca a ficha técnica inteira (apaga tudo e insere de novo).
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        payload: &ProductPayload,
    ) -> Result<ProductDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let name = payload.name.trim();
        let mut tx = executor.begin().await?;

        if let Some(existing) = self.repo.find_by_name(&mut *tx, name, Some(id)).await? {
            tracing::warn!("Renomeação recusada, produto já existe: {}", existing.name);
            return Err(AppError::ProductAlreadyExists(existing.name));
        }
        self.ensure_ingredients_exist(&mut *tx, &payload.recipe).await?;

        let product = self
            .repo
            .update(&mut *tx, id, name, payload.price, payload.effective_promo_price(), payload.category.trim())
            .await?
            .ok_or(AppError::ProductNotFound(id))?;

        self.repo.delete_recipe_for_product(&mut *tx, id).await?;
        let recipe = self.insert_recipe(&mut *tx, id, &payload.recipe).await?;

        tx.commit().await?;
        tracing::info!(id, entries = recipe.len(), "Produto atualizado");
        Ok(ProductDetail { product, recipe })
    }

    /// Remove o produto e a sua ficha técnica. Os insumos não são tocados.
    pub async fn delete<'e, E>(&self, executor: E, id: i32) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.repo.delete_recipe_for_product(&mut *tx, id).await?;
        let deleted = self.repo.delete(&mut *tx, id).await.inspect_err(|e| {
            if matches!(e, AppError::ProductInUse(_)) {
                tracing::warn!(id, "Exclusão recusada: produto presente em pedidos");
            }
        })?;
        if deleted == 0 {
            return Err(AppError::ProductNotFound(id));
        }

        tx.commit().await?;
        tracing::info!(id, "Produto excluído");
        Ok(())
    }

    // --- AUXILIARES ---

    async fn ensure_ingredients_exist(
        &self,
        conn: &mut PgConnection,
        recipe: &[RecipeEntryPayload],
    ) -> Result<(), AppError> {
        if recipe.is_empty() {
            return Ok(());
        }
        let ids: Vec<i32> = recipe.iter().map(|e| e.ingredient_id).collect();
        let found = self.ingredient_repo.existing_ids(&mut *conn, &ids).await?;
        match first_missing_ingredient(recipe, &found) {
            Some(missing) => Err(AppError::IngredientNotFound(missing)),
            None => Ok(()),
        }
    }

    async fn insert_recipe(
        &self,
        conn: &mut PgConnection,
        product_id: i32,
        recipe: &[RecipeEntryPayload],
    ) -> Result<Vec<RecipeEntry>, AppError> {
        let mut inserted = Vec::with_capacity(recipe.len());
        for (position, entry) in (0_i32..).zip(recipe) {
            let row = self
                .repo
                .insert_recipe_entry(&mut *conn, product_id, position, entry)
                .await?;
            inserted.push(row);
        }
        Ok(inserted)
    }
}

/// Primeiro insumo da ficha que não está entre os encontrados no banco.
pub(crate) fn first_missing_ingredient(recipe: &[RecipeEntryPayload], found: &[i32]) -> Option<i32> {
    let found: HashSet<i32> = found.iter().copied().collect();
    recipe
        .iter()
        .map(|entry| entry.ingredient_id)
        .find(|id| !found.contains(id))
}

/// Junta cada produto com as linhas da sua ficha, mantendo a ordem dos produtos.
pub(crate) fn attach_recipes(products: Vec<Product>, entries: Vec<RecipeEntry>) -> Vec<ProductDetail> {
    let mut by_product: HashMap<i32, Vec<RecipeEntry>> = HashMap::new();
    for entry in entries {
        by_product.entry(entry.product_id).or_default().push(entry);
    }

    products
        .into_iter()
        .map(|product| {
            let recipe = by_product.remove(&product.id).unwrap_or_default();
            ProductDetail { product, recipe }
        })
        .collect()
}
