// src/services/order_service.rs

use std::collections::HashMap;

use sqlx::{Acquire, Executor, PgConnection, Postgres};

use crate::{
    common::error::AppError,
    db::{IngredientRepository, OrderRepository, ProductRepository},
    models::order::{CreateOrderPayload, Order, OrderDetail, OrderItem, OrderLine, OrderStatus},
    services::stock_plan::{self, StockPlan},
};

#[derive(Clone)]
pub struct OrderService {
    repo: OrderRepository,
    product_repo: ProductRepository,
    ingredient_repo: IngredientRepository,
}

impl OrderService {
    pub fn new(
        repo: OrderRepository,
        product_repo: ProductRepository,
        ingredient_repo: IngredientRepository,
    ) -> Self {
        Self {
            repo,
            product_repo,
            ingredient_repo,
        }
    }

    // --- LEITURA ---

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<OrderDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let orders = self.repo.list(&mut *conn).await?;
        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let items = self.repo.list_items(&mut *conn, &ids).await?;

        Ok(attach_items(orders, items))
    }

    pub async fn get<'e, E>(&self, executor: E, id: i32) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let order = self
            .repo
            .find_by_id(&mut *conn, id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;
        let items = self.repo.list_items(&mut *conn, &[id]).await?;

        Ok(OrderDetail { order, items })
    }

    // --- CRIAÇÃO (baixa de estoque) ---

    /// Cria o pedido e dá baixa nos insumos das fichas técnicas, tudo numa transação só.
    pub async fn create<'e, E>(&self, executor: E, payload: &CreateOrderPayload) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let lines = payload.lines();
        let product_ids = stock_plan::product_ids(&lines);

        let mut tx = executor.begin().await?;

        // 1. Todos os produtos precisam existir (e ficam travados contra exclusão).
        let found = self.product_repo.existing_ids_for_share(&mut *tx, &product_ids).await?;
        stock_plan::ensure_products_exist(&lines, &found).inspect_err(|e| {
            tracing::warn!("Pedido recusado: {}", e);
        })?;

        // 2. Fichas técnicas -> baixa de estoque
        let recipes = self.product_repo.recipe_lines(&mut *tx, &product_ids).await?;
        let plan = StockPlan::consumption(&lines, &recipes);
        self.apply_plan(&mut *tx, &plan).await?;

        // 3. O pedido em si
        let order = self
            .repo
            .insert(
                &mut *tx,
                payload.customer_name.trim(),
                payload.phone.trim(),
                payload.channel,
                payload.total,
            )
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item = self
                .repo
                .insert_item(&mut *tx, order.id, line.product_id, line.quantity)
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            channel = order.channel.as_str(),
            ingredients = plan.len(),
            "Pedido criado com baixa de estoque"
        );
        Ok(OrderDetail { order, items })
    }

    // --- STATUS ---

    pub async fn update_status<'e, E>(&self, executor: E, id: i32, status: &str) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let target: OrderStatus = status.parse()?;

        let mut tx = executor.begin().await?;

        let current = self
            .repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        let next = current.status.transition_to(target).inspect_err(|e| {
            tracing::warn!(order_id = id, "Transição recusada: {}", e);
        })?;

        let order = self
            .repo
            .update_status(&mut *tx, id, next)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        tx.commit().await?;

        tracing::info!(order_id = id, from = %current.status, to = %order.status, "Status do pedido alterado");
        Ok(order)
    }

    // --- EXCLUSÃO (estorno opcional) ---

    /// Exclui o pedido. Com `restock`, devolve ao estoque o que as fichas atuais consomem.
    pub async fn delete<'e, E>(&self, executor: E, id: i32, restock: bool) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // A trava garante que um segundo DELETE simultâneo não devolva o estoque de novo.
        self.repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        if restock {
            let items = self.repo.list_items(&mut *tx, &[id]).await?;
            let lines: Vec<OrderLine> = items.iter().map(OrderLine::from).collect();
            let product_ids = stock_plan::product_ids(&lines);

            let recipes = self.product_repo.recipe_lines(&mut *tx, &product_ids).await?;
            let plan = StockPlan::restock(&lines, &recipes);
            self.apply_plan(&mut *tx, &plan).await?;
        }

        self.repo.delete_items(&mut *tx, id).await?;
        self.repo.delete(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(order_id = id, restock, "Pedido excluído");
        Ok(())
    }

    // Aplica os deltas em ordem de id de insumo. Insumo sumido aborta a transação.
    async fn apply_plan(&self, conn: &mut PgConnection, plan: &StockPlan) -> Result<(), AppError> {
        for (ingredient_id, delta) in plan.iter() {
            let stock = self
                .ingredient_repo
                .adjust_stock(&mut *conn, ingredient_id, delta)
                .await?
                .ok_or(AppError::IngredientNotFound(ingredient_id))?;
            tracing::info!(ingredient_id, %delta, %stock, "Estoque ajustado");
        }
        Ok(())
    }
}

/// Junta cada pedido com os seus itens, mantendo a ordem dos pedidos.
pub(crate) fn attach_items(orders: Vec<Order>, items: Vec<OrderItem>) -> Vec<OrderDetail> {
    let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderDetail { order, items }
        })
        .collect()
}
