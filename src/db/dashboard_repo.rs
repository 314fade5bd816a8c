// src/db/dashboard_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Postgres};

use crate::{
    common::error::AppError,
    models::{
        dashboard::{ChannelTotals, HourlyOrders, LowStockItem, OrderSnapshot, RecentSale},
        order::OrderStatus,
    },
};

// Leituras para o dashboard. Somas e contagens saem prontas do banco;
// o DashboardService só monta a resposta.
#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    /// Pedidos criados a partir de `since`, em ordem cronológica.
    pub async fn orders_since<'e, E>(
        &self,
        executor: E,
        since: DateTime<Utc>,
    ) -> Result<Vec<OrderSnapshot>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, OrderSnapshot>(
            r#"
            SELECT id, channel, status, total, created_at
            FROM orders
            WHERE created_at >= $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_status<'e, E>(&self, executor: E, status: OrderStatus) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = $1")
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    /// Faturamento e pedidos por canal, sem os cancelados. Canais sem venda não aparecem.
    pub async fn revenue_by_channel<'e, E>(&self, executor: E) -> Result<Vec<ChannelTotals>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ChannelTotals>(
            r#"
            SELECT channel, SUM(total) AS revenue, COUNT(*) AS orders
            FROM orders
            WHERE status <> 'Cancelado'
            GROUP BY channel
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// As últimas `limit` vendas (sem cancelados), da mais antiga para a mais nova.
    pub async fn recent_sales<'e, E>(&self, executor: E, limit: i64) -> Result<Vec<RecentSale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RecentSale>(
            r#"
            SELECT order_id, total
            FROM (
                SELECT id AS order_id, total, created_at
                FROM orders
                WHERE status <> 'Cancelado'
                ORDER BY created_at DESC, id DESC
                LIMIT $1
            ) recent
            ORDER BY created_at ASC, order_id ASC
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Pedidos ativos por hora do dia. `utc_offset_secs` desloca o relógio para o fuso local.
    pub async fn orders_per_hour<'e, E>(
        &self,
        executor: E,
        utc_offset_secs: i32,
    ) -> Result<Vec<HourlyOrders>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, HourlyOrders>(
            r#"
            SELECT EXTRACT(HOUR FROM (created_at AT TIME ZONE 'UTC') + make_interval(secs => $1))::int AS hour,
                   COUNT(*) AS orders
            FROM orders
            WHERE status <> 'Cancelado'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(f64::from(utc_offset_secs))
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn low_stock_count<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients WHERE stock <= min_stock")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    /// Os insumos mais críticos primeiro (maior falta em relação ao mínimo).
    pub async fn low_stock_items<'e, E>(&self, executor: E, limit: i64) -> Result<Vec<LowStockItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, LowStockItem>(
            r#"
            SELECT id, name, unit, stock, min_stock
            FROM ingredients
            WHERE stock <= min_stock
            ORDER BY (min_stock - stock) DESC, id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
