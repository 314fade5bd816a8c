// src/models/dashboard.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{
    ingredient::UnitOfMeasure,
    order::{OrderChannel, OrderStatus},
};

// Recorte mínimo de um pedido para as agregações.
#[derive(Debug, Clone, FromRow)]
pub struct OrderSnapshot {
    pub id: i32,
    pub channel: OrderChannel,
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

// Faturamento e quantidade de pedidos ativos de um canal, somados no banco.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ChannelTotals {
    pub channel: OrderChannel,
    pub revenue: Decimal,
    pub orders: i64,
}

// Insumo no mínimo ou abaixo dele.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LowStockItem {
    pub id: i32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "unidade")]
    pub unit: UnitOfMeasure,
    #[serde(rename = "estoque")]
    pub stock: Decimal,
    #[serde(rename = "estoqueMinimo")]
    pub min_stock: Decimal,
}

// 1. Visão Geral do Dia (os cards do topo)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub vendas_hoje: Decimal,
    pub pedidos_hoje: i64,
    pub ticket_medio: Decimal,
    // Todos os pedidos em "Novo", de qualquer dia.
    pub pedidos_a_confirmar: i64,
    pub estoque_baixo: i64,
    pub itens_criticos: Vec<LowStockItem>,
}

// 2. Dashboard Financeiro
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub faturamento_total: Decimal,
    pub qtd_pedidos: i64,
    pub ticket_medio: Decimal,
    pub por_canal: Vec<ChannelRevenue>,
    pub vendas_recentes: Vec<RecentSale>,
    pub pedidos_por_hora: Vec<HourlyOrders>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChannelRevenue {
    #[serde(rename = "canal")]
    pub channel: OrderChannel,
    #[serde(rename = "valor")]
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct RecentSale {
    #[serde(rename = "pedidoId")]
    pub order_id: i32,
    #[serde(rename = "valor")]
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct HourlyOrders {
    #[serde(rename = "hora")]
    pub hour: i32,
    #[serde(rename = "pedidos")]
    pub orders: i64,
}
