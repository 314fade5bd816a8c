// src/services/dashboard_service.rs

use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{
        dashboard::{
            ChannelRevenue, ChannelTotals, DailySummary, FinancialSummary, HourlyOrders, LowStockItem,
            OrderSnapshot, RecentSale,
        },
        order::{OrderChannel, OrderStatus},
    },
};

// Quantos insumos críticos aparecem no card e quantas vendas no gráfico de recentes.
const CRITICAL_ITEMS_LIMIT: i64 = 5;
const RECENT_SALES_LIMIT: i64 = 7;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    // 1. Resumo do dia
    pub async fn get_summary<'e, E>(&self, executor: E) -> Result<DailySummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Snapshot consistente das leituras
        let mut tx = executor.begin().await?;

        let since = start_of_day(Local::now());
        let orders = self.repo.orders_since(&mut *tx, since).await?;
        let awaiting = self.repo.count_by_status(&mut *tx, OrderStatus::New).await?;
        let low_stock = self.repo.low_stock_count(&mut *tx).await?;
        let critical = self.repo.low_stock_items(&mut *tx, CRITICAL_ITEMS_LIMIT).await?;

        tx.commit().await?;

        Ok(daily_summary(&orders, awaiting, low_stock, critical))
    }

    // 2. Financeiro (todo o histórico, agregado no banco)
    pub async fn get_financial<'e, E>(&self, executor: E) -> Result<FinancialSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let offset = Local::now().offset().local_minus_utc();
        let channels = self.repo.revenue_by_channel(&mut *tx).await?;
        let recent = self.repo.recent_sales(&mut *tx, RECENT_SALES_LIMIT).await?;
        let per_hour = self.repo.orders_per_hour(&mut *tx, offset).await?;

        tx.commit().await?;

        Ok(financial_summary(&channels, recent, per_hour))
    }
}

/// Meia-noite do dia de `now`, no fuso de `now`, convertida para UTC.
pub(crate) fn start_of_day<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Utc> {
    now.date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(now.timezone())
        .earliest()
        .map(|midnight| midnight.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

fn average_ticket(revenue: Decimal, orders: i64) -> Decimal {
    if orders == 0 {
        return Decimal::ZERO;
    }
    (revenue / Decimal::from(orders)).round_dp(2)
}

/// Cards do topo. Pedidos cancelados não contam como venda.
pub(crate) fn daily_summary(
    today: &[OrderSnapshot],
    awaiting: i64,
    low_stock: i64,
    critical: Vec<LowStockItem>,
) -> DailySummary {
    let active: Vec<&OrderSnapshot> = today
        .iter()
        .filter(|o| o.status != OrderStatus::Cancelled)
        .collect();
    let revenue: Decimal = active.iter().map(|o| o.total).sum();
    let orders = active.len() as i64;

    DailySummary {
        vendas_hoje: revenue,
        pedidos_hoje: orders,
        ticket_medio: average_ticket(revenue, orders),
        pedidos_a_confirmar: awaiting,
        estoque_baixo: low_stock,
        itens_criticos: critical,
    }
}

/// Monta o financeiro a partir das somas do banco. Os quatro canais sempre aparecem.
pub(crate) fn financial_summary(
    channels: &[ChannelTotals],
    recent: Vec<RecentSale>,
    per_hour: Vec<HourlyOrders>,
) -> FinancialSummary {
    let revenue: Decimal = channels.iter().map(|c| c.revenue).sum();
    let orders: i64 = channels.iter().map(|c| c.orders).sum();

    let por_canal = OrderChannel::ALL
        .into_iter()
        .map(|channel| ChannelRevenue {
            channel,
            revenue: channels
                .iter()
                .find(|c| c.channel == channel)
                .map_or(Decimal::ZERO, |c| c.revenue),
        })
        .collect();

    FinancialSummary {
        faturamento_total: revenue,
        qtd_pedidos: orders,
        ticket_medio: average_ticket(revenue, orders),
        por_canal,
        vendas_recentes: recent,
        pedidos_por_hora: per_hour,
    }
}
