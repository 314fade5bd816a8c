// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CustomerRepository, DashboardRepository, IngredientRepository, OrderRepository, ProductRepository},
    services::{
        customer_service::CustomerService, dashboard_service::DashboardService,
        ingredient_service::IngredientService, order_service::OrderService,
        product_service::ProductService,
    },
};

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

// Configuração lida do ambiente (.env é carregado antes, no main)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    /// Origem liberada no CORS. Sem valor, qualquer origem.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let port = match env::var("PORT") {
            Ok(value) => value.parse().context("PORT inválida")?,
            Err(_) => DEFAULT_PORT,
        };

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value.parse().context("DATABASE_MAX_CONNECTIONS inválida")?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let cors_origin = env::var("CORS_ORIGIN").ok().filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url,
            port,
            max_connections,
            cors_origin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub ingredient_service: IngredientService,
    pub product_service: ProductService,
    pub order_service: OrderService,
    pub customer_service: CustomerService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool) -> Self {
        let ingredient_repo = IngredientRepository::new();
        let product_repo = ProductRepository::new();
        let order_repo = OrderRepository::new();

        Self {
            ingredient_service: IngredientService::new(ingredient_repo.clone(), product_repo.clone()),
            product_service: ProductService::new(product_repo.clone(), ingredient_repo.clone()),
            order_service: OrderService::new(order_repo, product_repo, ingredient_repo),
            customer_service: CustomerService::new(CustomerRepository::new()),
            dashboard_service: DashboardService::new(DashboardRepository::new()),
            db_pool,
        }
    }
}
