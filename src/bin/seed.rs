// src/bin/seed.rs
//
// Recria o catálogo inicial do restaurante: apaga pedidos, fichas, produtos e
// insumos e carrega os insumos (estoque 0, mínimo 5) e o cardápio.

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use takashi_backend::{
    config::Config,
    db::{IngredientRepository, ProductRepository},
    models::ingredient::{CreateIngredientPayload, UnitOfMeasure},
};

use takashi_backend::models::ingredient::UnitOfMeasure::{Kilogram as KG, Liter as L, Unit as UN};

const INGREDIENTS: &[(&str, &str, UnitOfMeasure)] = &[
    ("Gás P13", "Cozinha", UN),
    ("Gás maçarico", "Cozinha", UN),
    ("Detergente", "Cozinha", UN),
    ("Esponja louça", "Cozinha", UN),
    ("Papel toalha", "Cozinha", UN),
    ("Saco de lixo 100lts", "Cozinha", UN),
    ("Molheira", "Embalagens", UN),
    ("Hashi (Estoque)", "Embalagens", UN),
    ("Saco kraft grande", "Embalagens", UN),
    ("Saco kraft pequeno", "Embalagens", UN),
    ("Embalagem Poke", "Embalagens", UN),
    ("Caixa sushi Grande", "Embalagens", UN),
    ("Caixa sushi média", "Embalagens", UN),
    ("Caixa sushi pequena", "Embalagens", UN),
    ("Bobina impressora", "Embalagens", UN),
    ("Salmão", "Insumos", KG),
    ("Kani", "Insumos", UN),
    ("Camarão", "Insumos", KG),
    ("Cream cheese", "Insumos", KG),
    ("Alga Nori", "Insumos", UN),
    ("Shoyu sachê (Estoque)", "Insumos", UN),
    ("Tarê galão 5L", "Insumos", L),
    ("Geleia Pimenta 5L", "Insumos", L),
    ("Gergelim mix", "Insumos", KG),
    ("Gengibre (Estoque)", "Insumos", KG),
    ("Wasabi (Estoque)", "Insumos", KG),
    ("Arroz japonês", "Insumos", KG),
    ("Tempero arroz", "Insumos", L),
    ("Farinha Panko", "Insumos", KG),
    ("Azeite", "Insumos", L),
    ("Chocolate forneavel", "Insumos", KG),
    ("Morango", "Hortifruti", KG),
    ("Banana", "Hortifruti", KG),
    ("Cebolinha", "Hortifruti", KG),
    ("Alho Poró", "Hortifruti", KG),
    ("Pepino japonês", "Hortifruti", KG),
    ("Cebola roxa", "Hortifruti", KG),
    ("Manga", "Hortifruti", KG),
    ("Abacate", "Hortifruti", KG),
    ("Coca lata (Estoque)", "Bebidas", UN),
    ("Guaraná lata (Estoque)", "Bebidas", UN),
    ("Coca 2 litros (Estoque)", "Bebidas", UN),
    ("Guaraná 2 litros (Estoque)", "Bebidas", UN),
    ("Águas sem gás (Estoque)", "Bebidas", UN),
];

// (nome, preço em centavos, categoria)
const PRODUCTS: &[(&str, i64, &str)] = &[
    ("TAKASHI 68", 9990, "COMBOS MAIS PEDIDOS"),
    ("TAKASHI 104", 15490, "COMBOS MAIS PEDIDOS"),
    ("TAKASHI 110 (FAMÍLIA)", 16990, "COMBOS MAIS PEDIDOS"),
    ("TAKASHI 30 (+1 TEMAKI)", 9990, "COMBOS MAIS PEDIDOS"),
    ("COMBO HOT ESPECIAL 2.0 (30 PEÇAS)", 6990, "COMBOS MAIS PEDIDOS"),
    ("COMBO CASAL 56 PEÇAS", 16990, "COMBOS PREMIUM"),
    ("COMBO DO CHEFE 64 PEÇAS", 19990, "COMBOS PREMIUM"),
    ("TAKASHI ALASKA (40 PEÇAS)", 8990, "COMBOS PARA 1 PESSOA"),
    ("URAMAKI SALMÃO 10 PEÇAS", 3490, "PORÇÕES DE SUSHI"),
    ("URAMAKI FILA 10 PEÇAS", 3490, "PORÇÕES DE SUSHI"),
    ("HOSSOMAKI SALMÃO 10 PEÇAS", 2990, "PORÇÕES DE SUSHI"),
    ("HOSSOMAKI KANI 10 PEÇAS", 2490, "PORÇÕES DE SUSHI"),
    ("SASHIMI 10 PEÇAS", 5490, "PORÇÕES DE SUSHI"),
    ("NIGUIRI SALMÃO 5 PEÇAS", 1990, "PORÇÕES DE SUSHI"),
    ("TEMAKI SALMÃO", 3490, "TEMAKIS"),
    ("TEMAKI FILA", 3490, "TEMAKIS"),
    ("TEMAKI HOT", 3990, "TEMAKIS"),
    ("TEMAKI KANI", 2490, "TEMAKIS"),
    ("4 BOLINHOS DE SALMÃO E CEBOLINHA", 2490, "BOLINHOS DE SALMÃO TAKASHI"),
    ("POKE SAMURAI", 5990, "POKES TAKASHI"),
    ("POKE FUJI", 5490, "POKES TAKASHI"),
    ("POKE VEGETARIANO", 4490, "POKES TAKASHI"),
    ("BIG HOT SALAD", 4990, "BIG HOTS TAKASHI"),
    ("HOT ROLL FILADÉLFIA 10 PEÇAS", 1990, "PORÇÕES HOT ROLL"),
    ("HOT ROLL FILADÉLFIA 20 PEÇAS", 3890, "PORÇÕES HOT ROLL"),
    ("HOT ROLL DOCE MORANGO/CHOCOLATE", 2490, "PORÇÕES HOT ROLL"),
    ("COCA COLA 2L", 1800, "BEBIDAS"),
    ("GUARANÁ 2L", 1300, "BEBIDAS"),
    ("COCA COLA LATA", 600, "BEBIDAS"),
    ("GUARANÁ LATA", 500, "BEBIDAS"),
    ("ÁGUA SEM GÁS 500ML", 500, "BEBIDAS"),
    ("Geleia de pimenta potinho", 500, "ACOMPANHAMENTOS"),
    ("Shoyu mitsuwa 5 unidades", 500, "ACOMPANHAMENTOS"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await
        .context("Falha ao conectar ao banco de dados")?;

    sqlx::migrate!().run(&pool).await?;

    let ingredient_repo = IngredientRepository::new();
    let product_repo = ProductRepository::new();

    let mut tx = pool.begin().await?;

    // 1. Limpeza (filhos antes dos pais)
    for table in ["order_items", "orders", "recipe_entries", "products", "ingredients"] {
        sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *tx).await?;
    }
    tracing::info!("🧹 Banco limpo.");

    // 2. Insumos
    for &(name, category, unit) in INGREDIENTS {
        let payload = CreateIngredientPayload {
            name: name.to_string(),
            category: category.to_string(),
            unit,
            stock: Decimal::ZERO,
            min_stock: Decimal::from(5),
            unit_cost: None,
        };
        ingredient_repo.create(&mut *tx, name, &payload).await?;
    }
    tracing::info!("📦 {} insumos criados", INGREDIENTS.len());

    // 3. Cardápio
    for &(name, cents, category) in PRODUCTS {
        let price = Decimal::new(cents, 2);
        product_repo.create(&mut *tx, name, price, None, category).await?;
    }
    tracing::info!("🍣 {} produtos criados", PRODUCTS.len());

    tx.commit().await?;
    tracing::info!("✅ Seed concluído");
    Ok(())
}
