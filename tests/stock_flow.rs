// Fluxo completo contra um Postgres de verdade.
// Rodar com: DATABASE_URL=postgres://... cargo test -- --ignored

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;
use sqlx::PgPool;

use takashi_backend::{
    common::error::AppError,
    config::AppState,
    models::{
        ingredient::{CreateIngredientPayload, Ingredient, UnitOfMeasure, UpdateIngredientPayload},
        order::{CreateOrderPayload, OrderChannel, OrderStatus},
        product::{ProductDetail, ProductPayload},
    },
};

async fn ingredient(state: &AppState, name: &str, unit: &str, stock: Decimal) -> Ingredient {
    let payload: CreateIngredientPayload = serde_json::from_value(json!({
        "nome": name, "categoria": "Insumos", "unidade": unit,
        "estoque": stock, "estoqueMinimo": 1
    }))
    .unwrap();
    state.ingredient_service.create(&state.db_pool, &payload).await.unwrap()
}

async fn product(state: &AppState, name: &str, recipe: serde_json::Value) -> ProductDetail {
    let payload: ProductPayload = serde_json::from_value(json!({
        "nome": name, "preco": 34.9, "categoria": "TEMAKIS", "fichaTecnica": recipe
    }))
    .unwrap();
    state.product_service.create(&state.db_pool, &payload).await.unwrap()
}

fn order_payload(items: serde_json::Value) -> CreateOrderPayload {
    serde_json::from_value(json!({
        "cliente": "Maria", "telefone": "11999990000", "canal": "iFood",
        "valor": 104.7, "itens": items
    }))
    .unwrap()
}

async fn stock_of(state: &AppState, id: i32) -> Decimal {
    state.ingredient_service.get(&state.db_pool, id).await.unwrap().stock
}

async fn recipe_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM recipe_entries")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn order_deducts_and_restock_gives_back(pool: PgPool) {
    let state = AppState::from_pool(pool);
    let salmao = ingredient(&state, "Salmão", "kg", dec!(10)).await;
    let temaki = product(&state, "TEMAKI SALMÃO", json!([{ "insumoId": salmao.id, "quantidade": 0.1, "medida": "kg" }])).await;

    let order = state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": temaki.product.id, "quantidade": 3 }])))
        .await
        .unwrap();
    assert_eq!(order.order.status, OrderStatus::New);
    assert_eq!(order.items[0].product_name, "TEMAKI SALMÃO");
    assert_eq!(stock_of(&state, salmao.id).await, dec!(9.7));

    state.order_service.delete(&state.db_pool, order.order.id, true).await.unwrap();
    assert_eq!(stock_of(&state, salmao.id).await, dec!(10));

    // O segundo DELETE não acha nada e não credita de novo.
    let err = state.order_service.delete(&state.db_pool, order.order.id, true).await.unwrap_err();
    assert!(matches!(err, AppError::OrderNotFound(_)));
    assert_eq!(stock_of(&state, salmao.id).await, dec!(10));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn delete_without_restock_keeps_stock(pool: PgPool) {
    let state = AppState::from_pool(pool);
    let arroz = ingredient(&state, "Arroz japonês", "kg", dec!(5)).await;
    let uramaki = product(&state, "URAMAKI SALMÃO 10 PEÇAS", json!([{ "insumoId": arroz.id, "quantidade": 0.15, "medida": "kg" }])).await;

    let order = state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": uramaki.product.id, "quantidade": 2 }])))
        .await
        .unwrap();
    assert_eq!(stock_of(&state, arroz.id).await, dec!(4.7));

    state.order_service.delete(&state.db_pool, order.order.id, false).await.unwrap();
    assert_eq!(stock_of(&state, arroz.id).await, dec!(4.7));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn restock_is_exact_even_after_the_unit_changes(pool: PgPool) {
    let state = AppState::from_pool(pool);
    let salmao = ingredient(&state, "Salmão", "kg", dec!(1000)).await;
    let temaki = product(&state, "TEMAKI SALMÃO", json!([{ "insumoId": salmao.id, "quantidade": 100, "medida": "g" }])).await;

    let order = state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": temaki.product.id, "quantidade": 3 }])))
        .await
        .unwrap();
    // A medida da ficha não converte nada: 100 × 3.
    assert_eq!(stock_of(&state, salmao.id).await, dec!(700));

    let changes: UpdateIngredientPayload = serde_json::from_value(json!({ "unidade": "g" })).unwrap();
    state.ingredient_service.update(&state.db_pool, salmao.id, &changes).await.unwrap();

    state.order_service.delete(&state.db_pool, order.order.id, true).await.unwrap();
    assert_eq!(stock_of(&state, salmao.id).await, dec!(1000));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn editing_a_product_replaces_the_whole_recipe(pool: PgPool) {
    let state = AppState::from_pool(pool.clone());
    let salmao = ingredient(&state, "Salmão", "kg", dec!(10)).await;
    let arroz = ingredient(&state, "Arroz japonês", "kg", dec!(10)).await;
    let nori = ingredient(&state, "Alga Nori", "un", dec!(50)).await;
    let temaki = product(&state, "TEMAKI SALMÃO", json!([{ "insumoId": salmao.id, "quantidade": 0.1, "medida": "kg" }])).await;
    let id = temaki.product.id;

    let payload: ProductPayload = serde_json::from_value(json!({
        "nome": "TEMAKI SALMÃO", "preco": 36.9, "categoria": "TEMAKIS",
        "fichaTecnica": [
            { "insumoId": nori.id, "quantidade": 1, "medida": "un" },
            { "insumoId": arroz.id, "quantidade": 80, "medida": "g" }
        ]
    }))
    .unwrap();
    let updated = state.product_service.update(&state.db_pool, id, &payload).await.unwrap();
    assert_eq!(updated.product.price, dec!(36.9));
    assert_eq!(recipe_rows(&pool).await, 2);

    let detail = state.product_service.get(&state.db_pool, id).await.unwrap();
    let stored: Vec<(i32, Decimal, UnitOfMeasure)> =
        detail.recipe.iter().map(|e| (e.ingredient_id, e.quantity, e.unit)).collect();
    assert_eq!(
        stored,
        vec![(nori.id, dec!(1), UnitOfMeasure::Unit), (arroz.id, dec!(80), UnitOfMeasure::Gram)]
    );

    // O pedido seguinte só baixa a ficha nova.
    state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": id, "quantidade": 2 }])))
        .await
        .unwrap();
    assert_eq!(stock_of(&state, salmao.id).await, dec!(10));
    assert_eq!(stock_of(&state, nori.id).await, dec!(48));
    assert_eq!(stock_of(&state, arroz.id).await, dec!(-150));

    // Ficha vazia apaga tudo e o produto continua.
    let payload: ProductPayload = serde_json::from_value(json!({
        "nome": "TEMAKI SALMÃO", "preco": 36.9, "categoria": "TEMAKIS", "fichaTecnica": []
    }))
    .unwrap();
    let updated = state.product_service.update(&state.db_pool, id, &payload).await.unwrap();
    assert!(updated.recipe.is_empty());
    assert_eq!(recipe_rows(&pool).await, 0);
    assert!(state.product_service.get(&state.db_pool, id).await.unwrap().recipe.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn values_beyond_the_column_limits_are_bad_requests(pool: PgPool) {
    let state = AppState::from_pool(pool);

    let payload: CreateIngredientPayload = serde_json::from_value(json!({
        "nome": "Gengibre", "unidade": "kg", "estoque": 100_000_000_000u64
    }))
    .unwrap();
    let err = state.ingredient_service.create(&state.db_pool, &payload).await.unwrap_err();
    assert!(matches!(err, AppError::ValueOutOfRange));

    // Estoque no limite: o próximo pedido estoura a coluna e nada é gravado.
    let shoyu = ingredient(&state, "Shoyu", "L", dec!(0)).await;
    let changes: UpdateIngredientPayload =
        serde_json::from_value(json!({ "estoque": -9_999_999_000i64 })).unwrap();
    state.ingredient_service.update(&state.db_pool, shoyu.id, &changes).await.unwrap();
    let poke = product(&state, "POKE SALMÃO", json!([{ "insumoId": shoyu.id, "quantidade": 1000, "medida": "ml" }])).await;

    let err = state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": poke.product.id, "quantidade": 5 }])))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValueOutOfRange));
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(stock_of(&state, shoyu.id).await, dec!(-9999999000));
    assert!(state.order_service.list(&state.db_pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn missing_product_aborts_the_whole_order(pool: PgPool) {
    let state = AppState::from_pool(pool);
    let nori = ingredient(&state, "Alga Nori", "un", dec!(20)).await;
    let temaki = product(&state, "TEMAKI KANI", json!([{ "insumoId": nori.id, "quantidade": 1 }])).await;

    let err = state
        .order_service
        .create(
            &state.db_pool,
            &order_payload(json!([
                { "produtoId": temaki.product.id, "quantidade": 1 },
                { "produtoId": 999_999, "quantidade": 1 }
            ])),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ProductNotFound(999_999)));
    assert_eq!(stock_of(&state, nori.id).await, dec!(20));
    assert!(state.order_service.list(&state.db_pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn product_without_recipe_changes_nothing(pool: PgPool) {
    let state = AppState::from_pool(pool);
    let salmao = ingredient(&state, "Salmão", "kg", dec!(10)).await;
    let coca = product(&state, "COCA COLA LATA", json!([])).await;

    state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": coca.product.id, "quantidade": 4 }])))
        .await
        .unwrap();

    assert_eq!(stock_of(&state, salmao.id).await, dec!(10));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn deleting_keeps_the_other_side_of_the_recipe(pool: PgPool) {
    let state = AppState::from_pool(pool.clone());
    let salmao = ingredient(&state, "Salmão", "kg", dec!(10)).await;
    let cream = ingredient(&state, "Cream cheese", "kg", dec!(3)).await;
    let hot = product(
        &state,
        "TEMAKI HOT",
        json!([
            { "insumoId": salmao.id, "quantidade": 0.1, "medida": "kg" },
            { "insumoId": cream.id, "quantidade": 30, "medida": "g" }
        ]),
    )
    .await;
    assert_eq!(recipe_rows(&pool).await, 2);

    // Insumo excluído: sai da ficha, o produto fica.
    state.ingredient_service.delete(&state.db_pool, cream.id).await.unwrap();
    let detail = state.product_service.get(&state.db_pool, hot.product.id).await.unwrap();
    assert_eq!(detail.recipe.len(), 1);
    assert_eq!(detail.recipe[0].ingredient_id, salmao.id);

    // Produto excluído: a ficha vai junto, o insumo fica.
    state.product_service.delete(&state.db_pool, hot.product.id).await.unwrap();
    assert_eq!(recipe_rows(&pool).await, 0);
    assert_eq!(stock_of(&state, salmao.id).await, dec!(10));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn product_on_an_order_cannot_be_deleted(pool: PgPool) {
    let state = AppState::from_pool(pool);
    let coca = product(&state, "COCA COLA LATA", json!([])).await;
    state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": coca.product.id, "quantidade": 1 }])))
        .await
        .unwrap();

    let err = state.product_service.delete(&state.db_pool, coca.product.id).await.unwrap_err();
    assert!(matches!(err, AppError::ProductInUse(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn duplicate_names_are_rejected_case_insensitively(pool: PgPool) {
    let state = AppState::from_pool(pool);
    ingredient(&state, "Cream Cheese", "kg", dec!(1)).await;

    let payload: CreateIngredientPayload =
        serde_json::from_value(json!({ "nome": "  CREAM cheese ", "unidade": "kg" })).unwrap();
    let err = state.ingredient_service.create(&state.db_pool, &payload).await.unwrap_err();

    assert!(matches!(err, AppError::IngredientAlreadyExists(ref name) if name == "Cream Cheese"));
    assert_eq!(err.to_string(), "Já existe um insumo chamado \"Cream Cheese\".");

    // Renomear para um nome já usado também é recusado.
    let other = ingredient(&state, "Kani", "un", dec!(1)).await;
    let changes: UpdateIngredientPayload = serde_json::from_value(json!({ "nome": "cream cheese" })).unwrap();
    let err = state.ingredient_service.update(&state.db_pool, other.id, &changes).await.unwrap_err();
    assert!(matches!(err, AppError::IngredientAlreadyExists(_)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn category_bulk_delete_counts_and_cleans_recipes(pool: PgPool) {
    let state = AppState::from_pool(pool.clone());
    let salmao = ingredient(&state, "Salmão", "kg", dec!(1)).await;
    ingredient(&state, "Camarão", "kg", dec!(1)).await;
    product(&state, "SASHIMI 10 PEÇAS", json!([{ "insumoId": salmao.id, "quantidade": 0.2, "medida": "kg" }])).await;

    let deleted = state.ingredient_service.delete_by_category(&state.db_pool, "Insumos").await.unwrap();

    assert_eq!(deleted, 2);
    assert_eq!(recipe_rows(&pool).await, 0);
    assert_eq!(state.product_service.list(&state.db_pool).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn status_moves_forward_or_cancels(pool: PgPool) {
    let state = AppState::from_pool(pool);
    let coca = product(&state, "COCA COLA LATA", json!([])).await;
    let order = state
        .order_service
        .create(&state.db_pool, &order_payload(json!([{ "produtoId": coca.product.id, "quantidade": 1 }])))
        .await
        .unwrap();
    let id = order.order.id;

    let updated = state.order_service.update_status(&state.db_pool, id, "Em Preparo").await.unwrap();
    assert_eq!(updated.status, OrderStatus::Preparing);

    let err = state.order_service.update_status(&state.db_pool, id, "Novo").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidStatusTransition { .. }));

    let err = state.order_service.update_status(&state.db_pool, id, "Pronto").await.unwrap_err();
    assert!(matches!(err, AppError::UnknownOrderStatus(_)));

    let updated = state.order_service.update_status(&state.db_pool, id, "Cancelado").await.unwrap();
    assert_eq!(updated.status, OrderStatus::Cancelled);

    let err = state.order_service.update_status(&state.db_pool, id, "Entregue").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidStatusTransition { .. }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn dashboard_totals_come_from_the_database(pool: PgPool) {
    let state = AppState::from_pool(pool.clone());
    let coca = product(&state, "COCA COLA LATA", json!([])).await;

    let mut ids = Vec::new();
    for (channel, total) in [("iFood", 50), ("iFood", 30), ("WhatsApp", 20), ("Local", 99)] {
        let payload: CreateOrderPayload = serde_json::from_value(json!({
            "cliente": "Maria", "canal": channel, "valor": total,
            "itens": [{ "produtoId": coca.product.id, "quantidade": 1 }]
        }))
        .unwrap();
        ids.push(state.order_service.create(&state.db_pool, &payload).await.unwrap().order.id);
    }
    state.order_service.update_status(&state.db_pool, ids[3], "Cancelado").await.unwrap();
    state.order_service.update_status(&state.db_pool, ids[2], "Em Preparo").await.unwrap();

    // Um pedido "Novo" de anteontem continua aguardando confirmação.
    sqlx::query("UPDATE orders SET created_at = created_at - INTERVAL '2 days' WHERE id = $1")
        .bind(ids[0])
        .execute(&pool)
        .await
        .unwrap();

    let summary = state.dashboard_service.get_summary(&state.db_pool).await.unwrap();
    assert_eq!(summary.pedidos_a_confirmar, 2);
    assert_eq!(summary.pedidos_hoje, 2);
    assert_eq!(summary.vendas_hoje, dec!(50));

    let financial = state.dashboard_service.get_financial(&state.db_pool).await.unwrap();
    assert_eq!(financial.faturamento_total, dec!(100));
    assert_eq!(financial.qtd_pedidos, 3);
    assert_eq!(financial.ticket_medio, dec!(33.33));
    let ifood = financial.por_canal.iter().find(|c| c.channel == OrderChannel::IFood).unwrap();
    assert_eq!(ifood.revenue, dec!(80));
    let local = financial.por_canal.iter().find(|c| c.channel == OrderChannel::Local).unwrap();
    assert_eq!(local.revenue, Decimal::ZERO);

    // Só as vendas ativas, da mais antiga para a mais nova.
    let recent: Vec<i32> = financial.vendas_recentes.iter().map(|s| s.order_id).collect();
    assert_eq!(recent, vec![ids[0], ids[1], ids[2]]);
    let hourly: i64 = financial.pedidos_por_hora.iter().map(|h| h.orders).sum();
    assert_eq!(hourly, 3);
}
