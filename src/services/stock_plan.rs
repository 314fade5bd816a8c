// src/services/stock_plan.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{order::OrderLine, product::RecipeLine},
};

/// Movimentação de estoque de um pedido: quanto cada insumo sobe (+) ou desce (-).
///
/// As quantidades vêm de `quantidade da receita × quantidade do item`, aplicadas
/// sem conversão de unidade, então a devolução repõe exatamente o que a baixa tirou.
/// O mapa é ordenado por id de insumo, então os UPDATEs
/// acontecem sempre na mesma ordem (dois pedidos simultâneos não travam um ao outro).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockPlan {
    deltas: BTreeMap<i32, Decimal>,
}

impl StockPlan {
    /// Baixa de estoque da criação do pedido (valores negativos).
    pub fn consumption(lines: &[OrderLine], recipes: &[RecipeLine]) -> Self {
        Self::build(lines, recipes, Decimal::NEGATIVE_ONE)
    }

    /// Devolução ao estoque na exclusão com `devolverEstoque=true` (valores positivos).
    pub fn restock(lines: &[OrderLine], recipes: &[RecipeLine]) -> Self {
        Self::build(lines, recipes, Decimal::ONE)
    }

    fn build(lines: &[OrderLine], recipes: &[RecipeLine], sign: Decimal) -> Self {
        // O mesmo produto pode aparecer em mais de uma linha do pedido.
        let mut units_per_product: HashMap<i32, i64> = HashMap::new();
        for line in lines {
            *units_per_product.entry(line.product_id).or_default() += i64::from(line.quantity);
        }

        let mut deltas: BTreeMap<i32, Decimal> = BTreeMap::new();
        for recipe in recipes {
            let Some(&units) = units_per_product.get(&recipe.product_id) else {
                continue;
            };
            let amount = recipe.quantity * Decimal::from(units);
            *deltas.entry(recipe.ingredient_id).or_default() += amount * sign;
        }

        // Produtos sem ficha técnica não mexem em nada.
        deltas.retain(|_, delta| !delta.is_zero());
        Self { deltas }
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn delta_for(&self, ingredient_id: i32) -> Option<Decimal> {
        self.deltas.get(&ingredient_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, Decimal)> + '_ {
        self.deltas.iter().map(|(id, delta)| (*id, *delta))
    }
}

/// Todo produto citado no pedido precisa existir: um produto ausente aborta o pedido inteiro.
pub fn ensure_products_exist(lines: &[OrderLine], known_products: &[i32]) -> Result<(), AppError> {
    let known: HashSet<i32> = known_products.iter().copied().collect();
    match lines.iter().find(|line| !known.contains(&line.product_id)) {
        Some(missing) => Err(AppError::ProductNotFound(missing.product_id)),
        None => Ok(()),
    }
}

/// Ids distintos, em ordem, dos produtos de um pedido.
pub fn product_ids(lines: &[OrderLine]) -> Vec<i32> {
    let mut ids: Vec<i32> = lines.iter().map(|line| line.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SALMAO: i32 = 1;
    const ARROZ: i32 = 2;
    const NORI: i32 = 3;
    const TEMAKI: i32 = 10;
    const URAMAKI: i32 = 11;
    const COCA: i32 = 12;

    fn line(product_id: i32, quantity: i32) -> OrderLine {
        OrderLine { product_id, quantity }
    }

    fn recipe(product_id: i32, ingredient_id: i32, quantity: Decimal) -> RecipeLine {
        RecipeLine { product_id, ingredient_id, quantity }
    }

    fn recipes() -> Vec<RecipeLine> {
        vec![
            recipe(TEMAKI, SALMAO, dec!(0.1)),
            recipe(TEMAKI, NORI, dec!(1)),
            recipe(URAMAKI, SALMAO, dec!(0.08)),
            recipe(URAMAKI, ARROZ, dec!(0.15)),
        ]
    }

    fn apply(stock: &mut HashMap<i32, Decimal>, plan: &StockPlan) {
        for (id, delta) in plan.iter() {
            *stock.entry(id).or_default() += delta;
        }
    }

    #[test]
    fn temaki_scenario_deducts_and_restores_salmon() {
        let lines = vec![line(TEMAKI, 3)];
        let mut stock = HashMap::from([(SALMAO, dec!(10)), (NORI, dec!(50))]);

        apply(&mut stock, &StockPlan::consumption(&lines, &recipes()));
        assert_eq!(stock[&SALMAO], dec!(9.7));
        assert_eq!(stock[&NORI], dec!(47));

        apply(&mut stock, &StockPlan::restock(&lines, &recipes()));
        assert_eq!(stock[&SALMAO], dec!(10));
        assert_eq!(stock[&NORI], dec!(50));
    }

    #[test]
    fn consumption_and_restock_cancel_out_for_mixed_orders() {
        let lines = vec![line(TEMAKI, 2), line(URAMAKI, 4), line(TEMAKI, 1), line(COCA, 6)];
        let consumption = StockPlan::consumption(&lines, &recipes());
        let restock = StockPlan::restock(&lines, &recipes());

        assert_eq!(consumption.len(), restock.len());
        for (id, delta) in consumption.iter() {
            assert_eq!(restock.delta_for(id), Some(-delta));
        }
    }

    #[test]
    fn repeated_product_lines_are_summed() {
        let plan = StockPlan::consumption(&[line(TEMAKI, 1), line(TEMAKI, 2)], &recipes());
        assert_eq!(plan.delta_for(SALMAO), Some(dec!(-0.3)));
    }

    #[test]
    fn shared_ingredients_accumulate_across_products() {
        // 1 temaki (0.1) + 2 uramakis (2 × 0.08 = 0.16)
        let plan = StockPlan::consumption(&[line(TEMAKI, 1), line(URAMAKI, 2)], &recipes());
        assert_eq!(plan.delta_for(SALMAO), Some(dec!(-0.26)));
        assert_eq!(plan.delta_for(ARROZ), Some(dec!(-0.3)));
    }

    #[test]
    fn recipe_quantity_is_applied_as_stored() {
        // 100 "g" numa ficha de insumo em kg: sem conversão, a baixa é 100 × 3.
        let recipes = vec![recipe(TEMAKI, SALMAO, dec!(100))];
        let lines = vec![line(TEMAKI, 3)];
        let mut stock = HashMap::from([(SALMAO, dec!(1000))]);

        apply(&mut stock, &StockPlan::consumption(&lines, &recipes));
        assert_eq!(stock[&SALMAO], dec!(700));

        apply(&mut stock, &StockPlan::restock(&lines, &recipes));
        assert_eq!(stock[&SALMAO], dec!(1000));
    }

    #[test]
    fn product_without_recipe_moves_nothing() {
        let plan = StockPlan::consumption(&[line(COCA, 5)], &recipes());
        assert!(plan.is_empty());
    }

    #[test]
    fn plan_is_ordered_by_ingredient_id() {
        let plan = StockPlan::consumption(&[line(URAMAKI, 1), line(TEMAKI, 1)], &recipes());
        let ids: Vec<i32> = plan.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![SALMAO, ARROZ, NORI]);
    }

    #[test]
    fn missing_product_aborts() {
        let lines = vec![line(TEMAKI, 1), line(99, 1)];
        let err = ensure_products_exist(&lines, &[TEMAKI]).unwrap_err();
        assert!(matches!(err, AppError::ProductNotFound(99)));
        assert!(ensure_products_exist(&lines, &[TEMAKI, 99]).is_ok());
    }

    #[test]
    fn product_ids_are_distinct_and_sorted() {
        assert_eq!(product_ids(&[line(12, 1), line(10, 2), line(12, 3)]), vec![10, 12]);
    }
}
