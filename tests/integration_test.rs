//! 集成測試

use plan_core::{Period, PlanConfig, PlanError, PlanTable, PlanningScenario, ProductId};
use plan_model::{PlanRunner, SupplyPlanningModel, WarningSeverity};
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

fn tolerance() -> Decimal {
    Decimal::new(1, 4)
}

/// 依序執行建構器的所有步驟並求解
fn solve_scenario(scenario: &PlanningScenario) -> (SupplyPlanningModel, Decimal, PlanTable) {
    let mut model = SupplyPlanningModel::new();
    model
        .configure(scenario.products.clone(), scenario.horizon().unwrap())
        .unwrap();
    model
        .declare_variables(scenario.initial_inventory().unwrap().as_ref())
        .unwrap();
    model
        .add_demand_balance(&scenario.demand_table().unwrap())
        .unwrap();
    model.add_capacity(scenario.capacity().unwrap()).unwrap();
    model.set_objective(&scenario.cost_table().unwrap()).unwrap();

    let objective = model.solve().unwrap();
    let table = model.collect_results().unwrap();
    (model, objective, table)
}

/// 檢查需求平衡、產能與非負條件
fn assert_plan_holds(scenario: &PlanningScenario, table: &PlanTable) {
    let horizon = scenario.horizon().unwrap();
    let demand = scenario.demand_table().unwrap();
    let initial = scenario.initial_inventory().unwrap();

    for product in &scenario.products {
        let mut prev_inventory = initial
            .as_ref()
            .and_then(|inv| inv.get(product))
            .unwrap_or(Decimal::ZERO);
        let mut prev_backlog = Decimal::ZERO;

        for period in horizon.iter() {
            let row = table.row(product, period).unwrap();
            assert!(row.production >= -tolerance());
            assert!(row.inventory >= -tolerance());
            assert!(row.backlog >= -tolerance());

            let required = demand.require(product, period).unwrap();
            let residual = prev_inventory + row.production - row.inventory + row.backlog
                - prev_backlog
                - required;
            assert!(
                residual.abs() <= tolerance(),
                "balance violated for {} @ {}: residual {}",
                product,
                period,
                residual
            );

            prev_inventory = row.inventory;
            prev_backlog = row.backlog;
        }
    }

    for period in horizon.iter() {
        assert!(table.total_production(period) <= scenario.capacity_per_period + tolerance());
    }
}

fn uniform_scenario(
    products: &[&str],
    periods: u32,
    demand: i64,
    capacity: i64,
    initial: Option<i64>,
) -> PlanningScenario {
    let ids: Vec<ProductId> = products.iter().map(|&p| ProductId::new(p)).collect();
    let per_product = |value: i64| -> HashMap<ProductId, Decimal> {
        ids.iter().map(|p| (p.clone(), Decimal::from(value))).collect()
    };

    PlanningScenario {
        products: ids.clone(),
        periods: (0..periods).collect(),
        initial_inventory: initial.map(per_product),
        demand: ids
            .iter()
            .map(|p| (p.clone(), vec![Decimal::from(demand); periods as usize]))
            .collect::<BTreeMap<_, _>>(),
        capacity_per_period: Decimal::from(capacity),
        production_cost: per_product(10),
        inventory_cost: per_product(2),
        backlog_cost: per_product(20),
    }
}

#[test]
fn test_example_scenario() {
    // 兩產品四期：總產能 1200 遠大於總需求 930，不應有欠交
    let scenario = PlanningScenario::example();
    let (_, objective, table) = solve_scenario(&scenario);

    assert_eq!(table.len(), 8);
    assert_eq!(table.total_backlog(), Decimal::ZERO);
    assert_plan_holds(&scenario, &table);

    let a = ProductId::new("ProductA");
    let b = ProductId::new("ProductB");
    let production = |p: &ProductId| -> Vec<Decimal> {
        table.rows_for(p).map(|r| r.production).collect()
    };

    // 期初庫存先抵銷第一期需求，之後按需求生產
    assert_eq!(production(&a), vec![20, 140, 160, 130].into_iter().map(Decimal::from).collect::<Vec<_>>());
    assert_eq!(production(&b), vec![30, 90, 110, 100].into_iter().map(Decimal::from).collect::<Vec<_>>());
    assert!(table.rows().iter().all(|r| r.inventory.is_zero()));
    assert_eq!(objective, Decimal::from(8460));
}

#[test]
fn test_zero_capacity_forces_backlog() {
    let scenario = uniform_scenario(&["A", "B"], 4, 25, 0, None);
    let (_, _, table) = solve_scenario(&scenario);

    assert_plan_holds(&scenario, &table);
    for product in &scenario.products {
        let backlog: Vec<Decimal> = table.rows_for(product).map(|r| r.backlog).collect();
        assert_eq!(
            backlog,
            vec![25, 50, 75, 100].into_iter().map(Decimal::from).collect::<Vec<_>>()
        );
        assert!(table.rows_for(product).all(|r| r.production.is_zero()));
    }
}

#[test]
fn test_zero_demand_keeps_initial_inventory() {
    let scenario = uniform_scenario(&["A", "B"], 4, 0, 300, Some(40));
    let (_, objective, table) = solve_scenario(&scenario);

    assert_plan_holds(&scenario, &table);
    for row in table.rows() {
        assert_eq!(row.production, Decimal::ZERO);
        assert_eq!(row.backlog, Decimal::ZERO);
        assert_eq!(row.inventory, Decimal::from(40));
    }
    // 持有成本：2 產品 × 4 期 × 40 × 2
    assert_eq!(objective, Decimal::from(640));
}

#[test]
fn test_resolve_is_idempotent() {
    let scenario = PlanningScenario::example();
    let (mut model, first_objective, first_table) = solve_scenario(&scenario);

    let second_objective = model.solve().unwrap();
    let second_table = model.collect_results().unwrap();

    assert_eq!(first_objective, second_objective);
    assert_eq!(first_table, second_table);
}

#[rstest]
#[case::tight_capacity(&["A", "B"], 5, 160, 300)]
#[case::ample_capacity(&["A"], 3, 50, 500)]
#[case::single_period(&["A", "B", "C"], 1, 90, 200)]
fn test_balance_and_capacity_hold(
    #[case] products: &[&str],
    #[case] periods: u32,
    #[case] demand: i64,
    #[case] capacity: i64,
) {
    let scenario = uniform_scenario(products, periods, demand, capacity, Some(10));
    let (_, _, table) = solve_scenario(&scenario);

    assert_eq!(table.len(), products.len() * periods as usize);
    assert_plan_holds(&scenario, &table);
}

#[test]
fn test_tight_capacity_builds_ahead() {
    // 第二期需求超過產能，第一期提前生產並持有（持有 2 < 欠交 20）
    let mut scenario = uniform_scenario(&["A"], 2, 0, 100, None);
    scenario.demand.insert(
        ProductId::new("A"),
        vec![Decimal::from(50), Decimal::from(150)],
    );
    let (_, _, table) = solve_scenario(&scenario);
    let a = ProductId::new("A");

    assert_plan_holds(&scenario, &table);
    assert_eq!(table.row(&a, Period(0)).unwrap().production, Decimal::from(100));
    assert_eq!(table.row(&a, Period(0)).unwrap().inventory, Decimal::from(50));
    assert_eq!(table.row(&a, Period(1)).unwrap().backlog, Decimal::ZERO);
}

#[test]
fn test_runner_matches_builder() {
    let scenario = PlanningScenario::example();
    let (_, objective, table) = solve_scenario(&scenario);

    let report = PlanRunner::new(PlanConfig::default()).run(&scenario).unwrap();

    assert_eq!(report.objective_value, objective);
    assert_eq!(report.table, table);
    assert!(report
        .warnings
        .iter()
        .all(|w| w.severity != WarningSeverity::Error));
}

#[test]
fn test_demo_scenario_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/two_products.json");
    let scenario = PlanningScenario::from_json_file(path).unwrap();
    let report = PlanRunner::new(PlanConfig::default()).run(&scenario).unwrap();

    assert_eq!(report.table.len(), 8);
    assert_eq!(report.objective_value, Decimal::from(8460));
}

#[test]
fn test_missing_scenario_file() {
    let result = PlanningScenario::from_json_file("/nonexistent/scenario.json");
    assert!(matches!(result, Err(PlanError::Io(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_solution_respects_balance_and_capacity(
        demand_a in prop::collection::vec(0i64..200, 1..6),
        demand_b_scale in 0i64..3,
        capacity in 0i64..400,
        initial_a in 0i64..150,
    ) {
        let periods = demand_a.len();
        let a = ProductId::new("A");
        let b = ProductId::new("B");
        let demand_b: Vec<Decimal> = demand_a
            .iter()
            .rev()
            .map(|&d| Decimal::from(d * demand_b_scale / 2))
            .collect();

        let mut scenario = uniform_scenario(&["A", "B"], periods as u32, 0, capacity, Some(0));
        scenario.demand = BTreeMap::from([
            (a.clone(), demand_a.iter().map(|&d| Decimal::from(d)).collect()),
            (b.clone(), demand_b),
        ]);
        scenario.initial_inventory = Some(HashMap::from([
            (a, Decimal::from(initial_a)),
            (b, Decimal::ZERO),
        ]));

        let (_, objective, table) = solve_scenario(&scenario);

        prop_assert_eq!(table.len(), 2 * periods);
        prop_assert!(objective >= Decimal::ZERO);
        assert_plan_holds(&scenario, &table);
    }
}
