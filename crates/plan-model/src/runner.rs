//! 完整計劃流程

use chrono::Utc;
use plan_core::{PlanConfig, PlanningScenario, Result};
use uuid::Uuid;

use crate::builder::SupplyPlanningModel;
use crate::solver::{LinearSolver, MicroLpSolver};
use crate::{PlanReport, PlanWarning};

/// 計劃執行器
///
/// 依序執行設置、宣告變數、需求平衡、產能、目標、求解、讀取結果與驗證。
pub struct PlanRunner<S = MicroLpSolver> {
    config: PlanConfig,
    solver: S,
}

impl PlanRunner {
    /// 以預設求解器創建執行器
    pub fn new(config: PlanConfig) -> Self {
        Self::with_solver(config, MicroLpSolver)
    }
}

impl<S: LinearSolver + Clone> PlanRunner<S> {
    pub fn with_solver(config: PlanConfig, solver: S) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// 執行一次計劃
    pub fn run(&self, scenario: &PlanningScenario) -> Result<PlanReport> {
        tracing::info!(
            "開始供應計劃：產品 {} 個，期間 {} 期",
            scenario.products.len(),
            scenario.periods.len()
        );

        let start_time = std::time::Instant::now();
        let mut warnings = Vec::new();

        // Step 1: 設置產品與時界
        tracing::debug!("Step 1: 設置產品與時界");
        let mut model = SupplyPlanningModel::with_solver(self.solver.clone())
            .with_result_scale(self.config.result_scale);
        model.configure(scenario.products.clone(), scenario.horizon()?)?;

        let demand = scenario.demand_table()?;
        for product in demand.products() {
            if scenario.products.contains(product) {
                tracing::debug!("產品 {} 總需求 {}", product, demand.total_for(product));
            } else {
                tracing::warn!("需求中的產品 {} 不在產品清單內，忽略", product);
                warnings.push(PlanWarning::warning(
                    product.to_string(),
                    "不在產品清單內，需求已忽略".to_string(),
                ));
            }
        }

        // Step 2: 宣告變數
        tracing::debug!("Step 2: 宣告變數");
        let initial_inventory = scenario.initial_inventory()?;
        if let Some(inventory) = &initial_inventory {
            tracing::debug!("期初庫存合計 {}", inventory.total());
        }
        model.declare_variables(initial_inventory.as_ref())?;

        // Step 3: 需求平衡約束
        tracing::debug!("Step 3: 需求平衡約束");
        model.add_demand_balance(&demand)?;

        // Step 4: 產能約束
        tracing::debug!("Step 4: 產能約束");
        model.add_capacity(scenario.capacity()?)?;

        // Step 5: 目標函數
        tracing::debug!("Step 5: 目標函數");
        model.set_objective(&scenario.cost_table()?)?;

        // Step 6: 求解
        tracing::debug!("Step 6: 求解");
        let objective_value = model.solve()?;
        let table = model.collect_results()?;

        // Step 7: 驗證
        if self.config.verify_solution {
            tracing::debug!("Step 7: 驗證結果");
            warnings.extend(model.verifier(self.config.tolerance).verify(&table));
        }

        let report = PlanReport {
            run_id: Uuid::new_v4(),
            solved_at: Utc::now(),
            solve_time_ms: start_time.elapsed().as_millis() as u64,
            objective_value,
            table,
            warnings,
        };

        tracing::info!("供應計劃完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "結果 {} 列，總成本 {}，警告 {} 筆",
            report.table.len(),
            report.objective_value,
            report.warnings.len()
        );

        Ok(report)
    }
}
