//! 供應計劃模型建構器

use plan_core::{
    product, CostKind, CostTable, DemandTable, InitialInventory, PlanError, PlanRow, PlanTable,
    PlanningHorizon, ProductId, Result,
};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::fmt;

use crate::formulation::{ConstraintSense, Formulation, LinearConstraint, LinearExpr};
use crate::solver::{LinearSolver, LpSolution, MicroLpSolver};
use crate::variables::{VariableGrid, VariableKind};
use crate::verify::PlanVerifier;

/// 建構階段
///
/// 依序前進；各操作只在允許的階段執行，否則回傳
/// [`PlanError::OutOfOrder`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildPhase {
    Unconfigured,
    Configured,
    VariablesDeclared,
    ConstraintsAdded,
    ObjectiveSet,
    Solved,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 可加入約束或目標的階段
const BUILDING: &[BuildPhase] = &[
    BuildPhase::VariablesDeclared,
    BuildPhase::ConstraintsAdded,
    BuildPhase::ObjectiveSet,
];

/// 多期多產品供應計劃模型
///
/// 每個實例只對應一次計劃：建構、求解、讀取結果。求解後不可再加入約束，
/// 但可重複求解未修改的模型。
pub struct SupplyPlanningModel<S = MicroLpSolver> {
    solver: S,
    phase: BuildPhase,
    products: Vec<ProductId>,
    horizon: PlanningHorizon,
    formulation: Formulation,
    grid: Option<VariableGrid>,
    initial_inventory: InitialInventory,
    demand: Option<DemandTable>,
    capacity: Option<Decimal>,
    solution: Option<LpSolution>,
    result_scale: u32,
}

impl SupplyPlanningModel {
    /// 以預設求解器創建模型
    pub fn new() -> Self {
        Self::with_solver(MicroLpSolver)
    }
}

impl Default for SupplyPlanningModel {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LinearSolver> SupplyPlanningModel<S> {
    /// 以指定求解器創建模型
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            phase: BuildPhase::Unconfigured,
            products: Vec::new(),
            horizon: PlanningHorizon::default(),
            formulation: Formulation::new(),
            grid: None,
            initial_inventory: InitialInventory::new(),
            demand: None,
            capacity: None,
            solution: None,
            result_scale: 6,
        }
    }

    /// 建構器模式：設置結果小數位數
    pub fn with_result_scale(mut self, scale: u32) -> Self {
        self.result_scale = scale;
        self
    }

    /// 設置產品與計劃時界
    pub fn configure(&mut self, products: Vec<ProductId>, horizon: PlanningHorizon) -> Result<()> {
        self.expect_phase("configure", &[BuildPhase::Unconfigured])?;
        product::ensure_unique(&products)?;

        tracing::info!("設置模型: 產品 {} 個, 期間 {} 期", products.len(), horizon.len());
        if products.is_empty() || horizon.is_empty() {
            tracing::warn!("產品或期間為空，模型將退化為零成本");
        }

        self.products = products;
        self.horizon = horizon;
        self.phase = BuildPhase::Configured;
        Ok(())
    }

    /// 宣告生產、庫存、欠交三組非負變數
    ///
    /// 未提供期初庫存時所有產品視為 0；提供時必須涵蓋每個產品。
    pub fn declare_variables(&mut self, initial_inventory: Option<&InitialInventory>) -> Result<()> {
        self.expect_phase("declare_variables", &[BuildPhase::Configured])?;

        self.initial_inventory = match initial_inventory {
            None => InitialInventory::zeros(&self.products),
            Some(provided) => {
                let mut inventory = InitialInventory::new();
                for product in &self.products {
                    inventory.set(product.clone(), provided.require(product)?)?;
                }
                inventory
            }
        };

        let grid = VariableGrid::declare(&mut self.formulation, &self.products, &self.horizon);
        tracing::debug!("宣告變數 {} 個", grid.len());

        self.grid = Some(grid);
        self.phase = BuildPhase::VariablesDeclared;
        Ok(())
    }

    /// 加入需求平衡約束（每個產品每期一條等式）
    ///
    /// 第一期：`期初庫存 + 生產 - 庫存 + 欠交 = 需求`；
    /// 其後各期：`前期庫存 + 生產 - 庫存 + 欠交 - 前期欠交 = 需求`。
    pub fn add_demand_balance(&mut self, demand: &DemandTable) -> Result<()> {
        self.expect_phase("add_demand_balance", BUILDING)?;
        if self.demand.is_some() {
            return Err(self.out_of_order("add_demand_balance（重複）"));
        }
        let grid = self.variable_grid("add_demand_balance")?;

        let mut constraints = Vec::with_capacity(self.products.len() * self.horizon.len());
        for (p, product) in self.products.iter().enumerate() {
            let initial = to_f64(self.initial_inventory.require(product)?, "期初庫存")?;

            for (t, period) in self.horizon.iter().enumerate() {
                let required = to_f64(demand.require(product, period)?, "需求")?;

                let mut expr = LinearExpr::new()
                    .with_term(grid.at(VariableKind::Production, p, t), 1.0)
                    .with_term(grid.at(VariableKind::Inventory, p, t), -1.0)
                    .with_term(grid.at(VariableKind::Backlog, p, t), 1.0);

                // 時界序列中的前一期
                match self.horizon.predecessor(period) {
                    None => expr.add_constant(initial),
                    Some(prev) => {
                        let cell = |kind| {
                            grid.get(kind, product, prev).ok_or_else(|| {
                                PlanError::InvalidHorizon(format!("前一期 {} 沒有變數", prev))
                            })
                        };
                        expr.add_term(cell(VariableKind::Inventory)?, 1.0);
                        expr.add_term(cell(VariableKind::Backlog)?, -1.0);
                    }
                }

                constraints.push(LinearConstraint::new(
                    format!("balance_{}_{}", product, period),
                    expr,
                    ConstraintSense::Equal,
                    required,
                ));
            }
        }

        tracing::debug!("加入需求平衡約束 {} 條", constraints.len());
        for constraint in constraints {
            self.formulation.add_constraint(constraint);
        }

        self.demand = Some(demand.clone());
        self.phase = self.phase.max(BuildPhase::ConstraintsAdded);
        Ok(())
    }

    /// 加入產能約束：每期所有產品生產合計不超過同一上限
    pub fn add_capacity(&mut self, capacity_per_period: Decimal) -> Result<()> {
        self.expect_phase("add_capacity", BUILDING)?;
        if self.capacity.is_some() {
            return Err(self.out_of_order("add_capacity（重複）"));
        }
        if capacity_per_period.is_sign_negative() && !capacity_per_period.is_zero() {
            return Err(PlanError::NegativeQuantity(format!(
                "每期產能 = {}",
                capacity_per_period
            )));
        }
        let grid = self.variable_grid("add_capacity")?;
        let limit = to_f64(capacity_per_period, "每期產能")?;

        let constraints: Vec<LinearConstraint> = self
            .horizon
            .iter()
            .enumerate()
            .map(|(t, period)| {
                let mut expr = LinearExpr::new();
                for p in 0..self.products.len() {
                    expr.add_term(grid.at(VariableKind::Production, p, t), 1.0);
                }
                LinearConstraint::new(
                    format!("capacity_{}", period),
                    expr,
                    ConstraintSense::LessOrEqual,
                    limit,
                )
            })
            .collect();

        tracing::debug!("加入產能約束 {} 條, 上限 {}", constraints.len(), capacity_per_period);
        for constraint in constraints {
            self.formulation.add_constraint(constraint);
        }

        self.capacity = Some(capacity_per_period);
        self.phase = self.phase.max(BuildPhase::ConstraintsAdded);
        Ok(())
    }

    /// 設置最小化總成本目標（重複呼叫會覆蓋）
    pub fn set_objective(&mut self, costs: &CostTable) -> Result<()> {
        self.expect_phase("set_objective", BUILDING)?;
        let grid = self.variable_grid("set_objective")?;

        let mut objective = LinearExpr::new();
        for (p, product) in self.products.iter().enumerate() {
            for (kind, cost_kind) in [
                (VariableKind::Production, CostKind::Production),
                (VariableKind::Inventory, CostKind::Holding),
                (VariableKind::Backlog, CostKind::Backlog),
            ] {
                let unit_cost = to_f64(costs.require(cost_kind, product)?, "單位成本")?;
                if unit_cost < 0.0 {
                    return Err(PlanError::NegativeQuantity(format!(
                        "{}成本 {} = {}",
                        cost_kind, product, unit_cost
                    )));
                }
                for t in 0..self.horizon.len() {
                    objective.add_term(grid.at(kind, p, t), unit_cost);
                }
            }
        }

        if self.formulation.set_objective(objective).is_some() {
            tracing::debug!("覆蓋既有目標函數");
        }
        self.phase = BuildPhase::ObjectiveSet;
        Ok(())
    }

    /// 求解模型，回傳最優目標值
    ///
    /// 不可行、無界或求解器失敗時回傳對應錯誤，模型保持在求解前的階段。
    pub fn solve(&mut self) -> Result<Decimal> {
        self.expect_phase("solve", &[BuildPhase::ObjectiveSet, BuildPhase::Solved])?;
        if self.demand.is_none() {
            tracing::warn!("未加入需求平衡約束，最優解將是全部為 0");
        }

        tracing::info!(
            "開始求解: 變數 {} 個, 約束 {} 條",
            self.formulation.variable_count(),
            self.formulation.constraints().len()
        );

        let solution = match self.solver.solve(&self.formulation) {
            Ok(solution) => solution,
            Err(err) => {
                tracing::warn!("求解失敗: {}", err);
                self.solution = None;
                self.phase = BuildPhase::ObjectiveSet;
                return Err(err);
            }
        };

        let objective = to_decimal(solution.objective, self.result_scale)?;
        tracing::info!("求解完成，總成本 {}", objective);

        self.solution = Some(solution);
        self.phase = BuildPhase::Solved;
        Ok(objective)
    }

    /// 讀取求解結果，每個 (產品, 期間) 一列
    pub fn collect_results(&self) -> Result<PlanTable> {
        self.expect_phase("collect_results", &[BuildPhase::Solved])?;
        let grid = self.variable_grid("collect_results")?;
        let solution = self
            .solution
            .as_ref()
            .ok_or_else(|| self.out_of_order("collect_results"))?;

        let value = |kind: VariableKind, p: usize, t: usize| -> Result<Decimal> {
            let var = grid.at(kind, p, t);
            let raw = solution.value(var).ok_or_else(|| {
                PlanError::Solver(format!("缺少變數值: {}", var.index()))
            })?;
            to_decimal(raw, self.result_scale)
        };

        let mut rows = Vec::with_capacity(self.products.len() * self.horizon.len());
        for (p, product) in self.products.iter().enumerate() {
            for (t, period) in self.horizon.iter().enumerate() {
                rows.push(PlanRow::new(
                    product.clone(),
                    period,
                    value(VariableKind::Production, p, t)?,
                    value(VariableKind::Inventory, p, t)?,
                    value(VariableKind::Backlog, p, t)?,
                ));
            }
        }

        Ok(PlanTable::new(rows))
    }

    /// 以模型的輸入建立結果驗證器
    pub fn verifier(&self, tolerance: Decimal) -> PlanVerifier<'_> {
        PlanVerifier::new(
            &self.products,
            &self.horizon,
            &self.initial_inventory,
            tolerance,
        )
        .with_demand(self.demand.as_ref())
        .with_capacity(self.capacity)
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    pub fn products(&self) -> &[ProductId] {
        &self.products
    }

    pub fn horizon(&self) -> &PlanningHorizon {
        &self.horizon
    }

    /// 已組裝的線性規劃（不需求解即可檢查）
    pub fn formulation(&self) -> &Formulation {
        &self.formulation
    }

    pub fn variables(&self) -> Option<&VariableGrid> {
        self.grid.as_ref()
    }

    /// 最近一次求解的目標值
    pub fn objective_value(&self) -> Option<Decimal> {
        let solution = self.solution.as_ref()?;
        to_decimal(solution.objective, self.result_scale).ok()
    }

    fn expect_phase(&self, operation: &str, allowed: &[BuildPhase]) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(self.out_of_order(operation))
        }
    }

    fn out_of_order(&self, operation: &str) -> PlanError {
        PlanError::OutOfOrder {
            operation: operation.to_string(),
            phase: self.phase.to_string(),
        }
    }

    fn variable_grid(&self, operation: &str) -> Result<&VariableGrid> {
        self.grid.as_ref().ok_or_else(|| self.out_of_order(operation))
    }
}

fn to_f64(value: Decimal, what: &str) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| PlanError::Conversion(format!("{} {} 無法轉為浮點數", what, value)))
}

/// 將求解器的浮點值轉為指定小數位數的 Decimal（-0 正規化為 0）
fn to_decimal(value: f64, scale: u32) -> Result<Decimal> {
    let decimal = Decimal::from_f64(value)
        .ok_or_else(|| PlanError::Conversion(format!("求解值 {} 無法轉為 Decimal", value)))?
        .round_dp(scale);
    Ok(if decimal.is_zero() { Decimal::ZERO } else { decimal })
}
