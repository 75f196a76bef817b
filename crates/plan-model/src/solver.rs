//! 外部線性規劃求解器介接

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable,
};
use plan_core::{PlanError, Result};

use crate::formulation::{ConstraintSense, Formulation, LinearExpr};

/// 純常數約束的判斷容差
const CONSTANT_TOLERANCE: f64 = 1e-9;

/// 求解結果（最優解）
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// 依 [`crate::formulation::VarId`] 排列的變數值
    pub values: Vec<f64>,

    /// 目標函數值
    pub objective: f64,
}

impl LpSolution {
    pub fn value(&self, var: crate::formulation::VarId) -> Option<f64> {
        self.values.get(var.index()).copied()
    }
}

/// 線性規劃求解器
pub trait LinearSolver {
    /// 求解最小化問題；不可行、無界或求解器失敗時回傳對應錯誤
    fn solve(&self, formulation: &Formulation) -> Result<LpSolution>;
}

/// 以 good_lp 的 microlp 後端求解
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl LinearSolver for MicroLpSolver {
    fn solve(&self, formulation: &Formulation) -> Result<LpSolution> {
        let objective = formulation.objective().cloned().unwrap_or_default();

        // 不含變數的約束直接判斷，不交給求解器
        for c in formulation.constraints().iter().filter(|c| c.expr.is_constant()) {
            if !c.is_satisfied(&[], CONSTANT_TOLERANCE) {
                tracing::debug!("常數約束 {} 不成立", c.name);
                return Err(PlanError::Infeasible);
            }
        }

        if formulation.variable_count() == 0 {
            tracing::debug!("模型沒有變數，直接回傳空解");
            return Ok(LpSolution {
                values: Vec::new(),
                objective: objective.constant,
            });
        }

        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = (0..formulation.variable_count())
            .map(|i| {
                let name = formulation
                    .variable_name(crate::formulation::VarId(i))
                    .unwrap_or_default()
                    .to_string();
                vars.add(variable().min(0).name(name))
            })
            .collect();

        let mut problem = vars
            .minimise(to_expression(&objective, &handles))
            .using(default_solver);

        let mut translated = 0usize;
        for c in formulation.constraints().iter().filter(|c| !c.expr.is_constant()) {
            let lhs = to_expression(&c.expr, &handles);
            let rhs = c.rhs;
            problem = match c.sense {
                ConstraintSense::Equal => problem.with(constraint!(lhs == rhs)),
                ConstraintSense::LessOrEqual => problem.with(constraint!(lhs <= rhs)),
            };
            translated += 1;
        }

        tracing::debug!(
            "交給求解器: 變數 {} 個, 約束 {} 個",
            handles.len(),
            translated
        );

        let solution = problem.solve().map_err(resolution_error)?;
        let values: Vec<f64> = handles.iter().map(|&v| solution.value(v)).collect();
        let objective = objective.evaluate(&values);

        Ok(LpSolution { values, objective })
    }
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from(expr.constant);
    for &(var, coef) in &expr.terms {
        out += coef * handles[var.index()];
    }
    out
}

fn resolution_error(err: ResolutionError) -> PlanError {
    match err {
        ResolutionError::Infeasible => PlanError::Infeasible,
        ResolutionError::Unbounded => PlanError::Unbounded,
        other => PlanError::Solver(other.to_string()),
    }
}
