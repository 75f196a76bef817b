//! 與求解器無關的線性規劃表示
//!
//! 模型建構器只產生這裡的資料結構，求解時才轉換給外部求解器，
//! 因此同一個模型可以重複求解，也可以在不求解的情況下檢查約束。

use std::fmt;

/// 決策變數索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// 線性運算式 `Σ coef·x + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入一項
    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// 加入一項（係數為 0 時忽略）
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        if coefficient != 0.0 {
            self.terms.push((var, coefficient));
        }
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// 以變數值計算運算式
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coef)| coef * values.get(var.0).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }
}

/// 約束方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// `expr == rhs`
    Equal,
    /// `expr <= rhs`
    LessOrEqual,
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintSense::Equal => f.write_str("=="),
            ConstraintSense::LessOrEqual => f.write_str("<="),
        }
    }
}

/// 線性約束
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub sense: ConstraintSense,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(name: impl Into<String>, expr: LinearExpr, sense: ConstraintSense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            sense,
            rhs,
        }
    }

    /// 約束左右差值（`expr - rhs`）
    pub fn slack(&self, values: &[f64]) -> f64 {
        self.expr.evaluate(values) - self.rhs
    }

    /// 檢查約束是否在容差內成立
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let slack = self.slack(values);
        match self.sense {
            ConstraintSense::Equal => slack.abs() <= tolerance,
            ConstraintSense::LessOrEqual => slack <= tolerance,
        }
    }
}

/// 最小化線性規劃：非負連續變數、線性約束、線性目標
#[derive(Debug, Clone, Default)]
pub struct Formulation {
    variables: Vec<String>,
    constraints: Vec<LinearConstraint>,
    objective: Option<LinearExpr>,
}

impl Formulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 宣告非負連續變數
    pub fn add_variable(&mut self, name: impl Into<String>) -> VarId {
        self.variables.push(name.into());
        VarId(self.variables.len() - 1)
    }

    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// 設置最小化目標（覆蓋既有目標）
    pub fn set_objective(&mut self, objective: LinearExpr) -> Option<LinearExpr> {
        self.objective.replace(objective)
    }

    pub fn variable_name(&self, var: VarId) -> Option<&str> {
        self.variables.get(var.0).map(String::as_str)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&LinearExpr> {
        self.objective.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_evaluation() {
        let mut f = Formulation::new();
        let x = f.add_variable("x");
        let y = f.add_variable("y");

        let mut expr = LinearExpr::new().with_term(x, 2.0).with_term(y, -1.0);
        expr.add_constant(3.0);
        expr.add_term(y, 0.0);

        assert_eq!(expr.terms.len(), 2);
        assert_eq!(expr.evaluate(&[4.0, 1.0]), 10.0);
        assert_eq!(f.variable_name(y), Some("y"));
    }

    #[test]
    fn test_constraint_satisfaction() {
        let x = VarId(0);
        let eq = LinearConstraint::new("eq", LinearExpr::new().with_term(x, 1.0), ConstraintSense::Equal, 5.0);
        let le = LinearConstraint::new("le", LinearExpr::new().with_term(x, 1.0), ConstraintSense::LessOrEqual, 5.0);

        assert!(eq.is_satisfied(&[5.0 + 1e-9], 1e-6));
        assert!(!eq.is_satisfied(&[4.0], 1e-6));
        assert!(le.is_satisfied(&[4.0], 1e-6));
        assert!(!le.is_satisfied(&[6.0], 1e-6));
    }

    #[test]
    fn test_objective_overwrite() {
        let mut f = Formulation::new();
        let x = f.add_variable("x");

        assert!(f.set_objective(LinearExpr::new().with_term(x, 1.0)).is_none());
        let previous = f.set_objective(LinearExpr::new().with_term(x, 2.0));

        assert_eq!(previous.unwrap().terms, vec![(x, 1.0)]);
        assert_eq!(f.objective().unwrap().terms, vec![(x, 2.0)]);
    }
}
