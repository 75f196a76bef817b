//! 決策變數表

use plan_core::{Period, PlanningHorizon, ProductId};

use crate::formulation::{Formulation, VarId};

/// 決策變數種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// 生產數量
    Production,
    /// 期末庫存
    Inventory,
    /// 期末欠交
    Backlog,
}

impl VariableKind {
    pub const ALL: [VariableKind; 3] = [
        VariableKind::Production,
        VariableKind::Inventory,
        VariableKind::Backlog,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VariableKind::Production => "production",
            VariableKind::Inventory => "inventory",
            VariableKind::Backlog => "backlog",
        }
    }

    fn offset(self) -> usize {
        match self {
            VariableKind::Production => 0,
            VariableKind::Inventory => 1,
            VariableKind::Backlog => 2,
        }
    }
}

/// 固定形狀的 (種類, 產品, 期間) 變數表
///
/// 建立時即涵蓋完整的產品 × 期間格，查詢不會遺漏。
#[derive(Debug, Clone)]
pub struct VariableGrid {
    products: Vec<ProductId>,
    horizon: PlanningHorizon,
    vars: Vec<VarId>,
}

impl VariableGrid {
    /// 為每個 (種類, 產品, 期間) 宣告一個非負連續變數
    pub fn declare(
        formulation: &mut Formulation,
        products: &[ProductId],
        horizon: &PlanningHorizon,
    ) -> Self {
        let mut vars = Vec::with_capacity(3 * products.len() * horizon.len());
        for kind in VariableKind::ALL {
            for product in products {
                for period in horizon.iter() {
                    vars.push(formulation.add_variable(format!(
                        "{}_{}_{}",
                        kind.label(),
                        product,
                        period
                    )));
                }
            }
        }

        Self {
            products: products.to_vec(),
            horizon: horizon.clone(),
            vars,
        }
    }

    /// 查詢變數（產品或期間不在表內時回傳 None）
    pub fn get(&self, kind: VariableKind, product: &ProductId, period: Period) -> Option<VarId> {
        let p = self.products.iter().position(|x| x == product)?;
        let t = self.horizon.position(period)?;
        Some(self.at(kind, p, t))
    }

    /// 依位置查詢變數
    pub(crate) fn at(&self, kind: VariableKind, product_pos: usize, period_pos: usize) -> VarId {
        let per_kind = self.products.len() * self.horizon.len();
        self.vars[kind.offset() * per_kind + product_pos * self.horizon.len() + period_pos]
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
