//! 成本模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::{ensure_non_negative, PlanError, ProductId, Result};

/// 成本類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostKind {
    /// 生產成本
    Production,
    /// 持有成本
    Holding,
    /// 欠交成本
    Backlog,
}

impl fmt::Display for CostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CostKind::Production => "生產",
            CostKind::Holding => "持有",
            CostKind::Backlog => "欠交",
        };
        f.write_str(label)
    }
}

/// 單位成本表（每產品每單位每期）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostTable {
    pub production: HashMap<ProductId, Decimal>,
    pub holding: HashMap<ProductId, Decimal>,
    pub backlog: HashMap<ProductId, Decimal>,
}

impl CostTable {
    /// 創建空的成本表
    pub fn new() -> Self {
        Self::default()
    }

    /// 從三張成本表建立，並檢查非負
    pub fn from_maps(
        production: HashMap<ProductId, Decimal>,
        holding: HashMap<ProductId, Decimal>,
        backlog: HashMap<ProductId, Decimal>,
    ) -> Result<Self> {
        let table = Self {
            production,
            holding,
            backlog,
        };
        for kind in [CostKind::Production, CostKind::Holding, CostKind::Backlog] {
            for (product, &cost) in table.map(kind) {
                ensure_non_negative(cost, || format!("{}成本 {}", kind, product))?;
            }
        }
        Ok(table)
    }

    /// 建構器模式：設置產品的三種單位成本
    pub fn with_product_costs(
        mut self,
        product: impl Into<ProductId>,
        production: Decimal,
        holding: Decimal,
        backlog: Decimal,
    ) -> Result<Self> {
        let product = product.into();
        for (kind, cost) in [
            (CostKind::Production, production),
            (CostKind::Holding, holding),
            (CostKind::Backlog, backlog),
        ] {
            let cost = ensure_non_negative(cost, || format!("{}成本 {}", kind, product))?;
            self.map_mut(kind).insert(product.clone(), cost);
        }
        Ok(self)
    }

    pub fn map(&self, kind: CostKind) -> &HashMap<ProductId, Decimal> {
        match kind {
            CostKind::Production => &self.production,
            CostKind::Holding => &self.holding,
            CostKind::Backlog => &self.backlog,
        }
    }

    fn map_mut(&mut self, kind: CostKind) -> &mut HashMap<ProductId, Decimal> {
        match kind {
            CostKind::Production => &mut self.production,
            CostKind::Holding => &mut self.holding,
            CostKind::Backlog => &mut self.backlog,
        }
    }

    /// 查詢單位成本，缺少時回傳 [`PlanError::MissingCost`]
    pub fn require(&self, kind: CostKind, product: &ProductId) -> Result<Decimal> {
        self.map(kind)
            .get(product)
            .copied()
            .ok_or_else(|| PlanError::MissingCost {
                kind,
                product: product.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_builder() {
        let costs = CostTable::new()
            .with_product_costs("ProductA", Decimal::from(10), Decimal::from(2), Decimal::from(20))
            .unwrap();
        let product = ProductId::new("ProductA");

        assert_eq!(costs.require(CostKind::Production, &product).unwrap(), Decimal::from(10));
        assert_eq!(costs.require(CostKind::Holding, &product).unwrap(), Decimal::from(2));
        assert_eq!(costs.require(CostKind::Backlog, &product).unwrap(), Decimal::from(20));
    }

    #[test]
    fn test_missing_cost() {
        let mut production = HashMap::new();
        production.insert(ProductId::new("A"), Decimal::from(3));
        let costs = CostTable::from_maps(production, HashMap::new(), HashMap::new()).unwrap();

        let err = costs.require(CostKind::Holding, &ProductId::new("A")).unwrap_err();
        assert!(matches!(
            err,
            PlanError::MissingCost { kind: CostKind::Holding, ref product } if product == "A"
        ));
        assert_eq!(err.to_string(), "找不到持有成本: A");
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut backlog = HashMap::new();
        backlog.insert(ProductId::new("A"), Decimal::from(-20));

        let result = CostTable::from_maps(HashMap::new(), HashMap::new(), backlog);
        assert!(matches!(result, Err(PlanError::NegativeQuantity(_))));
    }
}
