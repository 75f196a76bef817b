//! 計劃配置與情境模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::{
    ensure_non_negative, CostTable, DemandTable, InitialInventory, PlanError, PlanningHorizon,
    ProductId, Result,
};

/// 求解與輸出參數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanConfig {
    /// 結果保留小數位數
    pub result_scale: u32,

    /// 驗證容差
    pub tolerance: Decimal,

    /// 求解後是否重新驗證需求平衡與產能
    pub verify_solution: bool,
}

impl PlanConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            result_scale: 6,
            tolerance: Decimal::new(1, 4),
            verify_solution: true,
        }
    }

    /// 建構器模式：設置結果小數位數
    pub fn with_result_scale(mut self, scale: u32) -> Self {
        self.result_scale = scale;
        self
    }

    /// 建構器模式：設置驗證容差
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    /// 建構器模式：設置是否驗證解
    pub fn with_verify_solution(mut self, verify: bool) -> Self {
        self.verify_solution = verify;
        self
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// 完整的供應計劃情境（可由 JSON 載入）
///
/// 需求以序列表示，第 i 筆對應時界中的第 i 期。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningScenario {
    pub products: Vec<ProductId>,

    pub periods: Vec<u32>,

    /// 省略時所有產品期初庫存為 0
    #[serde(default)]
    pub initial_inventory: Option<HashMap<ProductId, Decimal>>,

    pub demand: BTreeMap<ProductId, Vec<Decimal>>,

    pub capacity_per_period: Decimal,

    pub production_cost: HashMap<ProductId, Decimal>,

    pub inventory_cost: HashMap<ProductId, Decimal>,

    pub backlog_cost: HashMap<ProductId, Decimal>,
}

impl PlanningScenario {
    /// 兩產品、四期的示範情境
    pub fn example() -> Self {
        let a = ProductId::new("ProductA");
        let b = ProductId::new("ProductB");
        let d = |values: [i64; 4]| values.iter().map(|&v| Decimal::from(v)).collect::<Vec<_>>();
        let pair = |x: i64, y: i64| {
            HashMap::from([(a.clone(), Decimal::from(x)), (b.clone(), Decimal::from(y))])
        };

        Self {
            products: vec![a.clone(), b.clone()],
            periods: (0..4).collect(),
            initial_inventory: Some(pair(100, 50)),
            demand: BTreeMap::from([
                (a.clone(), d([120, 140, 160, 130])),
                (b.clone(), d([80, 90, 110, 100])),
            ]),
            capacity_per_period: Decimal::from(300),
            production_cost: pair(10, 12),
            inventory_cost: pair(2, 2),
            backlog_cost: pair(20, 20),
        }
    }

    /// 從 JSON 字串載入
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 從 JSON 檔案載入
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn horizon(&self) -> Result<PlanningHorizon> {
        PlanningHorizon::from_periods(self.periods.iter().copied())
    }

    /// 將需求序列對應到時界各期
    pub fn demand_table(&self) -> Result<DemandTable> {
        let horizon = self.horizon()?;
        let mut table = DemandTable::new();

        for (product, series) in &self.demand {
            if series.len() > horizon.len() {
                return Err(PlanError::InvalidHorizon(format!(
                    "產品 {} 的需求有 {} 期，超過時界 {} 期",
                    product,
                    series.len(),
                    horizon.len()
                )));
            }
            for (period, &quantity) in horizon.iter().zip(series) {
                table.insert(product.clone(), period, quantity)?;
            }
        }

        Ok(table)
    }

    /// 期初庫存（省略時回傳 None）
    pub fn initial_inventory(&self) -> Result<Option<InitialInventory>> {
        let Some(on_hand) = &self.initial_inventory else {
            return Ok(None);
        };

        let mut inventory = InitialInventory::new();
        for (product, &quantity) in on_hand {
            inventory.set(product.clone(), quantity)?;
        }
        Ok(Some(inventory))
    }

    pub fn cost_table(&self) -> Result<CostTable> {
        CostTable::from_maps(
            self.production_cost.clone(),
            self.inventory_cost.clone(),
            self.backlog_cost.clone(),
        )
    }

    pub fn capacity(&self) -> Result<Decimal> {
        ensure_non_negative(self.capacity_per_period, || "每期產能".to_string())
    }
}
