//! 求解結果驗證
//!
//! 以輸入資料重新檢查需求平衡、產能與非負條件，
//! 發現的問題以警告回報，不中斷計劃。

use plan_core::{DemandTable, InitialInventory, PlanTable, PlanningHorizon, ProductId};
use rust_decimal::Decimal;

use crate::PlanWarning;

/// 計劃結果驗證器
pub struct PlanVerifier<'a> {
    products: &'a [ProductId],
    horizon: &'a PlanningHorizon,
    initial_inventory: &'a InitialInventory,
    demand: Option<&'a DemandTable>,
    capacity: Option<Decimal>,
    tolerance: Decimal,
}

impl<'a> PlanVerifier<'a> {
    pub fn new(
        products: &'a [ProductId],
        horizon: &'a PlanningHorizon,
        initial_inventory: &'a InitialInventory,
        tolerance: Decimal,
    ) -> Self {
        Self {
            products,
            horizon,
            initial_inventory,
            demand: None,
            capacity: None,
            tolerance: tolerance.abs(),
        }
    }

    /// 建構器模式：設置需求（None 時略過需求平衡檢查）
    pub fn with_demand(mut self, demand: Option<&'a DemandTable>) -> Self {
        self.demand = demand;
        self
    }

    /// 建構器模式：設置每期產能（None 時略過產能檢查）
    pub fn with_capacity(mut self, capacity: Option<Decimal>) -> Self {
        self.capacity = capacity;
        self
    }

    /// 驗證計劃結果
    pub fn verify(&self, table: &PlanTable) -> Vec<PlanWarning> {
        let mut warnings = Vec::new();

        for product in self.products {
            self.verify_product(table, product, &mut warnings);
        }
        self.verify_capacity(table, &mut warnings);

        tracing::debug!("驗證完成，警告 {} 筆", warnings.len());
        warnings
    }

    fn verify_product(&self, table: &PlanTable, product: &ProductId, warnings: &mut Vec<PlanWarning>) {
        let mut prev_inventory = self
            .initial_inventory
            .get(product)
            .unwrap_or(Decimal::ZERO);
        let mut prev_backlog = Decimal::ZERO;
        let mut max_backlog = Decimal::ZERO;

        for period in self.horizon.iter() {
            let Some(row) = table.row(product, period) else {
                // 前後期無法銜接，其餘期間不再檢查
                warnings.push(PlanWarning::error(
                    product.to_string(),
                    format!("缺少期間 {} 的結果", period),
                ));
                break;
            };

            for (label, value) in [
                ("生產", row.production),
                ("庫存", row.inventory),
                ("欠交", row.backlog),
            ] {
                if value < -self.tolerance {
                    warnings.push(PlanWarning::error(
                        product.to_string(),
                        format!("期間 {} {}為負: {}", period, label, value),
                    ));
                }
            }

            if let Some(required) = self.demand.and_then(|d| d.get(product, period)) {
                let residual = prev_inventory + row.production - row.inventory + row.backlog
                    - prev_backlog
                    - required;
                if residual.abs() > self.tolerance {
                    warnings.push(PlanWarning::error(
                        product.to_string(),
                        format!("期間 {} 需求平衡不成立，差額 {}", period, residual),
                    ));
                }
            }

            max_backlog = max_backlog.max(row.backlog);
            prev_inventory = row.inventory;
            prev_backlog = row.backlog;
        }

        if max_backlog > self.tolerance {
            warnings.push(PlanWarning::info(
                product.to_string(),
                format!("有欠交，最高 {}", max_backlog.normalize()),
            ));
        }
    }

    fn verify_capacity(&self, table: &PlanTable, warnings: &mut Vec<PlanWarning>) {
        let Some(capacity) = self.capacity else {
            return;
        };

        for period in self.horizon.iter() {
            let total = table.total_production(period);
            if total > capacity + self.tolerance {
                warnings.push(PlanWarning::error(
                    format!("period-{}", period),
                    format!("生產合計 {} 超過產能 {}", total, capacity),
                ));
            }
        }
    }
}
