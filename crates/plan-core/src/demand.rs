//! 需求模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::{ensure_non_negative, Period, PlanError, ProductId, Result};

/// 需求表（產品 → 期間 → 需求數量）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandTable {
    entries: HashMap<ProductId, BTreeMap<Period, Decimal>>,
}

impl DemandTable {
    /// 創建空的需求表
    pub fn new() -> Self {
        Self::default()
    }

    /// 設置單一需求（覆蓋既有值）
    pub fn insert(&mut self, product: ProductId, period: Period, quantity: Decimal) -> Result<()> {
        let quantity = ensure_non_negative(quantity, || format!("需求 {}@{}", product, period))?;
        self.entries
            .entry(product)
            .or_default()
            .insert(period, quantity);
        Ok(())
    }

    /// 建構器模式：從 `start` 期起依序設置需求序列
    pub fn with_series(
        mut self,
        product: impl Into<ProductId>,
        start: Period,
        quantities: &[Decimal],
    ) -> Result<Self> {
        let product = product.into();
        for (offset, &quantity) in quantities.iter().enumerate() {
            let index = u32::try_from(offset)
                .ok()
                .and_then(|offset| start.0.checked_add(offset))
                .ok_or_else(|| {
                    PlanError::InvalidHorizon(format!(
                        "{} 的需求序列自 {} 起超出期間範圍",
                        product, start
                    ))
                })?;
            self.insert(product.clone(), Period(index), quantity)?;
        }
        Ok(self)
    }

    /// 查詢需求
    pub fn get(&self, product: &ProductId, period: Period) -> Option<Decimal> {
        self.entries.get(product)?.get(&period).copied()
    }

    /// 查詢需求，缺少時回傳 [`PlanError::MissingDemand`]
    pub fn require(&self, product: &ProductId, period: Period) -> Result<Decimal> {
        self.get(product, period).ok_or_else(|| PlanError::MissingDemand {
            product: product.to_string(),
            period: period.index(),
        })
    }

    /// 有需求記錄的產品
    pub fn products(&self) -> impl Iterator<Item = &ProductId> {
        self.entries.keys()
    }

    /// 某產品的總需求
    pub fn total_for(&self, product: &ProductId) -> Decimal {
        self.entries
            .get(product)
            .map(|series| series.values().copied().sum())
            .unwrap_or(Decimal::ZERO)
    }
}
