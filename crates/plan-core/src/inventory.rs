//! 期初庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ensure_non_negative, PlanError, ProductId, Result};

/// 期初庫存（僅用於第一期的需求平衡）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialInventory {
    on_hand: HashMap<ProductId, Decimal>,
}

impl InitialInventory {
    /// 創建空的期初庫存
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有產品期初庫存為 0
    pub fn zeros<'a>(products: impl IntoIterator<Item = &'a ProductId>) -> Self {
        Self {
            on_hand: products
                .into_iter()
                .map(|p| (p.clone(), Decimal::ZERO))
                .collect(),
        }
    }

    /// 建構器模式：設置產品期初庫存
    pub fn with_quantity(mut self, product: impl Into<ProductId>, quantity: Decimal) -> Result<Self> {
        self.set(product.into(), quantity)?;
        Ok(self)
    }

    /// 設置產品期初庫存
    pub fn set(&mut self, product: ProductId, quantity: Decimal) -> Result<()> {
        let quantity = ensure_non_negative(quantity, || format!("期初庫存 {}", product))?;
        self.on_hand.insert(product, quantity);
        Ok(())
    }

    pub fn get(&self, product: &ProductId) -> Option<Decimal> {
        self.on_hand.get(product).copied()
    }

    /// 查詢期初庫存，缺少時回傳 [`PlanError::MissingInitialInventory`]
    pub fn require(&self, product: &ProductId) -> Result<Decimal> {
        self.get(product)
            .ok_or_else(|| PlanError::MissingInitialInventory(product.to_string()))
    }

    /// 所有產品期初庫存合計
    pub fn total(&self) -> Decimal {
        self.on_hand.values().copied().sum()
    }
}
