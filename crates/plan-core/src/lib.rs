//! # Plan Core
//!
//! 供應計劃的核心資料模型與類型定義

pub mod config;
pub mod cost;
pub mod demand;
pub mod horizon;
pub mod inventory;
pub mod plan;
pub mod product;

// Re-export 主要類型
pub use config::{PlanConfig, PlanningScenario};
pub use cost::{CostKind, CostTable};
pub use demand::DemandTable;
pub use horizon::{Period, PlanningHorizon};
pub use inventory::InitialInventory;
pub use plan::{PlanRow, PlanTable};
pub use product::ProductId;

/// 供應計劃錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("重複的產品: {0}")]
    DuplicateProduct(String),

    #[error("無效的計劃期間: {0}")]
    InvalidHorizon(String),

    #[error("找不到需求: 產品 {product}, 期間 {period}")]
    MissingDemand { product: String, period: u32 },

    #[error("找不到期初庫存: {0}")]
    MissingInitialInventory(String),

    #[error("找不到{kind}成本: {product}")]
    MissingCost { kind: CostKind, product: String },

    #[error("數量不可為負: {0}")]
    NegativeQuantity(String),

    #[error("步驟順序錯誤: {operation} 不可在 {phase} 階段執行")]
    OutOfOrder { operation: String, phase: String },

    #[error("模型不可行")]
    Infeasible,

    #[error("模型無界")]
    Unbounded,

    #[error("求解器錯誤: {0}")]
    Solver(String),

    #[error("數值轉換錯誤: {0}")]
    Conversion(String),

    #[error("情境解析錯誤: {0}")]
    Scenario(#[from] serde_json::Error),

    #[error("讀取檔案錯誤: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;

/// 檢查數量非負，回傳原值
pub(crate) fn ensure_non_negative(
    quantity: rust_decimal::Decimal,
    what: impl FnOnce() -> String,
) -> Result<rust_decimal::Decimal> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(PlanError::NegativeQuantity(format!("{} = {}", what(), quantity)));
    }
    Ok(quantity)
}
