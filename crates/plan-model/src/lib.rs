//! # Plan Model
//!
//! 多期多產品供應計劃的線性規劃模型：建構變數與約束、
//! 交由外部求解器求解、整理為結果表

pub mod builder;
pub mod formulation;
pub mod runner;
pub mod solver;
pub mod variables;
pub mod verify;

// Re-export 主要類型
pub use builder::{BuildPhase, SupplyPlanningModel};
pub use runner::PlanRunner;
pub use solver::{LinearSolver, LpSolution, MicroLpSolver};
pub use variables::{VariableGrid, VariableKind};
pub use verify::PlanVerifier;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// 一次計劃執行的報告
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    /// 執行ID
    pub run_id: Uuid,

    /// 求解完成時間
    pub solved_at: DateTime<Utc>,

    /// 計算耗時（毫秒）
    pub solve_time_ms: u64,

    /// 最優總成本
    pub objective_value: Decimal,

    /// 計劃結果
    pub table: plan_core::PlanTable,

    /// 驗證警告
    pub warnings: Vec<PlanWarning>,
}

impl PlanReport {
    /// 是否有錯誤等級的警告
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error)
    }
}

/// 計劃警告
#[derive(Debug, Clone, Serialize)]
pub struct PlanWarning {
    /// 對象（產品ID或期間）
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }

    pub fn error(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
