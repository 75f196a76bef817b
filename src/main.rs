//! 供應計劃示範程式
//!
//! 用法：`supply-plan [scenario.json]`，未指定檔案時使用內建的兩產品四期情境。

use anyhow::Context;
use plan_core::{PlanConfig, PlanningScenario};
use plan_model::{PlanRunner, WarningSeverity};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let scenario = match std::env::args().nth(1) {
        Some(path) => PlanningScenario::from_json_file(&path)
            .with_context(|| format!("無法載入情境檔案 {}", path))?,
        None => PlanningScenario::example(),
    };

    let report = PlanRunner::new(PlanConfig::default())
        .run(&scenario)
        .context("供應計劃失敗")?;

    println!("===== Supply Plan {} =====\n", report.run_id);
    print!("{}", report.table);
    println!("\nTotal cost: {}", report.objective_value.normalize());
    println!("Solved at:  {}", report.solved_at.to_rfc3339());

    for warning in &report.warnings {
        let tag = match warning.severity {
            WarningSeverity::Info => "INFO",
            WarningSeverity::Warning => "WARN",
            WarningSeverity::Error => "ERROR",
        };
        println!("[{}] {}: {}", tag, warning.subject, warning.message);
    }

    if report.has_errors() {
        anyhow::bail!("計劃結果驗證失敗");
    }
    Ok(())
}
