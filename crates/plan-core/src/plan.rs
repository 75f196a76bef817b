//! 計劃結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Period, ProductId};

/// 單一 (產品, 期間) 的計劃結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRow {
    /// 產品ID
    pub product: ProductId,

    /// 期間
    pub period: Period,

    /// 生產數量
    pub production: Decimal,

    /// 期末庫存
    pub inventory: Decimal,

    /// 期末欠交
    pub backlog: Decimal,
}

impl PlanRow {
    /// 創建新的計劃結果列
    pub fn new(
        product: ProductId,
        period: Period,
        production: Decimal,
        inventory: Decimal,
        backlog: Decimal,
    ) -> Self {
        Self {
            product,
            period,
            production,
            inventory,
            backlog,
        }
    }

    /// 檢查是否有欠交
    pub fn has_backlog(&self) -> bool {
        self.backlog > Decimal::ZERO
    }
}

/// 計劃結果表（產品為主序，期間為次序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTable {
    rows: Vec<PlanRow>,
}

impl PlanTable {
    pub fn new(rows: Vec<PlanRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 查詢單一列
    pub fn row(&self, product: &ProductId, period: Period) -> Option<&PlanRow> {
        self.rows
            .iter()
            .find(|r| &r.product == product && r.period == period)
    }

    /// 某產品的所有列（依期間排序）
    pub fn rows_for<'a>(&'a self, product: &'a ProductId) -> impl Iterator<Item = &'a PlanRow> + 'a {
        self.rows.iter().filter(move |r| &r.product == product)
    }

    /// 某期所有產品的生產合計
    pub fn total_production(&self, period: Period) -> Decimal {
        self.rows
            .iter()
            .filter(|r| r.period == period)
            .map(|r| r.production)
            .sum()
    }

    /// 所有列的欠交合計
    pub fn total_backlog(&self) -> Decimal {
        self.rows.iter().map(|r| r.backlog).sum()
    }
}

impl fmt::Display for PlanTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.product.as_str().len())
            .chain(std::iter::once("product".len()))
            .max()
            .unwrap_or(0);

        writeln!(
            f,
            "{:<width$}  {:>6}  {:>12}  {:>12}  {:>12}",
            "product", "period", "production", "inventory", "backlog"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<width$}  {:>6}  {:>12}  {:>12}  {:>12}",
                row.product.as_str(),
                row.period.to_string(),
                row.production.normalize().to_string(),
                row.inventory.normalize().to_string(),
                row.backlog.normalize().to_string(),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PlanTable {
        PlanTable::new(vec![
            PlanRow::new(
                ProductId::new("A"),
                Period(0),
                Decimal::from(20),
                Decimal::ZERO,
                Decimal::ZERO,
            ),
            PlanRow::new(
                ProductId::new("A"),
                Period(1),
                Decimal::from(140),
                Decimal::ZERO,
                Decimal::from(5),
            ),
            PlanRow::new(
                ProductId::new("B"),
                Period(0),
                Decimal::from(30),
                Decimal::from(10),
                Decimal::ZERO,
            ),
        ])
    }

    #[test]
    fn test_table_queries() {
        let table = sample_table();
        let a = ProductId::new("A");

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows_for(&a).count(), 2);
        assert_eq!(table.total_production(Period(0)), Decimal::from(50));
        assert_eq!(table.total_backlog(), Decimal::from(5));
        assert!(table.row(&a, Period(1)).unwrap().has_backlog());
        assert!(table.row(&ProductId::new("B"), Period(1)).is_none());
    }

    #[test]
    fn test_table_display() {
        let rendered = sample_table().to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("product"));
        assert!(lines[0].contains("backlog"));
        assert!(lines[2].contains("140"));
    }
}
