//! 計劃期間模型

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PlanError, Result};

/// 計劃期間（整數索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(pub u32);

impl Period {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Period {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// 計劃時界
///
/// 嚴格遞增且不中斷的期間序列。前一期以序列位置查找，
/// 不依賴 `t - 1` 的算術。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawHorizon")]
pub struct PlanningHorizon {
    periods: Vec<Period>,
}

/// 反序列化用的未驗證形式
#[derive(Deserialize)]
struct RawHorizon {
    periods: Vec<Period>,
}

impl TryFrom<RawHorizon> for PlanningHorizon {
    type Error = PlanError;

    fn try_from(raw: RawHorizon) -> Result<Self> {
        Self::from_periods(raw.periods)
    }
}

impl PlanningHorizon {
    /// 創建從 0 開始、共 `count` 期的時界
    pub fn new(count: u32) -> Self {
        Self {
            periods: (0..count).map(Period).collect(),
        }
    }

    /// 從期間清單創建時界
    ///
    /// 期間必須嚴格遞增且連續（起點不限），否則回傳
    /// [`PlanError::InvalidHorizon`]。
    pub fn from_periods<I>(periods: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Period>,
    {
        let periods: Vec<Period> = periods.into_iter().map(Into::into).collect();

        for pair in periods.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next <= prev {
                return Err(PlanError::InvalidHorizon(format!(
                    "期間必須嚴格遞增: {} 之後為 {}",
                    prev, next
                )));
            }
            if next.0 != prev.0 + 1 {
                return Err(PlanError::InvalidHorizon(format!(
                    "期間不可中斷: {} 與 {} 之間有缺口",
                    prev, next
                )));
            }
        }

        Ok(Self { periods })
    }

    /// 第一期
    pub fn first(&self) -> Option<Period> {
        self.periods.first().copied()
    }

    /// 前一期（第一期或不在時界內時回傳 None）
    pub fn predecessor(&self, period: Period) -> Option<Period> {
        match self.position(period)? {
            0 => None,
            pos => Some(self.periods[pos - 1]),
        }
    }

    /// 期間在時界中的位置
    pub fn position(&self, period: Period) -> Option<usize> {
        let first = self.first()?;
        let offset = period.0.checked_sub(first.0)? as usize;
        (offset < self.periods.len()).then_some(offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = Period> + '_ {
        self.periods.iter().copied()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
