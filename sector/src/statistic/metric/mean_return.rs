//! Mean Return 平均收益率模块
//!
//! 平均收益率随时间线性缩放：1% 的平均日收益率缩放为约 252% 的年化收益率
//! （而不是 √252%）。这假设简单利息而不是复利。
//!
//! # 参考文档
//!
//! <https://www.investopedia.com/terms/r/rateofreturn.asp>

use crate::statistic::time::TimeInterval;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 表示特定 [`TimeInterval`] 上的平均收益率。
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct MeanReturn<Interval> {
    pub value: Decimal,
    pub interval: Interval,
}

impl<Interval> MeanReturn<Interval>
where
    Interval: TimeInterval,
{
    pub fn calculate(mean_return: Decimal, returns_period: Interval) -> Self {
        Self {
            value: mean_return,
            interval: returns_period,
        }
    }

    /// 将 [`MeanReturn`] 从当前 [`TimeInterval`] 线性缩放到 `target`。
    ///
    /// `scaled_value = value * (target_interval / current_interval)`
    pub fn scale<TargetInterval>(self, target: TargetInterval) -> MeanReturn<TargetInterval>
    where
        TargetInterval: TimeInterval,
    {
        let target_secs = Decimal::from(target.interval().num_seconds());
        let current_secs = Decimal::from(self.interval.interval().num_seconds());

        let scale = target_secs
            .abs()
            .checked_div(current_secs.abs())
            .unwrap_or(Decimal::MAX);

        MeanReturn {
            value: self.value.checked_mul(scale).unwrap_or(Decimal::MAX),
            interval: target,
        }
    }
}
