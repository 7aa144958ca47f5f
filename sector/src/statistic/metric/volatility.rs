//! Volatility 波动率模块
//!
//! 波动率以收益率的样本标准差衡量。假设收益率独立同分布（IID），
//! 波动率随时间按平方根缩放：日波动率 × √252 ≈ 年化波动率。
//!
//! # 参考文档
//!
//! <https://www.investopedia.com/terms/v/volatility.asp>

use crate::statistic::time::TimeInterval;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// 表示特定 [`TimeInterval`] 上的波动率。
///
/// ## 类型参数
///
/// - `Interval`: 收益率的时间间隔，例如 [`Daily`](crate::statistic::time::Daily)
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Volatility<Interval> {
    pub value: Decimal,
    pub interval: Interval,
}

impl<Interval> Volatility<Interval>
where
    Interval: TimeInterval,
{
    /// 由 `returns_period` 间隔收益率的样本标准差构造 [`Volatility`]。
    pub fn calculate(std_dev_returns: Decimal, returns_period: Interval) -> Self {
        Self {
            value: std_dev_returns.abs(),
            interval: returns_period,
        }
    }

    /// 将 [`Volatility`] 从当前 [`TimeInterval`] 缩放到 `target`。
    ///
    /// ## 缩放公式
    ///
    /// `scaled_value = value * sqrt(target_interval / current_interval)`
    pub fn scale<TargetInterval>(self, target: TargetInterval) -> Volatility<TargetInterval>
    where
        TargetInterval: TimeInterval,
    {
        let target_secs = Decimal::from(target.interval().num_seconds());
        let current_secs = Decimal::from(self.interval.interval().num_seconds());

        let scale = target_secs
            .abs()
            .checked_div(current_secs.abs())
            .and_then(|ratio| ratio.sqrt())
            .unwrap_or(Decimal::MAX);

        Volatility {
            value: self.value.checked_mul(scale).unwrap_or(Decimal::MAX),
            interval: target,
        }
    }
}
