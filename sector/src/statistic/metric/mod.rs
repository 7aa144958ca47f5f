//! Metric 指标模块
//!
//! 日收益率统计量的带时间间隔版本，可以在 [`TimeInterval`](super::time::TimeInterval)
//! 之间相互转换。
//!
//! # 核心指标
//!
//! - **Volatility**: 波动率，按平方根缩放
//! - **MeanReturn**: 平均收益率，按线性缩放

/// Mean Return 平均收益率计算逻辑。
pub mod mean_return;

/// Volatility 波动率计算逻辑。
pub mod volatility;
