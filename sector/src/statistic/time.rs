//! TimeInterval 时间间隔模块
//!
//! 日收益率统计量可以被缩放到其它时间间隔，例如年化波动率。
//!
//! # 核心概念
//!
//! - **TimeInterval**: Trait，定义时间间隔接口
//! - **Daily**: 单个交易日，收益率序列的原生间隔
//! - **Annual252**: 252 个交易日的年化间隔（美国股票市场）

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use std::fmt::Debug;

/// 表示用于金融计算的时间间隔类型的 Trait。
///
/// # 使用示例
///
/// ```rust
/// use sector::statistic::time::{Annual252, Daily, TimeInterval};
///
/// assert_eq!(Daily.name().as_str(), "Daily");
/// assert_eq!(Daily.interval().num_days(), 1);
///
/// assert_eq!(Annual252.name().as_str(), "Annual(252)");
/// assert_eq!(Annual252.interval().num_days(), 252);
/// ```
pub trait TimeInterval: Debug + Copy {
    /// 人类可读名称，用于摘要表格的标题。
    fn name(&self) -> SmolStr;

    fn interval(&self) -> TimeDelta;
}

/// 252 个交易日的年化时间间隔（排除周末和节假日）。
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Annual252;

impl TimeInterval for Annual252 {
    fn name(&self) -> SmolStr {
        SmolStr::new("Annual(252)")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::days(252)
    }
}

/// 单个交易日。
#[derive(Debug, Copy, Clone, Eq, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Daily;

impl TimeInterval for Daily {
    fn name(&self) -> SmolStr {
        SmolStr::new("Daily")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::days(1)
    }
}

impl TimeInterval for TimeDelta {
    fn name(&self) -> SmolStr {
        format_smolstr!("Duration {} (days)", self.num_days())
    }

    fn interval(&self) -> TimeDelta {
        *self
    }
}
