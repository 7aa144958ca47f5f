//! Algorithm 统计算法模块
//!
//! 本模块提供单次遍历计算均值与方差的 Welford Online 算法，以及基于它的
//! [`RunningMoments`] 累加器。
//!
//! # 核心概念
//!
//! - **welford_online**: 均值、递推关系 M、样本/总体方差的增量公式
//! - **RunningMoments**: 逐值累加，随时查询均值、方差与标准差

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// [Welford Online](https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Welford's_online_algorithm)
/// 算法集合，用于单次遍历计算运行中的均值和方差。
///
/// # 使用示例
///
/// 每一步都使用 checked 运算，溢出时返回 `None`。
///
/// ```rust,ignore
/// let mut mean = Decimal::ZERO;
/// let mut m = Decimal::ZERO;
/// let mut count = Decimal::ZERO;
///
/// for value in returns {
///     count += Decimal::ONE;
///     let new_mean = welford_online::calculate_mean(mean, value, count)?;
///     m = welford_online::calculate_recurrence_relation_m(m, mean, value, new_mean)?;
///     mean = new_mean;
/// }
///
/// let variance = welford_online::calculate_sample_variance(m, count);
/// ```
pub mod welford_online {
    use rust_decimal::Decimal;

    /// 计算下一个均值。
    ///
    /// `new_mean = prev_mean + (next_value - prev_mean) / count`，其中 `count` 已包含新值。
    pub fn calculate_mean(
        prev_mean: Decimal,
        next_value: Decimal,
        count: Decimal,
    ) -> Option<Decimal> {
        next_value
            .checked_sub(prev_mean)?
            .checked_div(count)?
            .checked_add(prev_mean)
    }

    /// 计算下一个递推关系 M：`prev_m + (new_value - prev_mean) * (new_value - new_mean)`。
    pub fn calculate_recurrence_relation_m(
        prev_m: Decimal,
        prev_mean: Decimal,
        new_value: Decimal,
        new_mean: Decimal,
    ) -> Option<Decimal> {
        let deviation = new_value.checked_sub(prev_mean)?;
        let new_deviation = new_value.checked_sub(new_mean)?;
        prev_m.checked_add(deviation.checked_mul(new_deviation)?)
    }

    /// 使用 Bessel 校正（`count - 1`）计算无偏"样本"方差。
    ///
    /// 少于 2 个值时样本方差无定义，返回 `None`。
    pub fn calculate_sample_variance(
        recurrence_relation_m: Decimal,
        count: Decimal,
    ) -> Option<Decimal> {
        match count < Decimal::TWO {
            true => None,
            false => recurrence_relation_m.checked_div(count - Decimal::ONE),
        }
    }

    /// 计算有偏"总体"方差 `M / count`。没有任何值时返回 `None`。
    pub fn calculate_population_variance(
        recurrence_relation_m: Decimal,
        count: Decimal,
    ) -> Option<Decimal> {
        match count < Decimal::ONE {
            true => None,
            false => recurrence_relation_m.checked_div(count),
        }
    }
}

/// 运行中的一阶与二阶矩累加器。
///
/// 内部使用 [`welford_online`]，因此只需单次遍历，且不保存任何数据点。
///
/// 某次 [`update`](Self::update) 溢出 [`Decimal`] 的表示范围后，累加器被标记为
/// 已溢出：之后的值被忽略，所有查询返回 `None`。
///
/// ```rust,ignore
/// let moments = series.defined().map(|point| point.value).collect::<RunningMoments>();
/// let volatility = moments.sample_std_dev();
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct RunningMoments {
    count: u64,
    mean: Decimal,
    recurrence_relation_m: Decimal,
    #[serde(default)]
    overflowed: bool,
}

impl RunningMoments {
    /// 累加 `value`。溢出时保留此前的状态并标记为已溢出。
    pub fn update(&mut self, value: Decimal) {
        if self.overflowed {
            return;
        }

        let count = Decimal::from(self.count + 1);
        let next = welford_online::calculate_mean(self.mean, value, count).and_then(|mean| {
            welford_online::calculate_recurrence_relation_m(
                self.recurrence_relation_m,
                self.mean,
                value,
                mean,
            )
            .map(|recurrence_relation_m| (mean, recurrence_relation_m))
        });

        match next {
            Some((mean, recurrence_relation_m)) => {
                self.count += 1;
                self.mean = mean;
                self.recurrence_relation_m = recurrence_relation_m;
            }
            None => self.overflowed = true,
        }
    }

    pub fn count(&self) -> usize {
        usize::try_from(self.count).unwrap_or(usize::MAX)
    }

    pub fn is_overflowed(&self) -> bool {
        self.overflowed
    }

    /// 算术平均值；没有任何值或已溢出时为 `None`。
    pub fn mean(&self) -> Option<Decimal> {
        (self.count > 0 && !self.overflowed).then_some(self.mean)
    }

    /// 样本方差（N-1）；少于 2 个值或已溢出时为 `None`。
    pub fn sample_variance(&self) -> Option<Decimal> {
        if self.overflowed {
            return None;
        }
        welford_online::calculate_sample_variance(
            self.recurrence_relation_m,
            Decimal::from(self.count),
        )
        .map(|variance| variance.max(Decimal::ZERO))
    }

    /// 总体方差（N）；没有任何值或已溢出时为 `None`。
    pub fn population_variance(&self) -> Option<Decimal> {
        if self.overflowed {
            return None;
        }
        welford_online::calculate_population_variance(
            self.recurrence_relation_m,
            Decimal::from(self.count),
        )
        .map(|variance| variance.max(Decimal::ZERO))
    }

    /// 样本标准差，即 [`Self::sample_variance`] 的平方根。
    pub fn sample_std_dev(&self) -> Option<Decimal> {
        self.sample_variance().and_then(|variance| variance.sqrt())
    }
}

impl Extend<Decimal> for RunningMoments {
    fn extend<Iter>(&mut self, iter: Iter)
    where
        Iter: IntoIterator<Item = Decimal>,
    {
        iter.into_iter().for_each(|value| self.update(value))
    }
}

impl FromIterator<Decimal> for RunningMoments {
    fn from_iter<Iter>(iter: Iter) -> Self
    where
        Iter: IntoIterator<Item = Decimal>,
    {
        let mut moments = Self::default();
        moments.extend(iter);
        moments
    }
}
