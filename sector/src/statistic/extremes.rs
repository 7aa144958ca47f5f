//! Extremes 极值模块
//!
//! 查找每个代码在日期子区间内的最小/最大日收益率及其发生日期。
//! 例如，2020 年 3 月 16 日是大多数银行股的最差交易日。
//!
//! 多个日期取得相同极值时，最早的日期胜出。

use crate::{
    PerSymbol,
    error::AnalysisError,
    returns::{ReturnSeries, ReturnsTable},
    statistic::{defined_within, for_each_symbol},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sector_data::{Dated, range::DateRange, symbol::Symbol};
use std::cmp::Ordering;

/// 单个代码在 `range` 内的最小收益率及其日期。
pub fn series_min(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
) -> Result<Dated<Decimal>, AnalysisError> {
    series_extreme(symbol, series, range, Ordering::Less)
}

/// 单个代码在 `range` 内的最大收益率及其日期。
pub fn series_max(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
) -> Result<Dated<Decimal>, AnalysisError> {
    series_extreme(symbol, series, range, Ordering::Greater)
}

fn series_extreme(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
    preferred: Ordering,
) -> Result<Dated<Decimal>, AnalysisError> {
    let defined = defined_within(symbol, series, range, 1)?;
    extreme(defined, preferred).ok_or_else(|| super::insufficient_data(symbol, 0, 1))
}

/// 按日期顺序查找 `preferred` 方向的极值。
///
/// 只有严格更优的值才会替换当前候选值，因此并列时保留最早的日期。
pub(crate) fn extreme<Iter>(points: Iter, preferred: Ordering) -> Option<Dated<Decimal>>
where
    Iter: IntoIterator<Item = Dated<Decimal>>,
{
    points
        .into_iter()
        .reduce(|best, next| match next.value.cmp(&best.value) == preferred {
            true => next,
            false => best,
        })
}

/// 每个代码在 `range` 内的最小收益率及其日期。
pub fn min_returns(returns: &ReturnsTable, range: DateRange) -> PerSymbol<Dated<Decimal>> {
    for_each_symbol(returns, |symbol, series| series_min(symbol, series, range))
}

/// 每个代码在 `range` 内的最大收益率及其日期。
pub fn max_returns(returns: &ReturnsTable, range: DateRange) -> PerSymbol<Dated<Decimal>> {
    for_each_symbol(returns, |symbol, series| series_max(symbol, series, range))
}

/// 每个代码在 `range` 内取得最小收益率的日期。
///
/// # 使用示例
///
/// ```rust,ignore
/// let worst = argmin_dates(&returns, DateRange::full());
/// assert_eq!(worst.get("JPM"), Some(&march_16));
/// ```
pub fn argmin_dates(returns: &ReturnsTable, range: DateRange) -> PerSymbol<NaiveDate> {
    min_returns(returns, range).map(|point| point.date)
}

/// 每个代码在 `range` 内取得最大收益率的日期。
pub fn argmax_dates(returns: &ReturnsTable, range: DateRange) -> PerSymbol<NaiveDate> {
    max_returns(returns, range).map(|point| point.date)
}
