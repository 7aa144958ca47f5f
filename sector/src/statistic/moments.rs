//! Moments 均值与波动率模块
//!
//! 日收益率的均值、样本方差和样本标准差（波动率）。样本统计量使用 Bessel 校正（N-1）。
//!
//! # 最少数据点
//!
//! - 均值：1 个已定义的收益率
//! - 方差/标准差：2 个已定义的收益率
//!
//! 累加超出 [`Decimal`] 范围的代码返回 [`AnalysisError::Overflow`]，不影响其它代码。

use crate::{
    PerSymbol,
    error::AnalysisError,
    returns::{ReturnSeries, ReturnsTable},
    statistic::{algorithm::RunningMoments, defined_within, for_each_symbol, insufficient_data},
};
use rust_decimal::Decimal;
use sector_data::{Dated, range::DateRange, symbol::Symbol};

/// 均值所需的最少已定义收益率数量。
pub const MEAN_REQUIRED: usize = 1;

/// 样本方差与标准差所需的最少已定义收益率数量。
pub const VARIANCE_REQUIRED: usize = 2;

/// 单次遍历累加 `range` 内的已定义收益率。
pub fn series_moments(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
    required: usize,
) -> Result<RunningMoments, AnalysisError> {
    let defined = defined_within(symbol, series, range, required)?;
    accumulate(symbol, &defined)
}

/// 将 `points` 累加到 [`RunningMoments`]，在第一个导致溢出的值处返回
/// [`AnalysisError::Overflow`]。
pub fn accumulate(
    symbol: &Symbol,
    points: &[Dated<Decimal>],
) -> Result<RunningMoments, AnalysisError> {
    let mut moments = RunningMoments::default();

    for point in points {
        moments.update(point.value);
        if moments.is_overflowed() {
            return Err(AnalysisError::overflow(symbol, point.date));
        }
    }

    Ok(moments)
}

pub fn series_mean(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
) -> Result<Decimal, AnalysisError> {
    let moments = series_moments(symbol, series, range, MEAN_REQUIRED)?;
    moments
        .mean()
        .ok_or_else(|| insufficient_data(symbol, moments.count(), MEAN_REQUIRED))
}

pub fn series_variance(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
) -> Result<Decimal, AnalysisError> {
    let moments = series_moments(symbol, series, range, VARIANCE_REQUIRED)?;
    moments
        .sample_variance()
        .ok_or_else(|| insufficient_data(symbol, moments.count(), VARIANCE_REQUIRED))
}

/// 单个代码在 `range` 内日收益率的样本标准差。
pub fn series_std_dev(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
) -> Result<Decimal, AnalysisError> {
    let moments = series_moments(symbol, series, range, VARIANCE_REQUIRED)?;
    moments
        .sample_std_dev()
        .ok_or_else(|| insufficient_data(symbol, moments.count(), VARIANCE_REQUIRED))
}

/// 每个代码在 `range` 内日收益率的算术平均值。
pub fn mean(returns: &ReturnsTable, range: DateRange) -> PerSymbol<Decimal> {
    for_each_symbol(returns, |symbol, series| series_mean(symbol, series, range))
}

/// 每个代码在 `range` 内日收益率的样本方差。
pub fn variance(returns: &ReturnsTable, range: DateRange) -> PerSymbol<Decimal> {
    for_each_symbol(returns, |symbol, series| {
        series_variance(symbol, series, range)
    })
}

/// 每个代码在 `range` 内日收益率的样本标准差，作为波动率的代理。
///
/// 区间内已定义的收益率少于 2 个的代码返回 [`AnalysisError::InsufficientData`]。
pub fn std_dev(returns: &ReturnsTable, range: DateRange) -> PerSymbol<Decimal> {
    for_each_symbol(returns, |symbol, series| series_std_dev(symbol, series, range))
}
