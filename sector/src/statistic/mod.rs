//! Statistic 统计模块
//!
//! 本模块在 [`ReturnsTable`] 的任意日期子区间上计算逐代码统计量。
//!
//! # 核心概念
//!
//! - **algorithm**: Welford Online 算法与 `RunningMoments` 累加器
//! - **moments**: 均值、样本方差、样本标准差
//! - **extremes**: 最小/最大收益率及其日期（`argmin_dates`）
//! - **distribution**: 收益率直方图
//! - **metric**: 可在不同时间间隔之间缩放的指标
//! - **summary**: 逐代码 `TearSheet` 与整个篮子的 `SectorSummary`
//! - **time**: 用于缩放的时间间隔定义
//!
//! # 区间与未定义值
//!
//! 每个统计量都作用于 [`DateRange`] 限定的子序列（两端包含），并跳过未定义的收益率。
//! 统计量不会被缓存，每次查询都重新计算。
//!
//! ## 逐代码错误
//!
//! - 序列没有任何数据点：`InsufficientData { count: 0 }`
//! - 区间排除了该代码的全部日期：`EmptyRange`
//! - 区间内已定义的值不足：`InsufficientData { count, required }`
//!
//! 批量统计永远不会整体失败，而是返回 [`PerSymbol`]。

use crate::{
    PerSymbol,
    error::AnalysisError,
    returns::{ReturnSeries, ReturnsTable},
};
use rust_decimal::Decimal;
use sector_data::{Dated, range::DateRange, symbol::Symbol};

/// 用于分析数据集的统计算法。
pub mod algorithm;

/// 收益率分布直方图。
pub mod distribution;

/// 最小/最大收益率及其发生日期。
pub mod extremes;

/// 可在不同 [`TimeIntervals`](time::TimeInterval) 之间缩放的指标。
pub mod metric;

/// 均值、方差与标准差。
pub mod moments;

/// 收益率数据集的统计摘要。
///
/// 例如，`TearSheet`、`SectorSummary`。
pub mod summary;

/// 用于金融计算的时间间隔定义。
///
/// 例如，`Annual252`、`Daily`。
pub mod time;

/// 选出 `series` 在 `range` 内已定义的收益率，并检查数量不少于 `required`。
pub fn defined_within(
    symbol: &Symbol,
    series: &ReturnSeries,
    range: DateRange,
    required: usize,
) -> Result<Vec<Dated<Decimal>>, AnalysisError> {
    if series.is_empty() {
        return Err(insufficient_data(symbol, 0, required));
    }

    let window = series.within(range);
    if window.is_empty() {
        return Err(AnalysisError::EmptyRange {
            symbol: symbol.clone(),
            range,
        });
    }

    let defined = window
        .iter()
        .filter_map(|point| point.value.map(|value| Dated::new(value, point.date)))
        .collect::<Vec<_>>();

    if defined.len() < required {
        return Err(insufficient_data(symbol, defined.len(), required));
    }

    Ok(defined)
}

/// 对 [`ReturnsTable`] 中的每个代码独立应用 `op`。
pub fn for_each_symbol<T, F>(returns: &ReturnsTable, mut op: F) -> PerSymbol<T>
where
    F: FnMut(&Symbol, &ReturnSeries) -> Result<T, AnalysisError>,
{
    returns
        .iter()
        .map(|(symbol, series)| (symbol.clone(), op(symbol, series)))
        .collect()
}

pub(crate) fn insufficient_data(symbol: &Symbol, count: usize, required: usize) -> AnalysisError {
    AnalysisError::InsufficientData {
        symbol: symbol.clone(),
        count,
        required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, returns_table};
    use rust_decimal_macros::dec;

    #[test]
    fn test_defined_within() {
        struct TestCase {
            range: DateRange,
            required: usize,
            expected: Result<usize, AnalysisError>,
        }

        let symbol = Symbol::new("JPM");
        let returns = returns_table(&[(
            "JPM",
            &[
                (date(3, 9), dec!(100)),
                (date(3, 10), dec!(104)),
                (date(3, 11), dec!(98)),
                (date(3, 12), dec!(90)),
            ],
        )]);
        let series = returns.series("JPM").unwrap();

        let cases = vec![
            // TC0: full range
            TestCase {
                range: DateRange::full(),
                required: 2,
                expected: Ok(3),
            },
            // TC1: range after the last date
            TestCase {
                range: DateRange::since(date(4, 1)),
                required: 1,
                expected: Err(AnalysisError::EmptyRange {
                    symbol: symbol.clone(),
                    range: DateRange::since(date(4, 1)),
                }),
            },
            // TC2: single point but two required
            TestCase {
                range: DateRange::between(date(3, 12), date(3, 31)),
                required: 2,
                expected: Err(AnalysisError::InsufficientData {
                    symbol: symbol.clone(),
                    count: 1,
                    required: 2,
                }),
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = defined_within(&symbol, series, test.range, test.required)
                .map(|defined| defined.len());
            assert_eq!(actual, test.expected, "TC{index} failed");
        }
    }

    #[test]
    fn test_defined_within_empty_series() {
        let symbol = Symbol::new("MS");
        let actual = defined_within(&symbol, &ReturnSeries::default(), DateRange::full(), 1);

        assert_eq!(actual, Err(insufficient_data(&symbol, 0, 1)));
    }
}
