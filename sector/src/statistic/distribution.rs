//! Distribution 收益率分布模块
//!
//! 将日收益率划分为等宽区间并计数，用于绘制分布图（例如花旗银行 2020 年的 50 区间直方图）。
//!
//! # 区间规则
//!
//! - 区间宽度 `(max - min) / bins`，覆盖已定义收益率的最小值到最大值
//! - 每个区间为左闭右开 `[lower, upper)`，最大值计入最后一个区间
//! - 所有值相等时只产生一个宽度为零的区间，包含全部观测值
//! - 与最小值的距离超出 [`Decimal`] 范围时返回 [`AnalysisError::Overflow`]

use crate::{
    PerSymbol,
    error::AnalysisError,
    returns::{ReturnSeries, ReturnsTable},
    statistic::{defined_within, for_each_symbol},
};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sector_data::{range::DateRange, symbol::Symbol};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// 单个代码在日期子区间内的收益率直方图。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Histogram {
    pub symbol: Symbol,
    pub range: DateRange,
    /// 最小已定义收益率，即第一个区间的下界
    pub min: Decimal,
    /// 最大已定义收益率，即最后一个区间的上界
    pub max: Decimal,
    pub bin_width: Decimal,
    /// 每个区间的观测数量，按下界升序
    pub counts: Vec<usize>,
}

/// [`Histogram`] 中的单个区间。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistogramBin {
    pub lower: Decimal,
    pub upper: Decimal,
    pub count: usize,
}

impl Histogram {
    /// 统计 `series` 在 `range` 内已定义的收益率。
    ///
    /// # 错误
    ///
    /// 与其它统计量一致：区间为空返回 [`AnalysisError::EmptyRange`]，
    /// 没有已定义的收益率返回 [`AnalysisError::InsufficientData`]，
    /// 最大值与最小值之差溢出时返回 [`AnalysisError::Overflow`]。
    pub fn from_series(
        symbol: &Symbol,
        series: &ReturnSeries,
        range: DateRange,
        bins: NonZeroUsize,
    ) -> Result<Self, AnalysisError> {
        let points = defined_within(symbol, series, range, 1)?;

        let (min, max) = points
            .iter()
            .fold((Decimal::MAX, Decimal::MIN), |(min, max), point| {
                (min.min(point.value), max.max(point.value))
            });

        if min == max {
            return Ok(Self {
                symbol: symbol.clone(),
                range,
                min,
                max,
                bin_width: Decimal::ZERO,
                counts: vec![points.len()],
            });
        }

        let offsets = points
            .iter()
            .map(|point| {
                point
                    .value
                    .checked_sub(min)
                    .ok_or_else(|| AnalysisError::overflow(symbol, point.date))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bin_count = bins.get();
        let bin_width = offsets
            .iter()
            .max()
            .and_then(|spread| spread.checked_div(Decimal::from(bin_count)))
            .unwrap_or(Decimal::ZERO);

        let mut counts = vec![0; bin_count];
        for offset in offsets {
            let index = offset
                .checked_div(bin_width)
                .and_then(|position| position.floor().to_usize())
                .unwrap_or(bin_count - 1)
                .min(bin_count - 1);
            counts[index] += 1;
        }

        Ok(Self {
            symbol: symbol.clone(),
            range,
            min,
            max,
            bin_width,
            counts,
        })
    }

    /// 观测总数，等于区间内已定义的收益率数量。
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn bins(&self) -> impl Iterator<Item = HistogramBin> + '_ {
        let last = self.counts.len().saturating_sub(1);

        self.counts.iter().enumerate().map(move |(index, count)| {
            let lower = self.min + self.bin_width * Decimal::from(index);
            let upper = match index == last {
                true => self.max,
                false => lower + self.bin_width,
            };

            HistogramBin {
                lower,
                upper,
                count: *count,
            }
        })
    }
}

/// 每个代码在 `range` 内收益率的直方图。
pub fn distributions(
    returns: &ReturnsTable,
    range: DateRange,
    bins: NonZeroUsize,
) -> PerSymbol<Histogram> {
    for_each_symbol(returns, |symbol, series| {
        Histogram::from_series(symbol, series, range, bins)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        returns::DateAlignment,
        test_utils::{date, returns_table},
    };
    use rust_decimal_macros::dec;
    use sector_data::{Dated, record::PriceField};

    fn bins(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).unwrap()
    }

    #[test]
    fn test_histogram_from_series() {
        // returns = [0.1, -0.1, 0.0, 0.2, -0.05]
        let returns = returns_table(&[(
            "C",
            &[
                (date(6, 1), dec!(100)),
                (date(6, 2), dec!(110)),
                (date(6, 3), dec!(99)),
                (date(6, 4), dec!(99)),
                (date(6, 5), dec!(118.8)),
                (date(6, 8), dec!(112.86)),
            ],
        )]);
        let series = returns.series("C").unwrap();

        let actual = Histogram::from_series(&Symbol::new("C"), series, DateRange::full(), bins(3))
            .unwrap();

        assert_eq!(actual.min, dec!(-0.1));
        assert_eq!(actual.max, dec!(0.2));
        assert_eq!(actual.bin_width, dec!(0.1));
        assert_eq!(actual.counts, vec![2, 1, 2]);
        assert_eq!(actual.total(), 5);

        let bins = actual.bins().collect::<Vec<_>>();
        assert_eq!(bins[0].lower, dec!(-0.1));
        assert_eq!(bins[2].upper, dec!(0.2));
    }

    #[test]
    fn test_histogram_all_equal_values() {
        let returns = returns_table(&[(
            "USB",
            &[
                (date(6, 1), dec!(10)),
                (date(6, 2), dec!(11)),
                (date(6, 3), dec!(12.1)),
            ],
        )]);

        let actual = distributions(&returns, DateRange::full(), bins(50));
        let histogram = actual.get("USB").unwrap();

        assert_eq!(histogram.counts, vec![2]);
        assert_eq!(histogram.bin_width, Decimal::ZERO);
    }

    #[test]
    fn test_distributions_counts_sum_to_observations() {
        let returns = returns_table(&[(
            "PNC",
            &[
                (date(3, 2), dec!(144.1)),
                (date(3, 3), dec!(138.4)),
                (date(3, 4), dec!(141.2)),
                (date(3, 5), dec!(131.7)),
                (date(3, 6), dec!(127.3)),
                (date(3, 9), dec!(112.6)),
                (date(3, 10), dec!(118.9)),
            ],
        )]);

        let actual = distributions(&returns, DateRange::full(), bins(4));

        assert_eq!(actual.get("PNC").unwrap().total(), 6);
        assert_eq!(actual.get("PNC").unwrap().counts.len(), 4);
    }

    #[test]
    fn test_distributions_overflow_is_scoped_to_symbol() {
        let extreme = [
            Dated::new(Some(dec!(-1)), date(3, 10)),
            Dated::new(None, date(3, 11)),
            Dated::new(Some(Decimal::MAX), date(3, 12)),
        ]
        .into_iter()
        .collect::<ReturnSeries>();
        let regular = [
            Dated::new(Some(dec!(-0.1)), date(3, 10)),
            Dated::new(Some(dec!(0.1)), date(3, 11)),
        ]
        .into_iter()
        .collect::<ReturnSeries>();
        let returns = ReturnsTable::from_series(
            PriceField::Close,
            DateAlignment::Calendar,
            [(Symbol::new("C"), extreme), (Symbol::new("BAC"), regular)],
        );
        assert_eq!(returns.alignment(), DateAlignment::Calendar);

        let actual = distributions(&returns, DateRange::full(), bins(50));

        assert_eq!(
            actual.error("C"),
            Some(&AnalysisError::overflow(&Symbol::new("C"), date(3, 12)))
        );
        assert_eq!(actual.get("BAC").unwrap().total(), 2);
    }
}
