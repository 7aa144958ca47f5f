//! Summary 统计摘要模块
//!
//! 将逐代码统计量汇总为可打印的报告。
//!
//! # 核心概念
//!
//! - **TearSheet**: 单个代码在日期子区间内的摘要
//! - **SectorSummary**: 篮子中所有代码的 [`TearSheet`]，以及无法生成摘要的代码的错误

use crate::{
    error::{AnalysisError, SymbolErrors},
    returns::{ReturnSeries, ReturnsTable},
    statistic::{
        defined_within,
        extremes::extreme,
        insufficient_data,
        metric::{mean_return::MeanReturn, volatility::Volatility},
        moments::{VARIANCE_REQUIRED, accumulate},
        time::{Daily, TimeInterval},
    },
};
use rust_decimal::Decimal;
use sector_data::{
    Dated,
    collection::FnvIndexMap,
    range::DateRange,
    record::PriceField,
    symbol::Symbol,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// 显示格式化模块。
pub mod display;

/// 单个代码在日期子区间内的摘要。
///
/// ## 字段说明
///
/// - **observations**: 区间内已定义的收益率数量
/// - **mean_return**: 平均收益率（线性缩放）
/// - **volatility**: 收益率样本标准差（平方根缩放）
/// - **worst** / **best**: 最小/最大日收益率及其日期，并列时取最早日期
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TearSheet<Interval> {
    pub observations: usize,
    pub mean_return: MeanReturn<Interval>,
    pub volatility: Volatility<Interval>,
    pub worst: Dated<Decimal>,
    pub best: Dated<Decimal>,
}

impl TearSheet<Daily> {
    /// 单次遍历 `range` 内已定义的日收益率生成 [`TearSheet`]。
    ///
    /// 需要至少 2 个已定义的收益率，否则返回 [`AnalysisError::InsufficientData`]。
    /// 累加溢出时返回 [`AnalysisError::Overflow`]。
    pub fn generate(
        symbol: &Symbol,
        series: &ReturnSeries,
        range: DateRange,
    ) -> Result<Self, AnalysisError> {
        let defined = defined_within(symbol, series, range, VARIANCE_REQUIRED)?;
        let moments = accumulate(symbol, &defined)?;

        let insufficient = || insufficient_data(symbol, defined.len(), VARIANCE_REQUIRED);

        Ok(Self {
            observations: moments.count(),
            mean_return: MeanReturn::calculate(moments.mean().ok_or_else(insufficient)?, Daily),
            volatility: Volatility::calculate(
                moments.sample_std_dev().ok_or_else(insufficient)?,
                Daily,
            ),
            worst: extreme(defined.iter().copied(), Ordering::Less).ok_or_else(insufficient)?,
            best: extreme(defined.iter().copied(), Ordering::Greater).ok_or_else(insufficient)?,
        })
    }
}

impl<Interval> TearSheet<Interval>
where
    Interval: TimeInterval,
{
    /// 将均值与波动率缩放到 `target`；极值始终是单日收益率，保持不变。
    pub fn scale<TargetInterval>(self, target: TargetInterval) -> TearSheet<TargetInterval>
    where
        TargetInterval: TimeInterval,
    {
        TearSheet {
            observations: self.observations,
            mean_return: self.mean_return.scale(target),
            volatility: self.volatility.scale(target),
            worst: self.worst,
            best: self.best,
        }
    }
}

/// 篮子中所有代码在同一日期子区间内的摘要。
///
/// ## 字段说明
///
/// - **range**: 摘要覆盖的日期区间
/// - **field**: 收益率基于的价格字段
/// - **interval**: 均值与波动率所在的时间间隔
/// - **symbols**: 成功代码的 [`TearSheet`]，保持 [`ReturnsTable`] 中的代码顺序
/// - **errors**: 无法生成摘要的代码
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectorSummary<Interval> {
    pub range: DateRange,
    pub field: PriceField,
    pub interval: Interval,
    pub symbols: FnvIndexMap<Symbol, TearSheet<Interval>>,
    pub errors: SymbolErrors,
}

impl<Interval> SectorSummary<Interval>
where
    Interval: TimeInterval,
{
    /// 为 `returns` 中的每个代码生成 `range` 内的 [`TearSheet`]，并缩放到 `interval`。
    pub fn generate(returns: &ReturnsTable, range: DateRange, interval: Interval) -> Self {
        let mut symbols = FnvIndexMap::default();
        let mut errors = SymbolErrors::default();

        for (symbol, series) in returns {
            match TearSheet::generate(symbol, series, range) {
                Ok(tear_sheet) => {
                    symbols.insert(symbol.clone(), tear_sheet.scale(interval));
                }
                Err(error) => {
                    errors.insert(symbol.clone(), error);
                }
            }
        }

        debug!(
            %range,
            interval = %interval.name(),
            symbols = symbols.len(),
            failed = errors.len(),
            "generated SectorSummary"
        );

        Self {
            range,
            field: returns.field(),
            interval,
            symbols,
            errors,
        }
    }

    pub fn tear_sheet(&self, symbol: &str) -> Option<&TearSheet<Interval>> {
        self.symbols.get(symbol)
    }

    /// 波动率最高的代码。
    pub fn most_volatile(&self) -> Option<(&Symbol, &TearSheet<Interval>)> {
        self.symbols
            .iter()
            .max_by(|(_, a), (_, b)| a.volatility.value.cmp(&b.volatility.value))
    }
}
