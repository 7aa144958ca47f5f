#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments, type_alias_bounds)]

//! # Sector
//! Sector 是一个用于分析一篮子股票（默认为十家美国银行业公司）日频收益率与波动率的 Rust 库。
//! * **纯函数**：除数据加载外，所有操作都是无状态、确定性的纯函数。
//! * **强类型**：[`AggregatedTable`](aggregate::AggregatedTable)、[`ReturnsTable`](returns::ReturnsTable)
//!   取代松散的 "symbol × field" 表格，不变式在构造时保证。
//! * **错误隔离**：单个代码的失败（数据缺失、零价格、区间为空……）只影响该代码，
//!   批量统计返回部分结果与并行的错误映射。
//!
//! ## 概述
//! 流水线由显式的函数组合构成：
//! * [`PriceLoader`](sector_data::loader::PriceLoader) 按代码获取 [`PriceTable`](sector_data::table::PriceTable)。
//! * [`aggregate`](aggregate::aggregate) 将多个价格表合并为按 (symbol, field) 寻址的聚合表。
//! * [`ReturnsTable::compute`](returns::ReturnsTable::compute) 逐代码计算简单收益率。
//! * [`statistic`] 在任意日期子区间上计算最小收益日期、均值、标准差、分布等统计量。
//! * [`chart`] 将上述结果转换为与渲染实现无关的图表数据。
//!
//! ## 快速开始
//! 参见 `sector/examples/banking_covid.rs`。

use crate::error::{AnalysisError, SymbolErrors};
use sector_data::{collection::FnvIndexMap, symbol::Symbol};
use serde::{Deserialize, Serialize};

/// 多代码聚合器。
///
/// 例如：`aggregate`、`AggregatedTable`。
pub mod aggregate;

/// 定义分析流水线中所有可能的错误。
pub mod error;

/// 简单收益率转换，以及 `ReturnsTable`。
pub mod returns;

/// 用于分析收益率序列的统计算法、指标与摘要。
///
/// 例如：`argmin_dates`、`std_dev`、`Histogram`、`SectorSummary`、`Volatility` 等。
pub mod statistic;

/// 价格序列转换，例如移动平均。
pub mod transform;

/// 可视化数据边界，以及可替换的 `ChartRenderer` 接口。
pub mod chart;

/// 显式组合的分析流水线：获取 → 聚合 → 收益率。
pub mod pipeline;

/// 分析配置。
pub mod config;

/// 提供默认的 Tracing 日志初始化器。
pub mod logging;

/// 逐代码的批量计算结果。
///
/// 成功代码的值保存在 `values`，失败代码的错误保存在并行的 `errors` 中，
/// 两个映射都保持调用方提供的代码顺序，且同一代码只会出现在其中一个映射里。
///
/// # 使用示例
///
/// ```rust,ignore
/// let volatility = std_dev(&returns, DateRange::between(march_10, april_30));
///
/// for (symbol, value) in &volatility.values {
///     println!("{symbol}: {value}");
/// }
/// for (symbol, error) in &volatility.errors {
///     warn!(%symbol, %error, "volatility unavailable");
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PerSymbol<T> {
    /// 成功代码的结果
    pub values: FnvIndexMap<Symbol, T>,
    /// 失败代码的错误
    pub errors: SymbolErrors,
}

impl<T> Default for PerSymbol<T> {
    fn default() -> Self {
        Self {
            values: FnvIndexMap::default(),
            errors: SymbolErrors::default(),
        }
    }
}

impl<T> PerSymbol<T> {
    /// 记录单个代码的计算结果。
    pub fn insert(&mut self, symbol: Symbol, result: Result<T, AnalysisError>) {
        match result {
            Ok(value) => {
                self.values.insert(symbol, value);
            }
            Err(error) => {
                self.errors.insert(symbol, error);
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&T> {
        self.values.get(symbol)
    }

    pub fn error(&self, symbol: &str) -> Option<&AnalysisError> {
        self.errors.get(symbol)
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// 保持错误映射不变，转换每个成功值。
    pub fn map<U, F>(self, mut op: F) -> PerSymbol<U>
    where
        F: FnMut(T) -> U,
    {
        PerSymbol {
            values: self
                .values
                .into_iter()
                .map(|(symbol, value)| (symbol, op(value)))
                .collect(),
            errors: self.errors,
        }
    }
}

impl<T> FromIterator<(Symbol, Result<T, AnalysisError>)> for PerSymbol<T> {
    fn from_iter<Iter>(iter: Iter) -> Self
    where
        Iter: IntoIterator<Item = (Symbol, Result<T, AnalysisError>)>,
    {
        iter.into_iter()
            .fold(Self::default(), |mut batch, (symbol, result)| {
                batch.insert(symbol, result);
                batch
            })
    }
}

/// Sector 测试工具。
///
/// 提供用于测试的辅助函数，包括日期构造、价格表构造和 Decimal 近似比较。
pub mod test_utils {
    use crate::{aggregate::AggregatedTable, returns::ReturnsTable};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sector_data::{
        record::{PriceField, PriceRecord},
        symbol::Symbol,
        table::PriceTable,
    };

    /// 构造 2020 年内的日期。
    ///
    /// # Panics
    ///
    /// 如果月份或日期非法，此函数会 panic。
    pub fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, month, day).unwrap()
    }

    /// 构造所有价格字段都等于 `close` 的 [`PriceRecord`]。
    pub fn record(date: NaiveDate, close: Decimal) -> PriceRecord {
        PriceRecord::new(date, close, close, close, close, close, 1_000_000)
    }

    /// 从 `(date, close)` 序列构造 [`PriceTable`]。
    ///
    /// # Panics
    ///
    /// 如果日期不是严格递增，此函数会 panic。
    pub fn price_table(closes: &[(NaiveDate, Decimal)]) -> PriceTable {
        PriceTable::new(
            closes
                .iter()
                .map(|(date, close)| record(*date, *close))
                .collect(),
        )
        .unwrap()
    }

    /// 从 `(symbol, [(date, close)])` 构造 [`AggregatedTable`]。
    pub fn aggregated(tables: &[(&str, &[(NaiveDate, Decimal)])]) -> AggregatedTable {
        crate::aggregate::aggregate(
            tables
                .iter()
                .map(|(symbol, closes)| (Symbol::new(*symbol), price_table(closes))),
        )
        .unwrap()
    }

    /// 从 `(symbol, [(date, close)])` 构造基于收盘价、原生日期对齐的 [`ReturnsTable`]。
    pub fn returns_table(tables: &[(&str, &[(NaiveDate, Decimal)])]) -> ReturnsTable {
        let (returns, errors) = ReturnsTable::compute(
            &aggregated(tables),
            PriceField::Close,
            Default::default(),
        );
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        returns
    }

    /// 比较两个 Decimal 是否在 `epsilon` 容差内相等。
    pub fn decimal_is_eq(actual: Decimal, expected: Decimal, epsilon: Decimal) -> bool {
        (actual - expected).abs() < epsilon
    }
}
