//! Returns 收益率模块
//!
//! 本模块从价格序列推导简单收益率，并将各代码的结果组装为 [`ReturnsTable`]。
//!
//! # 计算公式
//!
//! `return[i] = (price[i] - price[i-1]) / price[i-1]`
//!
//! 第一个日期没有收益率（未定义，而不是零），因此 N 条价格记录产生 N-1 个收益率。
//! 分红不计入收益率，只计算基于价格的简单收益率。
//!
//! # 参考文档
//!
//! <https://www.investopedia.com/terms/r/rateofreturn.asp>

use crate::{
    aggregate::AggregatedTable,
    error::{AnalysisError, SymbolErrors},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sector_data::{
    Dated,
    collection::FnvIndexMap,
    range::DateRange,
    record::PriceField,
    symbol::Symbol,
    table::PriceTable,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// 收益率序列的日期对齐方式。
///
/// - **Native**: 每个代码保留自己的原生交易日（稀疏序列）
/// - **Calendar**: 所有代码重新索引到全部代码交易日的并集上；某代码缺失的日期
///   及其后一日的收益率被显式标记为未定义，而不是填充为零
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DateAlignment {
    #[default]
    Native,
    Calendar,
}

/// 单个代码按日期排序的收益率序列。
///
/// `None` 是显式的"未定义"标记，永远不会被静默替换为零。
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ReturnSeries(Vec<Dated<Option<Decimal>>>);

impl ReturnSeries {
    pub fn points(&self) -> &[Dated<Option<Decimal>>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().map(|point| point.date)
    }

    /// 仅迭代已定义的收益率。
    pub fn defined(&self) -> impl Iterator<Item = Dated<Decimal>> + '_ {
        self.0
            .iter()
            .filter_map(|point| point.value.map(|value| Dated::new(value, point.date)))
    }

    /// 返回落在 [`DateRange`] 内的连续子序列（含未定义点）。
    pub fn within(&self, range: DateRange) -> &[Dated<Option<Decimal>>] {
        if range.is_full() {
            return &self.0;
        }

        let start = range
            .start
            .map_or(0, |start| self.0.partition_point(|point| point.date < start));
        let end = range
            .end
            .map_or(self.0.len(), |end| self.0.partition_point(|point| point.date <= end));

        if start >= end { &[] } else { &self.0[start..end] }
    }
}

impl FromIterator<Dated<Option<Decimal>>> for ReturnSeries {
    fn from_iter<Iter>(iter: Iter) -> Self
    where
        Iter: IntoIterator<Item = Dated<Option<Decimal>>>,
    {
        Self(iter.into_iter().collect())
    }
}

impl From<ReturnSeries> for Vec<Dated<Option<Decimal>>> {
    fn from(value: ReturnSeries) -> Self {
        value.0
    }
}

/// 计算 `prev -> next` 的简单收益率。`prev` 为零或结果溢出时返回 `None`。
pub fn simple_return(prev: Decimal, next: Decimal) -> Option<Decimal> {
    (next - prev).checked_div(prev)
}

/// 按原生日期顺序计算单个代码 `field` 列的简单收益率。
///
/// 结果比 `table` 少一个元素，且每个收益率都已定义。
///
/// # 错误
///
/// 表中任何零或负价格都会返回 [`AnalysisError::InvalidPrice`]，不会产生无穷大。
/// 价格合法但收益率超出 [`Decimal`] 范围时返回 [`AnalysisError::Overflow`]。
pub fn compute_returns(
    symbol: &Symbol,
    table: &PriceTable,
    field: PriceField,
) -> Result<ReturnSeries, AnalysisError> {
    let column = table.column(field);
    validate_prices(symbol, column.iter().map(|point| Dated::new(Some(point.value), point.date)))?;

    column
        .windows(2)
        .map(|pair| {
            simple_return(pair[0].value, pair[1].value)
                .map(|value| Dated::new(Some(value), pair[1].date))
                .ok_or_else(|| AnalysisError::overflow(symbol, pair[1].date))
        })
        .collect()
}

/// 计算已对齐到公共日期轴的单列的简单收益率。
///
/// 若某日或其前一日价格缺失，该日收益率为 `None`。结果比 `column` 少一个元素。
///
/// # 错误
///
/// 任何已知的零或负价格都会返回 [`AnalysisError::InvalidPrice`]，收益率溢出时返回
/// [`AnalysisError::Overflow`]。
pub fn compute_aligned_returns(
    symbol: &Symbol,
    column: &[Dated<Option<Decimal>>],
) -> Result<ReturnSeries, AnalysisError> {
    validate_prices(symbol, column.iter().copied())?;

    column
        .windows(2)
        .map(|pair| match (pair[0].value, pair[1].value) {
            (Some(prev), Some(next)) => simple_return(prev, next)
                .map(|value| Dated::new(Some(value), pair[1].date))
                .ok_or_else(|| AnalysisError::overflow(symbol, pair[1].date)),
            _ => Ok(Dated::new(None, pair[1].date)),
        })
        .collect()
}

fn validate_prices<Iter>(symbol: &Symbol, prices: Iter) -> Result<(), AnalysisError>
where
    Iter: IntoIterator<Item = Dated<Option<Decimal>>>,
{
    prices
        .into_iter()
        .filter_map(|point| point.value.map(|value| Dated::new(value, point.date)))
        .find(|point| point.value <= Decimal::ZERO)
        .map_or(Ok(()), |point| Err(invalid_price(symbol, point)))
}

fn invalid_price(symbol: &Symbol, point: Dated<Decimal>) -> AnalysisError {
    AnalysisError::InvalidPrice {
        symbol: symbol.clone(),
        date: point.date,
        price: point.value,
    }
}

/// 所有代码的收益率序列，由 [`AggregatedTable`] 一次性推导，之后不可变。
///
/// 代码顺序与聚合表一致；计算失败的代码不在表中，其错误单独返回。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReturnsTable {
    field: PriceField,
    alignment: DateAlignment,
    series: FnvIndexMap<Symbol, ReturnSeries>,
}

impl ReturnsTable {
    /// 对每个代码独立应用收益率转换。
    ///
    /// 一个代码失败（例如零价格）不会影响其它代码：成功的代码组成
    /// [`ReturnsTable`]，失败的代码记录在并行返回的 [`SymbolErrors`] 中。
    pub fn compute(
        aggregated: &AggregatedTable,
        field: PriceField,
        alignment: DateAlignment,
    ) -> (Self, SymbolErrors) {
        let axis = match alignment {
            DateAlignment::Native => Vec::new(),
            DateAlignment::Calendar => aggregated.date_axis(),
        };

        let mut series = FnvIndexMap::default();
        let mut errors = SymbolErrors::default();

        for (symbol, table) in aggregated {
            let result = match alignment {
                DateAlignment::Native => compute_returns(symbol, table, field),
                DateAlignment::Calendar => {
                    let column = aggregated
                        .aligned_column(symbol.as_str(), field, &axis)
                        .unwrap_or_default();
                    compute_aligned_returns(symbol, &column)
                }
            };

            match result {
                Ok(returns) => {
                    series.insert(symbol.clone(), returns);
                }
                Err(error) => {
                    warn!(%symbol, %error, "failed to compute returns");
                    errors.insert(symbol.clone(), error);
                }
            }
        }

        info!(
            ?field,
            ?alignment,
            symbols = series.len(),
            failed = errors.len(),
            "computed ReturnsTable"
        );

        (
            Self {
                field,
                alignment,
                series,
            },
            errors,
        )
    }

    /// 从已计算好的序列直接构造。
    pub fn from_series<Iter>(field: PriceField, alignment: DateAlignment, series: Iter) -> Self
    where
        Iter: IntoIterator<Item = (Symbol, ReturnSeries)>,
    {
        Self {
            field,
            alignment,
            series: series.into_iter().collect(),
        }
    }

    pub fn field(&self) -> PriceField {
        self.field
    }

    pub fn alignment(&self) -> DateAlignment {
        self.alignment
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.series.keys()
    }

    pub fn series(&self, symbol: &str) -> Option<&ReturnSeries> {
        self.series.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &ReturnSeries)> {
        self.series.iter()
    }
}

impl<'a> IntoIterator for &'a ReturnsTable {
    type Item = (&'a Symbol, &'a ReturnSeries);
    type IntoIter = indexmap::map::Iter<'a, Symbol, ReturnSeries>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}
