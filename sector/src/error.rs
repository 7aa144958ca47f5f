//! Error 错误处理模块
//!
//! 本模块定义了分析流水线可能遇到的所有错误类型。错误被分为逐代码错误和顶层错误，
//! 这种分类决定了批量计算时的错误传播策略。
//!
//! # 核心概念
//!
//! - **AnalysisError**: 逐代码错误，只影响出错的那个 [`Symbol`]
//! - **SectorError**: 顶层错误，整个调用无法产生任何结果时返回
//! - **SymbolErrors**: `Symbol -> AnalysisError` 映射，与部分结果并行返回
//!
//! # 错误传播策略
//!
//! 一个代码的失败不会中止其它代码的统计。批量操作返回
//! [`PerSymbol`](crate::PerSymbol)：成功代码的结果映射，加上失败代码的错误映射。
//! 本系统不做任何重试，由调用方决定忽略、向上游重试还是中止。

use chrono::NaiveDate;
use derive_more::Display;
use rust_decimal::Decimal;
use sector_data::{collection::FnvIndexMap, error::DataError, range::DateRange, symbol::Symbol};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 失败代码到其 [`AnalysisError`] 的映射，保持插入顺序。
pub type SymbolErrors = FnvIndexMap<Symbol, AnalysisError>;

/// 顶层错误：调用整体无法产生结果。
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize, Error)]
pub enum SectorError {
    #[error("analysis: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("data: {0}")]
    Data(#[from] DataError),

    #[error("config: {0}")]
    Config(String),
}

/// 作用域为单个 [`Symbol`] 的分析错误。
///
/// ## 错误分类
///
/// - **EmptyInput**: 没有提供任何代码，或某代码的价格表为空
/// - **DuplicateSymbol**: 聚合时同一代码出现多次
/// - **InvalidPrice**: 零或负价格，无法计算收益率
/// - **InsufficientData**: 区间内有效数据点不足（例如标准差需要至少 2 个）
/// - **EmptyRange**: 请求的日期区间排除了该代码的全部日期
/// - **Overflow**: 计算结果超出 [`Decimal`] 的表示范围
/// - **DataUnavailable**: 上游加载器失败
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize, Error)]
pub enum AnalysisError {
    #[error("EmptyInput: {0}")]
    EmptyInput(EmptyInput),

    #[error("DuplicateSymbol: {0} supplied more than once")]
    DuplicateSymbol(Symbol),

    /// 价格必须严格为正，否则收益率 `(p[i] - p[i-1]) / p[i-1]` 无定义。
    #[error("InvalidPrice: {symbol} has non-positive price {price} on {date}")]
    InvalidPrice {
        symbol: Symbol,
        date: NaiveDate,
        price: Decimal,
    },

    #[error(
        "InsufficientData: {symbol} has {count} defined values in range, {required} required"
    )]
    InsufficientData {
        symbol: Symbol,
        count: usize,
        required: usize,
    },

    #[error("EmptyRange: {range} excludes all data for {symbol}")]
    EmptyRange { symbol: Symbol, range: DateRange },

    /// 价格均为正，但收益率或其统计量超出 [`Decimal`] 的表示范围，例如从极小的价格开始的收益率。
    #[error("Overflow: {symbol} exceeds the Decimal range on {date}")]
    Overflow { symbol: Symbol, date: NaiveDate },

    #[error("{0}")]
    DataUnavailable(#[from] DataError),
}

impl AnalysisError {
    pub fn overflow(symbol: &Symbol, date: NaiveDate) -> Self {
        Self::Overflow {
            symbol: symbol.clone(),
            date,
        }
    }

    /// 错误所属的 [`Symbol`]（若可确定）。
    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Self::EmptyInput(EmptyInput::Symbol(symbol))
            | Self::DuplicateSymbol(symbol)
            | Self::InvalidPrice { symbol, .. }
            | Self::InsufficientData { symbol, .. }
            | Self::EmptyRange { symbol, .. }
            | Self::Overflow { symbol, .. }
            | Self::DataUnavailable(DataError::Unavailable { symbol, .. }) => Some(symbol),
            Self::EmptyInput(EmptyInput::NoSymbols) | Self::DataUnavailable(_) => None,
        }
    }
}

/// [`AnalysisError::EmptyInput`] 的具体原因。
#[derive(Debug, Clone, Eq, PartialEq, Hash, Display, Deserialize, Serialize)]
pub enum EmptyInput {
    #[display("no symbols supplied")]
    NoSymbols,
    #[display("no price records for {_0}")]
    Symbol(Symbol),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_symbol() {
        let symbol = Symbol::new("C");

        struct TestCase {
            input: AnalysisError,
            expected: Option<Symbol>,
        }

        let cases = vec![
            // TC0
            TestCase {
                input: AnalysisError::EmptyInput(EmptyInput::NoSymbols),
                expected: None,
            },
            // TC1
            TestCase {
                input: AnalysisError::EmptyInput(EmptyInput::Symbol(symbol.clone())),
                expected: Some(symbol.clone()),
            },
            // TC2
            TestCase {
                input: AnalysisError::InsufficientData {
                    symbol: symbol.clone(),
                    count: 1,
                    required: 2,
                },
                expected: Some(symbol.clone()),
            },
            // TC3
            TestCase {
                input: AnalysisError::from(DataError::unavailable(symbol.clone(), "timeout")),
                expected: Some(symbol.clone()),
            },
            // TC4
            TestCase {
                input: AnalysisError::overflow(&symbol, NaiveDate::MIN),
                expected: Some(symbol.clone()),
            },
            // TC5
            TestCase {
                input: AnalysisError::from(DataError::Io("disk".to_string())),
                expected: None,
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            assert_eq!(test.input.symbol(), test.expected.as_ref(), "TC{index} failed");
        }
    }

    #[test]
    fn test_analysis_error_display() {
        let error = AnalysisError::EmptyInput(EmptyInput::Symbol(Symbol::new("USB")));
        assert_eq!(error.to_string(), "EmptyInput: no price records for USB");

        let error = AnalysisError::EmptyInput(EmptyInput::NoSymbols);
        assert_eq!(error.to_string(), "EmptyInput: no symbols supplied");
    }
}
