use crate::symbol::Symbol;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sector-Data 中生成的所有错误。
///
/// ## 错误分类
///
/// - **Unavailable**: 上游数据源无法提供某个 [`Symbol`] 的数据（网络、文件缺失等）
/// - **UnorderedDates**: 价格记录违反了"日期严格递增、无重复"的不变式
/// - **Io** / **Deserialise**: 本地数据源的读取与解析失败
///
/// 所有变体都可克隆、可比较，便于作为逐个 [`Symbol`] 的错误映射值保存。
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Error)]
pub enum DataError {
    /// 数据源无法提供该代码的价格数据。
    #[error("DataUnavailable for {symbol}: {reason}")]
    Unavailable { symbol: Symbol, reason: String },

    /// 价格记录日期不是严格递增的（乱序或重复）。
    #[error("price record dates must be strictly increasing: {previous} followed by {next}")]
    UnorderedDates {
        previous: NaiveDate,
        next: NaiveDate,
    },

    #[error("I/O: {0}")]
    Io(String),

    #[error("deserialise: {0}")]
    Deserialise(String),
}

impl DataError {
    /// 构造 [`DataError::Unavailable`]。
    pub fn unavailable<Reason>(symbol: Symbol, reason: Reason) -> Self
    where
        Reason: Into<String>,
    {
        Self::Unavailable {
            symbol,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Deserialise(value.to_string())
    }
}
