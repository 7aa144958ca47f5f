use derive_more::Display;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::borrow::Borrow;

/// 股票代码（Ticker），例如 `"BAC"`、`"GS"`。
///
/// 内部使用 [`SmolStr`]，短代码无需堆分配，克隆廉价。
///
/// ```rust
/// use sector_data::symbol::Symbol;
///
/// let symbol = Symbol::new("JPM");
/// assert_eq!(symbol.as_str(), "JPM");
/// assert_eq!(symbol.to_string(), "JPM");
/// ```
#[derive(
    Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Display, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct Symbol(pub SmolStr);

impl Symbol {
    /// 从任意字符串类值构造 [`Symbol`]。
    pub fn new<S>(symbol: S) -> Self
    where
        S: Into<SmolStr>,
    {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<SmolStr> for Symbol {
    fn from(value: SmolStr) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
