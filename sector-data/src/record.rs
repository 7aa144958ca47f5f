use crate::Dated;
use chrono::NaiveDate;
use derive_more::{Constructor, Display};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 单个股票代码在单个交易日的价格记录。
///
/// 由 [`PriceLoader`](crate::loader::PriceLoader) 创建，获取后不可变。
///
/// ## 字段说明
///
/// - **date**: 交易日期
/// - **open / high / low / close**: 开盘价、最高价、最低价、收盘价
/// - **adjusted_close**: 复权收盘价（本系统不使用分红信息，但保留该字段）
/// - **volume**: 成交量
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize, Constructor)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub adjusted_close: Decimal,
    pub volume: u64,
}

impl PriceRecord {
    /// 返回指定 [`PriceField`] 的值。成交量会被转换为 [`Decimal`]。
    pub fn value(&self, field: PriceField) -> Decimal {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::AdjustedClose => self.adjusted_close,
            PriceField::Volume => Decimal::from(self.volume),
        }
    }

    /// 返回指定 [`PriceField`] 的带日期值。
    pub fn dated(&self, field: PriceField) -> Dated<Decimal> {
        Dated::new(self.value(field), self.date)
    }
}

/// [`PriceRecord`] 字段选择器，用于按 (symbol, field) 寻址聚合表中的列。
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Default,
    Display,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    #[default]
    Close,
    #[display("Adj Close")]
    AdjustedClose,
    Volume,
}
