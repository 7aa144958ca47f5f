// 允许 dev-dependencies 中的未使用 extern crate 警告
// 这些依赖仅在测试中使用，不在库代码中使用
#![allow(unused_extern_crates)]
#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms,
    rust_2024_compatibility
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments, type_alias_bounds)]

//! # Sector-Data
//! 日频股票价格数据模型，以及用于获取价格数据的可插拔加载器接口。
//!
//! 被 `sector` 分析核心使用，负责描述"原始数据长什么样"以及"从哪里来"：
//! * **强类型**: [`PriceRecord`](record::PriceRecord) 与 [`PriceTable`](table::PriceTable)
//!   在构造时校验日期严格递增、无重复。
//! * **可插拔**: [`PriceLoader`](loader::PriceLoader) Trait 将数据源与分析逻辑解耦，
//!   内存数据源与 JSON 文件数据源均为其实现。
//! * **无副作用**: 除加载器外，本 crate 中的所有操作都是纯函数。
//!
//! ## 核心抽象：
//! - **PriceTable**: 单个 [`Symbol`](symbol::Symbol) 按日期排序的价格记录序列。
//! - **PriceLoader**: `fetch(symbol, start, end) -> PriceTable`，失败时返回
//!   [`DataError::Unavailable`](error::DataError::Unavailable)。

use chrono::NaiveDate;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Sector-Data 中生成的所有 [`Error`](std::error::Error)。
pub mod error;

/// 股票代码 [`Symbol`](symbol::Symbol) 新类型。
pub mod symbol;

/// 单日价格记录 [`PriceRecord`](record::PriceRecord) 及其字段选择器
/// [`PriceField`](record::PriceField)。
pub mod record;

/// 单个股票代码的有序价格表 [`PriceTable`](table::PriceTable)。
pub mod table;

/// 闭区间日期范围 [`DateRange`](range::DateRange)。
pub mod range;

/// [`PriceLoader`](loader::PriceLoader) 接口以及内存、JSON 文件实现。
pub mod loader;

/// 集合工具。
pub mod collection;

/// 带交易日期的值。
///
/// 用于将任意值与其所属的交易日关联，例如某日的收盘价或收益率。
///
/// # 类型参数
///
/// - `T`: 值的类型
///
/// # 使用示例
///
/// ```rust
/// use chrono::NaiveDate;
/// use sector_data::Dated;
///
/// let date = NaiveDate::from_ymd_opt(2020, 3, 16).unwrap();
/// let worst = Dated::new(-0.17, date);
/// assert_eq!(worst.date, date);
/// ```
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Deserialize,
    Serialize,
    Constructor,
)]
pub struct Dated<T> {
    /// 存储的值
    pub value: T,
    /// 交易日期
    pub date: NaiveDate,
}

impl<T> Dated<T> {
    /// 保持日期不变，转换内部值。
    pub fn map<U, F>(self, op: F) -> Dated<U>
    where
        F: FnOnce(T) -> U,
    {
        Dated {
            value: op(self.value),
            date: self.date,
        }
    }
}
