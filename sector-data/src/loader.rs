//! Loader 价格加载器模块
//!
//! 本模块定义了价格数据源的接口和实现。
//! 分析核心只依赖 [`PriceLoader`] Trait，数据具体来自网络、文件还是内存由调用方决定。
//!
//! # 核心概念
//!
//! - **PriceLoader**: `fetch(symbol, start, end) -> PriceTable`
//! - **InMemoryLoader**: 内存数据源，常用于测试和离线复现
//! - **JsonFileLoader**: 每个代码一个 JSON 文件的本地数据源

use crate::{
    error::DataError, range::DateRange, record::PriceRecord, symbol::Symbol, table::PriceTable,
};
use chrono::NaiveDate;
use fnv::FnvHashMap;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::debug;

/// 提供单个 [`Symbol`] 在 `[start, end]` 内日频 [`PriceTable`] 的接口。
///
/// 这是整个系统中唯一可能阻塞的调用。实现者在数据源失败时应返回
/// [`DataError::Unavailable`]，而不是 panic，以便调用方按代码隔离错误。
pub trait PriceLoader {
    /// 获取 `symbol` 在闭区间 `[start, end]` 内的价格表。
    fn fetch(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError>;
}

impl<Loader> PriceLoader for &Loader
where
    Loader: PriceLoader + ?Sized,
{
    fn fetch(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        (**self).fetch(symbol, start, end)
    }
}

/// 内存中的价格数据。
///
/// 保存每个代码的完整 [`PriceTable`]，`fetch` 时按请求区间截取。
/// 未注册的代码返回 [`DataError::Unavailable`]。
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    tables: FnvHashMap<Symbol, PriceTable>,
}

impl InMemoryLoader {
    /// 注册（或替换）一个代码的价格表。
    pub fn with_table<S>(mut self, symbol: S, table: PriceTable) -> Self
    where
        S: Into<Symbol>,
    {
        self.insert(symbol, table);
        self
    }

    /// 原地注册（或替换）一个代码的价格表。
    pub fn insert<S>(&mut self, symbol: S, table: PriceTable)
    where
        S: Into<Symbol>,
    {
        self.tables.insert(symbol.into(), table);
    }
}

impl FromIterator<(Symbol, PriceTable)> for InMemoryLoader {
    fn from_iter<Iter>(iter: Iter) -> Self
    where
        Iter: IntoIterator<Item = (Symbol, PriceTable)>,
    {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

impl PriceLoader for InMemoryLoader {
    fn fetch(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        let table = self
            .tables
            .get(symbol)
            .ok_or_else(|| DataError::unavailable(symbol.clone(), "symbol not loaded in memory"))?;

        let records = table.within(DateRange::between(start, end)).to_vec();
        debug!(%symbol, %start, %end, records = records.len(), "InMemoryLoader fetched PriceTable");
        PriceTable::new(records)
    }
}

/// 本地 JSON 文件数据源。
///
/// 从 `<directory>/<SYMBOL>.json` 读取 [`PriceRecord`] 数组（日期格式 `YYYY-MM-DD`，
/// 价格可为字符串或数字），排序校验后按请求区间截取。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileLoader {
    directory: PathBuf,
}

impl JsonFileLoader {
    pub fn new<P>(directory: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 指定代码对应的 JSON 文件路径。
    pub fn path(&self, symbol: &Symbol) -> PathBuf {
        self.directory.join(format!("{symbol}.json"))
    }

    fn read_records(&self, symbol: &Symbol) -> Result<Vec<PriceRecord>, DataError> {
        let path = self.path(symbol);
        let file = File::open(&path).map_err(|error| {
            DataError::unavailable(symbol.clone(), format!("{}: {error}", path.display()))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(DataError::from)
    }
}

impl PriceLoader for JsonFileLoader {
    fn fetch(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable, DataError> {
        let records = self
            .read_records(symbol)?
            .into_iter()
            .filter(|record| DateRange::between(start, end).contains(record.date))
            .collect();

        let table = PriceTable::from_unsorted(records)?;
        debug!(
            %symbol,
            %start,
            %end,
            records = table.len(),
            directory = %self.directory().display(),
            "JsonFileLoader fetched PriceTable"
        );
        Ok(table)
    }
}
