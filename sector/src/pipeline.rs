//! Pipeline 分析流水线模块
//!
//! 将各个纯函数显式组合为一次完整的分析运行：
//!
//! 1. [`fetch_all`]: 通过 [`PriceLoader`] 逐代码获取价格表
//! 2. [`aggregate`]: 合并成功获取的价格表
//! 3. [`ReturnsTable::compute`]: 逐代码计算简单收益率
//! 4. 按需在任意日期子区间上计算统计量，例如 [`Analysis::summary`]
//!
//! 每一步的逐代码失败都被记录在 [`Analysis::errors`] 中，不会影响其它代码。
//! 只有当没有任何代码存活时，整个运行才会失败。

use crate::{
    aggregate::{AggregatedTable, aggregate},
    config::AnalysisConfig,
    error::{AnalysisError, EmptyInput, SectorError, SymbolErrors},
    returns::{DateAlignment, ReturnsTable},
    statistic::{summary::SectorSummary, time::TimeInterval},
};
use chrono::NaiveDate;
use sector_data::{
    collection::FnvIndexMap,
    loader::PriceLoader,
    range::DateRange,
    record::PriceField,
    symbol::Symbol,
    table::PriceTable,
};
use tracing::{info, warn};

/// [`fetch_all`] 的结果：成功获取的价格表，以及失败代码的错误。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchOutcome {
    pub tables: FnvIndexMap<Symbol, PriceTable>,
    pub errors: SymbolErrors,
}

/// 逐代码获取 `[start, end]` 内的价格表。
///
/// 单个代码获取失败或返回空表时，错误被记录在 [`FetchOutcome::errors`] 中，
/// 已获取的其它代码不受影响。重复的代码只获取一次。
pub fn fetch_all<Loader>(
    loader: &Loader,
    symbols: &[Symbol],
    start: NaiveDate,
    end: NaiveDate,
) -> FetchOutcome
where
    Loader: PriceLoader + ?Sized,
{
    let mut outcome = FetchOutcome::default();

    for symbol in symbols {
        if outcome.tables.contains_key(symbol) || outcome.errors.contains_key(symbol) {
            warn!(%symbol, "skipping duplicate symbol");
            continue;
        }

        match loader.fetch(symbol, start, end) {
            Ok(table) if table.is_empty() => {
                warn!(%symbol, %start, %end, "no price records in range");
                outcome.errors.insert(
                    symbol.clone(),
                    AnalysisError::EmptyInput(EmptyInput::Symbol(symbol.clone())),
                );
            }
            Ok(table) => {
                outcome.tables.insert(symbol.clone(), table);
            }
            Err(error) => {
                warn!(%symbol, %error, "failed to fetch PriceTable");
                outcome
                    .errors
                    .insert(symbol.clone(), AnalysisError::from(error));
            }
        }
    }

    info!(
        fetched = outcome.tables.len(),
        failed = outcome.errors.len(),
        "fetched PriceTables"
    );

    outcome
}

/// 一次完整分析运行的结果。
///
/// ## 字段说明
///
/// - **aggregated**: 成功获取的所有代码的聚合价格表
/// - **returns**: 成功计算收益率的代码的收益率表
/// - **errors**: 在获取或收益率计算阶段失败的代码
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub aggregated: AggregatedTable,
    pub returns: ReturnsTable,
    pub errors: SymbolErrors,
}

impl Analysis {
    /// 按 `config` 运行 获取 → 聚合 → 收益率。
    ///
    /// # 错误
    ///
    /// - 配置非法：[`SectorError::Config`]
    /// - 没有任何代码存活：[`SectorError::Analysis`]
    pub fn run<Loader>(loader: &Loader, config: &AnalysisConfig) -> Result<Self, SectorError>
    where
        Loader: PriceLoader + ?Sized,
    {
        config.validate()?;

        info!(
            symbols = config.symbols.len(),
            range = %config.range(),
            field = %config.field,
            alignment = ?config.alignment,
            "running Analysis"
        );

        let FetchOutcome { tables, errors } =
            fetch_all(loader, &config.symbols, config.start, config.end);

        Self::from_tables(tables, errors, config.field, config.alignment)
    }

    /// 从已获取的价格表继续 聚合 → 收益率，`errors` 为此前阶段已记录的失败。
    pub fn from_tables<Iter>(
        tables: Iter,
        mut errors: SymbolErrors,
        field: PriceField,
        alignment: DateAlignment,
    ) -> Result<Self, SectorError>
    where
        Iter: IntoIterator<Item = (Symbol, PriceTable)>,
    {
        let aggregated = aggregate(tables)?;

        let (returns, returns_errors) = ReturnsTable::compute(&aggregated, field, alignment);
        errors.extend(returns_errors);

        if returns.is_empty() {
            return Err(AnalysisError::EmptyInput(EmptyInput::NoSymbols).into());
        }

        Ok(Self {
            aggregated,
            returns,
            errors,
        })
    }

    /// 在 `range` 内生成所有存活代码的 [`SectorSummary`]，并缩放到 `interval`。
    pub fn summary<Interval>(
        &self,
        range: DateRange,
        interval: Interval,
    ) -> SectorSummary<Interval>
    where
        Interval: TimeInterval,
    {
        SectorSummary::generate(&self.returns, range, interval)
    }

    pub fn error(&self, symbol: &str) -> Option<&AnalysisError> {
        self.errors.get(symbol)
    }
}
