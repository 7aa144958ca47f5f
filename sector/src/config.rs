//! AnalysisConfig 分析配置模块
//!
//! 本模块提供了用于配置一次分析运行的数据结构，可以从 JSON 文件反序列化。
//!
//! # 核心概念
//!
//! - **AnalysisConfig**: 顶级配置：代码列表、日期区间、价格字段、对齐方式等
//! - **ReportRange**: 带名称的报告区间，例如 "Pandemic declaration"

use crate::{error::SectorError, returns::DateAlignment};
use chrono::NaiveDate;
use sector_data::{range::DateRange, record::PriceField, symbol::Symbol};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{fs::File, io::BufReader, num::NonZeroUsize, path::Path};
use tracing::debug;

/// 默认的十家美国银行业公司。
pub const BANKING_SYMBOLS: [&str; 10] = [
    "BAC", "C", "GS", "JPM", "MS", "WFC", "PNC", "SCHW", "USB", "TFC",
];

const DEFAULT_MOVING_AVERAGE_WINDOW: NonZeroUsize = match NonZeroUsize::new(15) {
    Some(window) => window,
    None => unreachable!(),
};

const DEFAULT_HISTOGRAM_BINS: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(bins) => bins,
    None => unreachable!(),
};

/// 一次分析运行的顶级配置。
///
/// ## 字段说明
///
/// - **symbols**: 要获取的代码，顺序即报告中的顺序
/// - **start** / **end**: 获取价格数据的闭区间
/// - **field**: 用于计算收益率的价格字段，默认为收盘价
/// - **alignment**: 收益率的日期对齐方式，默认为原生日期
/// - **moving_average_window**: 移动平均窗口长度
/// - **histogram_bins**: 收益率分布直方图的区间数量
/// - **report_ranges**: 需要生成摘要的命名日期区间
///
/// # 使用示例
///
/// ```json
/// {
///   "symbols": ["BAC", "C", "GS"],
///   "start": "2020-01-01",
///   "end": "2020-07-12",
///   "field": "close",
///   "alignment": "native",
///   "moving_average_window": 15,
///   "histogram_bins": 50,
///   "report_ranges": [
///     { "name": "Pandemic declaration", "range": { "start": "2020-03-10", "end": "2020-04-30" } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct AnalysisConfig {
    pub symbols: Vec<Symbol>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub field: PriceField,
    #[serde(default)]
    pub alignment: DateAlignment,
    #[serde(default = "default_moving_average_window")]
    pub moving_average_window: NonZeroUsize,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: NonZeroUsize,
    #[serde(default)]
    pub report_ranges: Vec<ReportRange>,
}

/// 带名称的报告区间。
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
pub struct ReportRange {
    pub name: SmolStr,
    pub range: DateRange,
}

impl ReportRange {
    pub fn new<S>(name: S, range: DateRange) -> Self
    where
        S: Into<SmolStr>,
    {
        Self {
            name: name.into(),
            range,
        }
    }
}

impl AnalysisConfig {
    /// 从 JSON 文件加载配置。
    ///
    /// # 错误
    ///
    /// 文件无法读取或内容非法时返回 [`SectorError::Config`]。
    pub fn load<P>(path: P) -> Result<Self, SectorError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|error| SectorError::Config(format!("{}: {error}", path.display())))?;

        let config = serde_json::from_reader::<_, Self>(BufReader::new(file))
            .map_err(|error| SectorError::Config(format!("{}: {error}", path.display())))?;

        config.validate()?;
        debug!(path = %path.display(), symbols = config.symbols.len(), "loaded AnalysisConfig");
        Ok(config)
    }

    /// 检查配置的内部一致性：至少一个代码，且 `start <= end`。
    pub fn validate(&self) -> Result<(), SectorError> {
        if self.symbols.is_empty() {
            return Err(SectorError::Config("no symbols configured".to_string()));
        }
        if self.start > self.end {
            return Err(SectorError::Config(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    /// 整个获取区间。
    pub fn range(&self) -> DateRange {
        DateRange::between(self.start, self.end)
    }

    /// 2020 年上半年十家美国银行股的预设配置。
    pub fn banking_2020() -> Self {
        Self {
            symbols: BANKING_SYMBOLS.into_iter().map(Symbol::new).collect(),
            start: date(2020, 1, 1),
            end: date(2020, 7, 12),
            field: PriceField::Close,
            alignment: DateAlignment::Native,
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            report_ranges: vec![
                ReportRange::new(
                    "2020 YTD",
                    DateRange::between(date(2020, 1, 1), date(2020, 7, 12)),
                ),
                ReportRange::new(
                    "Pandemic declaration",
                    DateRange::between(date(2020, 3, 10), date(2020, 4, 30)),
                ),
            ],
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::banking_2020()
    }
}

fn default_moving_average_window() -> NonZeroUsize {
    DEFAULT_MOVING_AVERAGE_WINDOW
}

fn default_histogram_bins() -> NonZeroUsize {
    DEFAULT_HISTOGRAM_BINS
}

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => NaiveDate::MIN,
    }
}
