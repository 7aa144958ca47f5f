//! Chart 可视化数据模块
//!
//! 核心库不依赖任何绘图实现，只把聚合表、收益率表和直方图转换为可序列化的 [`Chart`]。
//! 具体的渲染由可替换的 [`ChartRenderer`] 完成。
//!
//! # 核心概念
//!
//! - **Chart**: 标题、纵轴标签、图表类型与若干数据序列
//! - **ChartRenderer**: 渲染接口，例如 [`JsonRenderer`] 把每个图表写为一个 JSON 文档

use crate::{
    aggregate::AggregatedTable,
    returns::ReturnsTable,
    statistic::distribution::Histogram,
    transform::rolling_mean,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sector_data::{Dated, range::DateRange, record::PriceField};
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};
use std::{io::Write, num::NonZeroUsize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Histogram,
}

/// 与渲染实现无关的图表数据。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chart {
    pub title: SmolStr,
    pub y_label: SmolStr,
    pub kind: ChartKind,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChartSeries {
    pub name: SmolStr,
    pub points: Vec<ChartPoint>,
}

/// 单个数据点。`y` 为 `None` 表示该处没有值（例如未定义的收益率），渲染时应留空。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChartPoint {
    pub x: ChartX,
    pub y: Option<Decimal>,
}

/// 横轴取值：时间序列使用日期，直方图使用区间下界。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ChartX {
    Date(NaiveDate),
    Value(Decimal),
}

impl ChartSeries {
    fn from_dated<Iter>(name: SmolStr, points: Iter) -> Self
    where
        Iter: IntoIterator<Item = Dated<Option<Decimal>>>,
    {
        Self {
            name,
            points: points
                .into_iter()
                .map(|point| ChartPoint {
                    x: ChartX::Date(point.date),
                    y: point.value,
                })
                .collect(),
        }
    }
}

/// 每个代码 `field` 列的价格走势，每个代码一条线。
pub fn price_chart(aggregated: &AggregatedTable, field: PriceField) -> Chart {
    Chart {
        title: format_smolstr!("{field} Price"),
        y_label: format_smolstr!("{field}"),
        kind: ChartKind::Line,
        series: aggregated
            .tables()
            .map(|(symbol, table)| {
                ChartSeries::from_dated(
                    format_smolstr!("{symbol}"),
                    table.column(field).into_iter().map(|point| point.map(Some)),
                )
            })
            .collect(),
    }
}

/// 单个代码的价格与其 `window` 日移动平均。代码不在聚合表中时返回 `None`。
pub fn moving_average_chart(
    aggregated: &AggregatedTable,
    symbol: &str,
    field: PriceField,
    window: NonZeroUsize,
) -> Option<Chart> {
    let column = aggregated.column(symbol, field)?;
    let average = rolling_mean(&column, window);

    Some(Chart {
        title: format_smolstr!("{symbol} {field} {window}-Day Moving Average"),
        y_label: format_smolstr!("{field}"),
        kind: ChartKind::Line,
        series: vec![
            ChartSeries::from_dated(
                format_smolstr!("{symbol} {field}"),
                column.into_iter().map(|point| point.map(Some)),
            ),
            ChartSeries::from_dated(format_smolstr!("{window}-Day Average"), average),
        ],
    })
}

/// 每个代码在 `range` 内的日收益率，每个代码一条线。
pub fn returns_chart(returns: &ReturnsTable, range: DateRange) -> Chart {
    Chart {
        title: format_smolstr!("Daily Returns {range}"),
        y_label: SmolStr::new("Return"),
        kind: ChartKind::Line,
        series: returns
            .iter()
            .map(|(symbol, series)| {
                ChartSeries::from_dated(
                    format_smolstr!("{symbol}"),
                    series.within(range).iter().copied(),
                )
            })
            .collect(),
    }
}

/// 直方图，横轴为每个区间的下界，纵轴为观测数量。
pub fn distribution_chart(histogram: &Histogram) -> Chart {
    Chart {
        title: format_smolstr!("{} Return Distribution {}", histogram.symbol, histogram.range),
        y_label: SmolStr::new("Count"),
        kind: ChartKind::Histogram,
        series: vec![ChartSeries {
            name: format_smolstr!("{}", histogram.symbol),
            points: histogram
                .bins()
                .map(|bin| ChartPoint {
                    x: ChartX::Value(bin.lower),
                    y: Some(Decimal::from(bin.count)),
                })
                .collect(),
        }],
    }
}

/// 图表渲染接口。
///
/// 实现可以写入文件、终端或任意绘图后端；核心库只产生 [`Chart`] 数据。
pub trait ChartRenderer {
    type Error;

    fn render(&mut self, chart: &Chart) -> Result<(), Self::Error>;
}

/// 把每个 [`Chart`] 写为一行 JSON 文档。
#[derive(Debug)]
pub struct JsonRenderer<W> {
    writer: W,
}

impl<W> JsonRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> ChartRenderer for JsonRenderer<W>
where
    W: Write,
{
    type Error = serde_json::Error;

    fn render(&mut self, chart: &Chart) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.writer, chart)?;
        self.writer.write_all(b"\n").map_err(serde_json::Error::io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{aggregated, date, returns_table};
    use rust_decimal_macros::dec;
    use sector_data::symbol::Symbol;

    fn closes() -> Vec<(NaiveDate, Decimal)> {
        vec![
            (date(2, 3), dec!(10)),
            (date(2, 4), dec!(12)),
            (date(2, 5), dec!(11)),
            (date(2, 6), dec!(13)),
        ]
    }

    #[test]
    fn test_price_chart() {
        let closes = closes();
        let table = aggregated(&[("GS", closes.as_slice()), ("MS", &closes[..2])]);

        let actual = price_chart(&table, PriceField::Close);

        assert_eq!(actual.kind, ChartKind::Line);
        assert_eq!(actual.title, "Close Price");
        assert_eq!(actual.series.len(), 2);
        assert_eq!(actual.series[1].name, "MS");
        assert_eq!(actual.series[1].points.len(), 2);
    }

    #[test]
    fn test_moving_average_chart() {
        let closes = closes();
        let table = aggregated(&[("GS", closes.as_slice())]);
        let window = NonZeroUsize::new(2).unwrap();

        let actual = moving_average_chart(&table, "GS", PriceField::Close, window).unwrap();

        assert_eq!(actual.series.len(), 2);
        assert_eq!(actual.series[1].name, "2-Day Average");
        assert_eq!(actual.series[1].points[0].y, None);
        assert_eq!(actual.series[1].points[1].y, Some(dec!(11)));
        assert!(moving_average_chart(&table, "PNC", PriceField::Close, window).is_none());
    }

    #[test]
    fn test_returns_and_distribution_charts() {
        let closes = closes();
        let returns = returns_table(&[("C", closes.as_slice())]);

        let chart = returns_chart(&returns, DateRange::since(date(2, 5)));
        assert_eq!(chart.series[0].points.len(), 2);
        assert_eq!(chart.series[0].points[0].x, ChartX::Date(date(2, 5)));

        let histogram = Histogram::from_series(
            &Symbol::new("C"),
            returns.series("C").unwrap(),
            DateRange::full(),
            NonZeroUsize::new(2).unwrap(),
        )
        .unwrap();
        let chart = distribution_chart(&histogram);
        let total = chart.series[0]
            .points
            .iter()
            .filter_map(|point| point.y)
            .sum::<Decimal>();

        assert_eq!(chart.kind, ChartKind::Histogram);
        assert_eq!(total, dec!(3));
    }

    #[test]
    fn test_json_renderer_writes_one_document_per_chart() {
        let closes = closes();
        let table = aggregated(&[("USB", closes.as_slice())]);
        let chart = price_chart(&table, PriceField::Close);

        let mut renderer = JsonRenderer::new(Vec::new());
        renderer.render(&chart).unwrap();
        renderer.render(&chart).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let documents = output
            .lines()
            .map(|line| serde_json::from_str::<Chart>(line).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(documents, vec![chart.clone(), chart]);
    }
}
