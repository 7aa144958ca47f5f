//! Aggregate 多代码聚合模块
//!
//! 将 N 个单代码 [`PriceTable`] 合并为一个可按 (symbol, field) 寻址的 [`AggregatedTable`]。
//!
//! 聚合器不会强制使用统一的日期网格：每个代码保留自己的原生交易日索引。
//! 需要日历对齐时，使用 [`AggregatedTable::date_axis`] 与
//! [`AggregatedTable::aligned_column`] 显式生成。

use crate::error::{AnalysisError, EmptyInput};
use chrono::NaiveDate;
use itertools::Itertools;
use rust_decimal::Decimal;
use sector_data::{
    Dated,
    collection::FnvIndexMap,
    record::PriceField,
    symbol::Symbol,
    table::PriceTable,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 多个代码的价格表集合，共享一个逻辑日期轴，但每个代码可能有缺口。
///
/// ## 不变式
///
/// - 至少包含一个代码
/// - 每个代码映射到一个非空的 [`PriceTable`]
/// - 代码顺序即调用方提供的顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTable {
    tables: FnvIndexMap<Symbol, PriceTable>,
}

/// 合并单代码价格表。
///
/// 纯函数，无副作用。
///
/// # 错误
///
/// - 未提供任何代码：[`EmptyInput::NoSymbols`]
/// - 任一代码的价格表为空：[`EmptyInput::Symbol`]
/// - 同一代码出现多次：[`AnalysisError::DuplicateSymbol`]
pub fn aggregate<Iter>(tables: Iter) -> Result<AggregatedTable, AnalysisError>
where
    Iter: IntoIterator<Item = (Symbol, PriceTable)>,
{
    let mut aggregated = FnvIndexMap::default();

    for (symbol, table) in tables {
        if table.is_empty() {
            return Err(AnalysisError::EmptyInput(EmptyInput::Symbol(symbol)));
        }
        if aggregated.contains_key(&symbol) {
            return Err(AnalysisError::DuplicateSymbol(symbol));
        }
        aggregated.insert(symbol, table);
    }

    if aggregated.is_empty() {
        return Err(AnalysisError::EmptyInput(EmptyInput::NoSymbols));
    }

    debug!(
        symbols = aggregated.len(),
        records = aggregated.values().map(PriceTable::len).sum::<usize>(),
        "aggregated PriceTables"
    );

    Ok(AggregatedTable { tables: aggregated })
}

impl AggregatedTable {
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// 总是 `false`，保留以满足集合类型的惯例。
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.tables.keys()
    }

    pub fn tables(&self) -> impl Iterator<Item = (&Symbol, &PriceTable)> {
        self.tables.iter()
    }

    pub fn table(&self, symbol: &str) -> Option<&PriceTable> {
        self.tables.get(symbol)
    }

    /// 按 (symbol, field) 寻址单列，保持该代码的原生日期索引。
    pub fn column(&self, symbol: &str, field: PriceField) -> Option<Vec<Dated<Decimal>>> {
        self.table(symbol).map(|table| table.column(field))
    }

    /// 所有代码同一字段的横截面，例如所有银行的收盘价。
    pub fn cross_section(&self, field: PriceField) -> FnvIndexMap<Symbol, Vec<Dated<Decimal>>> {
        self.tables
            .iter()
            .map(|(symbol, table)| (symbol.clone(), table.column(field)))
            .collect()
    }

    /// 所有代码交易日期的并集，升序且无重复。
    pub fn date_axis(&self) -> Vec<NaiveDate> {
        self.tables
            .values()
            .map(|table| table.dates())
            .kmerge()
            .dedup()
            .collect()
    }

    /// 将某代码的单列重新索引到 `axis` 上，缺失的日期为 `None`。
    ///
    /// `axis` 必须升序；不在 `axis` 上的原生日期会被丢弃。
    pub fn aligned_column(
        &self,
        symbol: &str,
        field: PriceField,
        axis: &[NaiveDate],
    ) -> Option<Vec<Dated<Option<Decimal>>>> {
        let table = self.table(symbol)?;
        let mut records = table.records().iter().peekable();

        let column = axis
            .iter()
            .map(|date| {
                while records.next_if(|record| record.date < *date).is_some() {}
                let value = records
                    .next_if(|record| record.date == *date)
                    .map(|record| record.value(field));
                Dated::new(value, *date)
            })
            .collect();

        Some(column)
    }
}

impl<'a> IntoIterator for &'a AggregatedTable {
    type Item = (&'a Symbol, &'a PriceTable);
    type IntoIter = indexmap::map::Iter<'a, Symbol, PriceTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, price_table};
    use rust_decimal_macros::dec;

    #[test]
    fn test_aggregate() {
        struct TestCase {
            input: Vec<(Symbol, PriceTable)>,
            expected: Result<Vec<Symbol>, AnalysisError>,
        }

        let bac = price_table(&[(date(1, 2), dec!(35.64)), (date(1, 3), dec!(34.90))]);
        let jpm = price_table(&[(date(1, 2), dec!(141.09))]);

        let cases = vec![
            // TC0: zero symbols
            TestCase {
                input: vec![],
                expected: Err(AnalysisError::EmptyInput(EmptyInput::NoSymbols)),
            },
            // TC1: symbol with empty PriceTable
            TestCase {
                input: vec![
                    (Symbol::new("BAC"), bac.clone()),
                    (Symbol::new("C"), PriceTable::default()),
                ],
                expected: Err(AnalysisError::EmptyInput(EmptyInput::Symbol(Symbol::new(
                    "C",
                )))),
            },
            // TC2: duplicate symbol
            TestCase {
                input: vec![
                    (Symbol::new("BAC"), bac.clone()),
                    (Symbol::new("BAC"), bac.clone()),
                ],
                expected: Err(AnalysisError::DuplicateSymbol(Symbol::new("BAC"))),
            },
            // TC3: preserves caller order
            TestCase {
                input: vec![
                    (Symbol::new("JPM"), jpm.clone()),
                    (Symbol::new("BAC"), bac.clone()),
                ],
                expected: Ok(vec![Symbol::new("JPM"), Symbol::new("BAC")]),
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = aggregate(test.input)
                .map(|table| table.symbols().cloned().collect::<Vec<_>>());
            assert_eq!(actual, test.expected, "TC{index} failed");
        }
    }

    #[test]
    fn test_aggregated_table_keeps_native_dates() {
        let table = aggregate([
            (
                Symbol::new("GS"),
                price_table(&[(date(1, 2), dec!(229.93)), (date(1, 6), dec!(231.85))]),
            ),
            (
                Symbol::new("MS"),
                price_table(&[
                    (date(1, 2), dec!(51.93)),
                    (date(1, 3), dec!(51.26)),
                    (date(1, 6), dec!(51.19)),
                ]),
            ),
        ])
        .unwrap();

        assert_eq!(table.column("GS", PriceField::Close).unwrap().len(), 2);
        assert_eq!(table.column("MS", PriceField::Close).unwrap().len(), 3);
        assert_eq!(table.column("PNC", PriceField::Close), None);

        let closes = table.cross_section(PriceField::Close);
        assert_eq!(
            closes.keys().collect::<Vec<_>>(),
            vec![&Symbol::new("GS"), &Symbol::new("MS")]
        );
        assert_eq!(closes["GS"][1], Dated::new(dec!(231.85), date(1, 6)));
    }

    #[test]
    fn test_aggregated_table_date_axis_and_alignment() {
        let table = aggregate([
            (
                Symbol::new("SCHW"),
                price_table(&[(date(1, 2), dec!(48.0)), (date(1, 6), dec!(47.5))]),
            ),
            (
                Symbol::new("USB"),
                price_table(&[(date(1, 3), dec!(58.9)), (date(1, 6), dec!(58.7))]),
            ),
        ])
        .unwrap();

        let axis = table.date_axis();
        assert_eq!(axis, vec![date(1, 2), date(1, 3), date(1, 6)]);

        let aligned = table.aligned_column("SCHW", PriceField::Close, &axis).unwrap();
        assert_eq!(
            aligned,
            vec![
                Dated::new(Some(dec!(48.0)), date(1, 2)),
                Dated::new(None, date(1, 3)),
                Dated::new(Some(dec!(47.5)), date(1, 6)),
            ]
        );
    }
}
