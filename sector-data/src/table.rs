use crate::{
    Dated,
    error::DataError,
    range::DateRange,
    record::{PriceField, PriceRecord},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 单个股票代码按日期排序的 [`PriceRecord`] 序列。
///
/// ## 不变式
///
/// 日期严格递增，无重复日期。该不变式在 [`PriceTable::new`] 与
/// [`PriceTable::from_unsorted`] 中校验，之后表不可变。
///
/// 空表是合法的 `PriceTable`（例如请求区间内没有交易日），是否接受空表由
/// 聚合器决定。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceRecord>", into = "Vec<PriceRecord>")]
pub struct PriceTable {
    records: Vec<PriceRecord>,
}

impl PriceTable {
    /// 从已按日期排序的记录构造 [`PriceTable`]。
    ///
    /// 若存在乱序或重复日期，返回 [`DataError::UnorderedDates`]。
    pub fn new(records: Vec<PriceRecord>) -> Result<Self, DataError> {
        if let Some(pair) = records.windows(2).find(|pair| pair[0].date >= pair[1].date) {
            return Err(DataError::UnorderedDates {
                previous: pair[0].date,
                next: pair[1].date,
            });
        }

        Ok(Self { records })
    }

    /// 先按日期排序再构造 [`PriceTable`]。重复日期仍然会失败。
    pub fn from_unsorted(mut records: Vec<PriceRecord>) -> Result<Self, DataError> {
        records.sort_by_key(|record| record.date);
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|record| record.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|record| record.date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|record| record.date)
    }

    /// 提取单个 [`PriceField`] 列，保持原有日期索引。
    pub fn column(&self, field: PriceField) -> Vec<Dated<Decimal>> {
        self.records
            .iter()
            .map(|record| record.dated(field))
            .collect()
    }

    /// 返回落在 [`DateRange`] 内的连续记录切片。
    ///
    /// 依赖日期有序，使用二分查找定位边界。
    pub fn within(&self, range: DateRange) -> &[PriceRecord] {
        let start = range.start.map_or(0, |start| {
            self.records.partition_point(|record| record.date < start)
        });
        let end = range.end.map_or(self.records.len(), |end| {
            self.records.partition_point(|record| record.date <= end)
        });

        if start >= end {
            &[]
        } else {
            &self.records[start..end]
        }
    }
}

impl TryFrom<Vec<PriceRecord>> for PriceTable {
    type Error = DataError;

    fn try_from(value: Vec<PriceRecord>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PriceTable> for Vec<PriceRecord> {
    fn from(value: PriceTable) -> Self {
        value.records
    }
}

impl<'a> IntoIterator for &'a PriceTable {
    type Item = &'a PriceRecord;
    type IntoIter = std::slice::Iter<'a, PriceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
