use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// 两端均包含的日期范围 `[start, end]`。
///
/// `None` 表示该端无界，因此 [`DateRange::full`]（默认值）覆盖整个序列。
///
/// ```rust
/// use chrono::NaiveDate;
/// use sector_data::range::DateRange;
///
/// let date = |day| NaiveDate::from_ymd_opt(2020, 3, day).unwrap();
/// let range = DateRange::between(date(10), date(31));
///
/// assert!(range.contains(date(10)));
/// assert!(range.contains(date(31)));
/// assert!(!range.contains(date(9)));
/// assert!(DateRange::full().contains(date(1)));
/// ```
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Deserialize, Serialize,
)]
pub struct DateRange {
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// 无界范围，覆盖所有日期。
    pub fn full() -> Self {
        Self::default()
    }

    /// 闭区间 `[start, end]`。
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// `[start, +∞)`
    pub fn since(start: NaiveDate) -> Self {
        Self::new(Some(start), None)
    }

    /// `(-∞, end]`
    pub fn until(end: NaiveDate) -> Self {
        Self::new(None, Some(end))
    }

    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| start <= date) && self.end.is_none_or(|end| date <= end)
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(f, "[{start}, {end}]"),
            (Some(start), None) => write!(f, "[{start}, ..]"),
            (None, Some(end)) => write!(f, "[.., {end}]"),
            (None, None) => write!(f, "[.., ..]"),
        }
    }
}
