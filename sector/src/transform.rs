//! Transform 价格序列转换模块
//!
//! 目前提供简单移动平均（SMA），例如高盛收盘价的 15 日移动平均。

use rust_decimal::Decimal;
use sector_data::Dated;
use std::num::NonZeroUsize;

/// 以 `window` 为窗口长度的简单移动平均。
///
/// 输出与输入等长：前 `window - 1` 个值为 `None`，第 `i` 个值是以 `i` 结尾的
/// `window` 个值的算术平均值。
///
/// # 使用示例
///
/// ```rust,ignore
/// let closes = aggregated.column("GS", PriceField::Close).unwrap_or_default();
/// let sma_15 = rolling_mean(&closes, NonZeroUsize::new(15).unwrap());
/// ```
pub fn rolling_mean(
    series: &[Dated<Decimal>],
    window: NonZeroUsize,
) -> Vec<Dated<Option<Decimal>>> {
    let window = window.get();
    let divisor = Decimal::from(window);
    let mut sum = Decimal::ZERO;

    series
        .iter()
        .enumerate()
        .map(|(index, point)| {
            sum += point.value;
            if index >= window {
                sum -= series[index - window].value;
            }

            let value = (index + 1 >= window).then(|| sum / divisor);
            Dated::new(value, point.date)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;
    use rust_decimal_macros::dec;

    fn window(value: usize) -> NonZeroUsize {
        NonZeroUsize::new(value).unwrap()
    }

    #[test]
    fn test_rolling_mean() {
        struct TestCase {
            input: Vec<Decimal>,
            window: NonZeroUsize,
            expected: Vec<Option<Decimal>>,
        }

        let cases = vec![
            // TC0: window of one is the identity
            TestCase {
                input: vec![dec!(1), dec!(2), dec!(3)],
                window: window(1),
                expected: vec![Some(dec!(1)), Some(dec!(2)), Some(dec!(3))],
            },
            // TC1: leading values undefined
            TestCase {
                input: vec![dec!(10), dec!(20), dec!(30), dec!(40), dec!(50)],
                window: window(3),
                expected: vec![None, None, Some(dec!(20)), Some(dec!(30)), Some(dec!(40))],
            },
            // TC2: window longer than the series
            TestCase {
                input: vec![dec!(10), dec!(20)],
                window: window(15),
                expected: vec![None, None],
            },
            // TC3: empty series
            TestCase {
                input: vec![],
                window: window(15),
                expected: vec![],
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let series = test
                .input
                .iter()
                .enumerate()
                .map(|(day, value)| Dated::new(*value, date(1, day as u32 + 1)))
                .collect::<Vec<_>>();

            let actual = rolling_mean(&series, test.window);

            assert_eq!(actual.len(), series.len(), "TC{index} failed");
            assert_eq!(
                actual.iter().map(|point| point.value).collect::<Vec<_>>(),
                test.expected,
                "TC{index} failed"
            );
            assert!(
                actual
                    .iter()
                    .zip(&series)
                    .all(|(mean, price)| mean.date == price.date),
                "TC{index} failed"
            );
        }
    }
}
