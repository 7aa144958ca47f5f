use crate::statistic::{summary::SectorSummary, time::TimeInterval};
use prettytable::{Table, row};
use rust_decimal::Decimal;
use std::fmt::{Display, Formatter};

impl<Interval> SectorSummary<Interval>
where
    Interval: TimeInterval,
{
    /// 每个代码一行的摘要表格，收益率以百分比显示。
    pub fn table(&self) -> Table {
        let interval = self.interval.name();

        let mut table = Table::new();
        table.set_titles(row![
            "Symbol",
            "Observations",
            format!("Mean Return ({interval})"),
            format!("Volatility ({interval})"),
            "Worst Day",
            "Worst Return",
            "Best Day",
            "Best Return",
        ]);

        for (symbol, tear_sheet) in &self.symbols {
            table.add_row(row![
                symbol,
                tear_sheet.observations,
                percent(tear_sheet.mean_return.value),
                percent(tear_sheet.volatility.value),
                tear_sheet.worst.date,
                percent(tear_sheet.worst.value),
                tear_sheet.best.date,
                percent(tear_sheet.best.value),
            ]);
        }

        table
    }

    /// 无法生成摘要的代码及其错误。
    pub fn error_table(&self) -> Table {
        let mut table = Table::new();
        table.set_titles(row!["Symbol", "Error"]);

        for (symbol, error) in &self.errors {
            table.add_row(row![symbol, error]);
        }

        table
    }

    /// 打印摘要到标准输出。
    pub fn print_summary(&self) {
        println!("\n--- {} Summary {} ---\n", self.field, self.range);
        self.table().printstd();

        if !self.errors.is_empty() {
            println!("\n--- Unavailable ---\n");
            self.error_table().printstd();
        }
    }
}

impl<Interval> Display for SectorSummary<Interval>
where
    Interval: TimeInterval,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// 超出 [`Decimal`] 范围的百分比显示为原始值。
fn percent(value: Decimal) -> String {
    match value.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => format!("{:.4}%", percent.round_dp(4)),
        None => value.to_string(),
    }
}
