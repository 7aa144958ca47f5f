use sector::{
    chart::{
        ChartRenderer, JsonRenderer, distribution_chart, moving_average_chart, price_chart,
        returns_chart,
    },
    config::AnalysisConfig,
    logging::init_logging,
    pipeline::Analysis,
    statistic::{
        distribution::distributions,
        extremes::argmin_dates,
        time::{Annual252, Daily},
    },
};
use sector_data::loader::JsonFileLoader;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::{info, warn};

/// 分析配置文件路径。
const FILE_PATH_ANALYSIS_CONFIG: &str = "sector/examples/config/banking_2020.json";

/// 默认价格数据目录，每个代码一个 `<SYMBOL>.json` 文件。
const DEFAULT_DATA_DIRECTORY: &str = "sector/examples/data";

/// 移动平均图使用的代码。
const MOVING_AVERAGE_SYMBOL: &str = "GS";

/// 分布图使用的代码。
const DISTRIBUTION_SYMBOL: &str = "C";

/// 示例：2020 年上半年新冠疫情对十家美国银行股收益率与波动率的影响。
///
/// 价格数据目录可以通过第一个命令行参数或 `SECTOR_DATA_DIR` 环境变量指定。
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志追踪
    init_logging();

    // 加载分析配置
    let config = AnalysisConfig::load(FILE_PATH_ANALYSIS_CONFIG)?;

    // 每个代码一个 JSON 文件的本地数据源
    let directory = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SECTOR_DATA_DIR").ok())
        .unwrap_or_else(|| DEFAULT_DATA_DIRECTORY.to_string());
    let loader = JsonFileLoader::new(directory);
    info!(directory = %loader.directory().display(), "loading price data");

    // 获取 → 聚合 → 收益率，单个代码失败不会中止运行
    let analysis = Analysis::run(&loader, &config)?;
    for (symbol, error) in &analysis.errors {
        warn!(%symbol, %error, "symbol excluded from analysis");
    }

    // 每家银行的最差交易日
    let worst = argmin_dates(&analysis.returns, config.range());
    println!("\n--- Worst Single Day {} ---\n", config.range());
    for (symbol, date) in &worst.values {
        println!("{symbol:>5}: {date}");
    }

    // 每个报告区间的日波动率与年化波动率
    for report in &config.report_ranges {
        println!("\n===== {} =====", report.name);
        analysis.summary(report.range, Daily).print_summary();
        analysis.summary(report.range, Annual252).print_summary();
    }

    // 将图表数据写为 JSON Lines，供任意绘图后端渲染
    let path = std::env::temp_dir().join("banking_covid_charts.jsonl");
    let written = render_charts(&analysis, &config, path.clone())?;
    info!(path = %path.display(), charts = written, "wrote chart data");

    Ok(())
}

/// 渲染价格、移动平均、收益率和分布图，返回写入的图表数量。
fn render_charts(
    analysis: &Analysis,
    config: &AnalysisConfig,
    path: PathBuf,
) -> Result<usize, Box<dyn std::error::Error>> {
    let mut charts = vec![
        price_chart(&analysis.aggregated, config.field),
        returns_chart(&analysis.returns, config.range()),
    ];

    charts.extend(moving_average_chart(
        &analysis.aggregated,
        MOVING_AVERAGE_SYMBOL,
        config.field,
        config.moving_average_window,
    ));

    // 每个报告区间一张分布图，用于对比全年与疫情宣布期间的波动
    for report in &config.report_ranges {
        let histograms = distributions(&analysis.returns, report.range, config.histogram_bins);
        match histograms.get(DISTRIBUTION_SYMBOL) {
            Some(histogram) => charts.push(distribution_chart(histogram)),
            None => {
                if let Some(error) = histograms.error(DISTRIBUTION_SYMBOL) {
                    warn!(report = %report.name, %error, "skipping distribution chart");
                }
            }
        }
    }

    let mut renderer = JsonRenderer::new(BufWriter::new(File::create(path)?));
    for chart in &charts {
        renderer.render(chart)?;
    }
    renderer.into_inner().flush()?;

    Ok(charts.len())
}
