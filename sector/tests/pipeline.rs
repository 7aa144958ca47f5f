use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sector::{
    config::AnalysisConfig,
    error::{AnalysisError, EmptyInput},
    pipeline::Analysis,
    returns::DateAlignment,
    statistic::{
        extremes::argmin_dates,
        moments::std_dev,
        time::{Annual252, Daily},
    },
    test_utils::{date, decimal_is_eq, price_table},
};
use sector_data::{
    Dated,
    error::DataError,
    loader::{InMemoryLoader, JsonFileLoader},
    range::DateRange,
    record::PriceRecord,
    symbol::Symbol,
};

fn config(symbols: &[&str]) -> AnalysisConfig {
    AnalysisConfig {
        symbols: symbols.iter().copied().map(Symbol::new).collect(),
        start: date(1, 1),
        end: date(1, 31),
        ..AnalysisConfig::banking_2020()
    }
}

fn loader() -> InMemoryLoader {
    InMemoryLoader::default()
        .with_table(
            "X",
            price_table(&[
                (date(1, 1), dec!(100)),
                (date(1, 2), dec!(95)),
                (date(1, 3), dec!(105)),
            ]),
        )
        .with_table(
            "Y",
            price_table(&[
                (date(1, 2), dec!(20)),
                (date(1, 3), dec!(21)),
                (date(1, 6), dec!(18.9)),
                (date(1, 7), dec!(18.9)),
            ]),
        )
}

#[test]
fn test_returns_and_statistics_scenario() {
    let analysis = Analysis::run(&loader(), &config(&["X", "Y"])).unwrap();

    let x = analysis.returns.series("X").unwrap();
    assert_eq!(x.len(), 2);
    assert_eq!(x.points()[0], Dated::new(Some(dec!(-0.05)), date(1, 2)));
    assert!(decimal_is_eq(
        x.points()[1].value.unwrap(),
        dec!(0.10526),
        dec!(0.00001)
    ));

    let volatility = std_dev(&analysis.returns, DateRange::full());
    assert!(volatility.is_complete());
    assert!(decimal_is_eq(
        *volatility.get("X").unwrap(),
        dec!(0.10979),
        dec!(0.0001)
    ));

    let worst = argmin_dates(&analysis.returns, DateRange::full());
    assert_eq!(worst.get("X"), Some(&date(1, 2)));
    assert_eq!(worst.get("Y"), Some(&date(1, 6)));
}

#[test]
fn test_sub_range_errors_are_scoped_per_symbol() {
    let analysis = Analysis::run(&loader(), &config(&["X", "Y"])).unwrap();
    let range = DateRange::since(date(1, 6));

    let volatility = std_dev(&analysis.returns, range);
    assert_eq!(
        volatility.error("X"),
        Some(&AnalysisError::EmptyRange {
            symbol: Symbol::new("X"),
            range,
        })
    );
    // Y returns since 2020-01-06 are [-0.1, 0.0]
    assert!(decimal_is_eq(
        *volatility.get("Y").unwrap(),
        dec!(0.0707107),
        dec!(0.000001)
    ));
}

#[test]
fn test_failed_fetch_does_not_disturb_other_symbols() {
    let analysis = Analysis::run(&loader(), &config(&["X", "MISSING", "Y"])).unwrap();

    assert_eq!(
        analysis.returns.symbols().collect::<Vec<_>>(),
        vec![&Symbol::new("X"), &Symbol::new("Y")]
    );
    assert!(matches!(
        analysis.error("MISSING"),
        Some(AnalysisError::DataUnavailable(_))
    ));

    let daily = analysis.summary(DateRange::full(), Daily);
    let annual = analysis.summary(DateRange::full(), Annual252);
    assert_eq!(daily.symbols.len(), 2);
    assert!(
        annual.tear_sheet("X").unwrap().volatility.value
            > daily.tear_sheet("X").unwrap().volatility.value
    );
}

#[test]
fn test_calendar_alignment_marks_gaps_undefined() {
    let config = AnalysisConfig {
        alignment: DateAlignment::Calendar,
        ..config(&["X", "Y"])
    };

    let analysis = Analysis::run(&loader(), &config).unwrap();

    let x = analysis.returns.series("X").unwrap();
    let y = analysis.returns.series("Y").unwrap();
    assert_eq!(x.len(), y.len());
    assert_eq!(y.points()[0], Dated::new(None, date(1, 2)));
    assert_eq!(x.points()[3], Dated::new(None, date(1, 7)));
}

#[test]
fn test_empty_basket_fails_as_a_whole() {
    let actual = Analysis::run(&loader(), &config(&["MISSING"]));

    assert_eq!(
        actual.map(|analysis| analysis.returns.len()),
        Err(AnalysisError::EmptyInput(EmptyInput::NoSymbols).into())
    );
}

#[test]
fn test_json_file_loader_end_to_end() {
    let directory = std::env::temp_dir().join(format!("sector-pipeline-{}", std::process::id()));
    std::fs::create_dir_all(&directory).unwrap();

    let records = [
        (date(1, 3), dec!(35.0)),
        (date(1, 2), dec!(40.0)),
        (date(1, 6), dec!(38.5)),
    ]
    .map(|(date, close)| PriceRecord::new(date, close, close, close, close, close, 1_000));
    std::fs::write(
        directory.join("BAC.json"),
        serde_json::to_string(&records).unwrap(),
    )
    .unwrap();

    let loader = JsonFileLoader::new(&directory);
    let analysis = Analysis::run(&loader, &config(&["BAC", "JPM"])).unwrap();

    let bac = analysis.returns.series("BAC").unwrap();
    assert_eq!(
        bac.dates().collect::<Vec<NaiveDate>>(),
        vec![date(1, 3), date(1, 6)]
    );
    assert_eq!(bac.points()[1].value, Some(dec!(0.1)));
    assert!(analysis.error("JPM").is_some());

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_malformed_price_file_is_scoped_to_symbol() {
    let directory =
        std::env::temp_dir().join(format!("sector-pipeline-malformed-{}", std::process::id()));
    std::fs::create_dir_all(&directory).unwrap();

    let records = [(date(1, 2), dec!(140.0)), (date(1, 3), dec!(138.6))]
        .map(|(date, close)| PriceRecord::new(date, close, close, close, close, close, 1_000));
    std::fs::write(
        directory.join("JPM.json"),
        serde_json::to_string(&records).unwrap(),
    )
    .unwrap();
    std::fs::write(directory.join("WFC.json"), "[{\"date\": \"2020-01-02\",").unwrap();

    let loader = JsonFileLoader::new(&directory);
    let analysis = Analysis::run(&loader, &config(&["JPM", "WFC"])).unwrap();

    assert_eq!(
        analysis.returns.symbols().collect::<Vec<_>>(),
        vec![&Symbol::new("JPM")]
    );
    assert!(matches!(
        analysis.error("WFC"),
        Some(AnalysisError::DataUnavailable(DataError::Deserialise(_)))
    ));

    std::fs::remove_dir_all(&directory).unwrap();
}

#[test]
fn test_example_config_matches_preset() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/examples/config/banking_2020.json");

    assert_eq!(
        AnalysisConfig::load(path).unwrap(),
        AnalysisConfig::banking_2020()
    );
}
