//! End-to-end pipeline tests: CSV fixtures → universe → augmentation →
//! ranking, wired through the same adapters the CLI uses.

use chrono::NaiveDate;
use fundrank::adapters::csv_adapter::CsvPricingAdapter;
use fundrank::adapters::file_config_adapter::FileConfigAdapter;
use fundrank::domain::augment::augment;
use fundrank::domain::config::build_analysis_config;
use fundrank::domain::rank::{rank, FundRecord};
use fundrank::domain::strategy::apply_all;
use fundrank::domain::universe::load_universe;
use fundrank::ports::pricing_port::PricingPort;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_fund_csv(dir: &Path, fund_id: &str, prices: &[f64]) {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let mut content = String::from("price,asOfDate,currencyCode,__typename\n");
    for (i, price) in prices.iter().enumerate() {
        let date = start + chrono::Duration::days(i as i64);
        content.push_str(&format!("{price},{date},GBP,FundPrice\n"));
    }
    fs::write(dir.join(format!("{fund_id}.csv")), content).unwrap();
}

/// Steady grower: daily returns alternate +0.3% and +0.1%.
fn steady_prices(len: usize) -> Vec<f64> {
    let mut prices = vec![100.0];
    for i in 1..len {
        let r = if i % 2 == 0 { 0.001 } else { 0.003 };
        prices.push(prices[i - 1] * (1.0 + r));
    }
    prices
}

/// Choppy fund: daily returns alternate +0.4% and -0.4%.
fn choppy_prices(len: usize) -> Vec<f64> {
    let mut prices = vec![100.0];
    for i in 1..len {
        let r = if i % 2 == 0 { -0.004 } else { 0.004 };
        prices.push(prices[i - 1] * (1.0 + r));
    }
    prices
}

fn setup_fixtures() -> (TempDir, CsvPricingAdapter) {
    let dir = TempDir::new().unwrap();
    let path = dir.path();

    write_fund_csv(path, "STEADY", &steady_prices(600));
    write_fund_csv(path, "CHOPPY", &choppy_prices(600));
    // Young fund: far less than a year of history.
    write_fund_csv(path, "YOUNG", &steady_prices(40));

    let funds_json = r#"[
        {"portId": "STEADY", "name": "Steady Growth", "shareClass": "Accumulation", "ocfValue": 0.001},
        {"portId": "CHOPPY", "name": "Choppy Equity", "shareClass": "Accumulation", "ocfValue": 0.005},
        {"portId": "YOUNG", "name": "Young Fund", "shareClass": "Accumulation", "ocfValue": 0.003}
    ]"#;
    let funds_file = path.join("portfolios.json");
    fs::write(&funds_file, funds_json).unwrap();

    let adapter = CsvPricingAdapter::new(path.to_path_buf(), funds_file);
    (dir, adapter)
}

fn config_for(dir: &Path, extra: &str) -> String {
    format!(
        "[data]\npricing_dir = {0}\nfunds_file = {0}/portfolios.json\n{extra}",
        dir.display()
    )
}

#[test]
fn rank_pipeline_orders_dominant_fund_first() {
    let (dir, adapter) = setup_fixtures();
    let config_path = dir.path().join("config.ini");
    fs::write(&config_path, config_for(dir.path(), "")).unwrap();
    let config =
        build_analysis_config(&FileConfigAdapter::from_file(&config_path).unwrap()).unwrap();

    let loaded = load_universe(&adapter, None).unwrap();
    assert_eq!(loaded.funds.len(), 3);
    assert!(loaded.skipped.is_empty());

    let mut records = Vec::new();
    for mut fund in loaded.funds {
        augment(&mut fund.series, config.calendar, config.risk_free_rate).unwrap();
        let latest = fund.series.latest_metrics().copied().unwrap();
        records.push(FundRecord {
            id: fund.meta.id,
            name: fund.meta.name,
            share_class: fund.meta.share_class,
            expense_ratio: fund.meta.expense_ratio,
            y1_return: latest.y1_return,
            y5_return: latest.y5_return,
            volatility: latest.volatility,
            sharpe_ratio: latest.sharpe_ratio,
        });
    }

    let table = rank(records, &config.weights);
    assert_eq!(table.len(), 3);

    // STEADY dominates CHOPPY on every weighted metric, so it takes every
    // top score and the full weight sum.
    assert_eq!(table[0].record.id, "STEADY");
    assert!((table[0].total_score.unwrap() - 1.0).abs() < 1e-9);
    assert_eq!(table[1].record.id, "CHOPPY");
    assert!((table[1].total_score.unwrap() - 0.0).abs() < 1e-9);

    // The young fund has no year of history: null metrics, null total, last.
    assert_eq!(table[2].record.id, "YOUNG");
    assert_eq!(table[2].total_score, None);
    assert_eq!(table[2].scores.return_1y, None);
}

#[test]
fn young_fund_metrics_are_null_but_short_horizon_ones_are_not() {
    let (_dir, adapter) = setup_fixtures();
    let mut series = adapter.fetch_pricing("YOUNG").unwrap();
    augment(
        &mut series,
        fundrank::domain::calendar::CalendarMode::TradingDays,
        0.01,
    )
    .unwrap();

    let latest = series.latest_metrics().unwrap();
    assert_eq!(latest.y1_return, None);
    assert_eq!(latest.y5_return, None);
    assert_eq!(latest.volatility, None);
    assert_eq!(latest.sharpe_ratio, None);
    assert!(latest.daily_return.is_some());
}

#[test]
fn signal_pipeline_blends_configured_strategies() {
    let (dir, adapter) = setup_fixtures();
    let config_path = dir.path().join("config.ini");
    fs::write(
        &config_path,
        config_for(
            dir.path(),
            "[strategy]\nma_crossover = 10, 30\nbollinger = 20, 2.0\n",
        ),
    )
    .unwrap();
    let config =
        build_analysis_config(&FileConfigAdapter::from_file(&config_path).unwrap()).unwrap();
    assert_eq!(config.strategies.len(), 2);

    let mut series = adapter.fetch_pricing("STEADY").unwrap();
    apply_all(&mut series, &config.strategies).unwrap();

    assert_eq!(series.signal.len(), series.len());
    // Before the longest window (30) fills, the blend is contaminated.
    assert_eq!(series.signal[28], None);
    assert!(series.signal[29].is_some());
    // A persistent uptrend keeps the short average above the long one.
    assert!(series.signal.last().unwrap().unwrap() > 0.0);
}

#[test]
fn universe_skips_funds_without_files() {
    let (dir, _) = setup_fixtures();
    let funds_json = r#"[
        {"portId": "STEADY", "name": "Steady Growth", "shareClass": "Accumulation", "ocfValue": 0.001},
        {"portId": "GHOST", "name": "Missing Fund", "shareClass": "Income", "ocfValue": 0.002}
    ]"#;
    let funds_file = dir.path().join("partial.json");
    fs::write(&funds_file, funds_json).unwrap();

    let adapter = CsvPricingAdapter::new(dir.path().to_path_buf(), funds_file);
    let loaded = load_universe(&adapter, None).unwrap();

    assert_eq!(loaded.funds.len(), 1);
    assert_eq!(loaded.funds[0].meta.id, "STEADY");
    assert_eq!(loaded.skipped.len(), 1);
    assert_eq!(loaded.skipped[0].fund_id, "GHOST");
}
