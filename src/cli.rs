//! CLI definition and dispatch.
//!
//! Progress goes to stderr, results to stdout. Exit codes follow the
//! `From<&FundrankError>` mapping in the domain error module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvPricingAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::augment::augment;
use crate::domain::config::{build_analysis_config, AnalysisConfig};
use crate::domain::error::FundrankError;
use crate::domain::rank::{rank, FundRecord, RankedFund};
use crate::domain::series::MetricRow;
use crate::domain::strategy::apply_all;
use crate::domain::universe::{load_universe, LoadedFund};
use crate::ports::pricing_port::PricingPort;

#[derive(Parser, Debug)]
#[command(name = "fundrank", about = "Comparative analytics for fund price histories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score and order the fund universe
    Rank {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the latest derived metrics for one fund
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        fund: String,
    },
    /// Apply the configured strategies to one fund and show the blended signal
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        fund: String,
        /// Number of trailing rows to print
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
    /// List the funds in the metadata file
    ListFunds {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Rank { config } => run_rank(&config),
        Command::Analyze { config, fund } => run_analyze(&config, &fund),
        Command::Signal { config, fund, tail } => run_signal(&config, &fund, tail),
        Command::ListFunds { config } => run_list_funds(&config),
    }
}

fn load_analysis_config(path: &PathBuf) -> Result<AnalysisConfig, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let adapter = FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FundrankError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })?;
    build_analysis_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_rank(config_path: &PathBuf) -> ExitCode {
    let config = match load_analysis_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let port = CsvPricingAdapter::new(config.pricing_dir.clone(), config.funds_file.clone());

    eprintln!("Loading fund universe...");
    let loaded = match load_universe(&port, config.funds.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Augmenting {} funds ({} calendar, risk-free rate {})...",
        loaded.funds.len(),
        config.calendar,
        config.risk_free_rate
    );
    let records = match build_records(loaded.funds, &config) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let table = rank(records, &config.weights);
    print_ranked_table(&table);
    ExitCode::SUCCESS
}

fn build_records(
    funds: Vec<LoadedFund>,
    config: &AnalysisConfig,
) -> Result<Vec<FundRecord>, FundrankError> {
    let mut records = Vec::with_capacity(funds.len());
    for mut fund in funds {
        augment(&mut fund.series, config.calendar, config.risk_free_rate)?;
        let latest = fund.series.latest_metrics().copied().unwrap_or_default();
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
    Ok(records)
}

fn run_analyze(config_path: &PathBuf, fund_id: &str) -> ExitCode {
    let config = match load_analysis_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let port = CsvPricingAdapter::new(config.pricing_dir.clone(), config.funds_file.clone());

    let mut series = match port.fetch_pricing(fund_id) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = augment(&mut series, config.calendar, config.risk_free_rate) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let last_point = series.points.last().expect("validated non-empty");
    let latest = series.latest_metrics().copied().unwrap_or_default();
    println!("Fund {fund_id} as of {}", last_point.date);
    println!("  price:          {:.4} {}", last_point.price, last_point.currency);
    print_metric_row(&latest);
    ExitCode::SUCCESS
}

fn print_metric_row(m: &MetricRow) {
    println!("  y1_return:      {}", fmt_opt(m.y1_return));
    println!("  y5_return:      {}", fmt_opt(m.y5_return));
    println!("  daily_return:   {}", fmt_opt(m.daily_return));
    println!("  volatility:     {}", fmt_opt(m.volatility));
    println!("  average_return: {}", fmt_opt(m.average_return));
    println!("  excess_return:  {}", fmt_opt(m.excess_return));
    println!("  sharpe_ratio:   {}", fmt_opt(m.sharpe_ratio));
}

fn run_signal(config_path: &PathBuf, fund_id: &str, tail: usize) -> ExitCode {
    let config = match load_analysis_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if config.strategies.is_empty() {
        let err = FundrankError::ConfigMissing {
            section: "strategy".into(),
            key: "ma_crossover or bollinger".into(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    }
    let port = CsvPricingAdapter::new(config.pricing_dir.clone(), config.funds_file.clone());

    let mut series = match port.fetch_pricing(fund_id) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Applying {} strategies to fund {fund_id}...",
        config.strategies.len()
    );
    if let Err(e) = apply_all(&mut series, &config.strategies) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!("{:<12} {:>12} {:>12}", "date", "price", "signal");
    let start = series.len().saturating_sub(tail);
    for (point, signal) in series.points[start..]
        .iter()
        .zip(&series.signal[start..])
    {
        println!(
            "{:<12} {:>12.4} {:>12}",
            point.date.to_string(),
            point.price,
            fmt_opt(*signal)
        );
    }
    ExitCode::SUCCESS
}

fn run_list_funds(config_path: &PathBuf) -> ExitCode {
    let config = match load_analysis_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let port = CsvPricingAdapter::new(config.pricing_dir.clone(), config.funds_file.clone());

    let funds = match port.list_funds() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{:<10} {:<40} {:<14} {:>8}", "id", "name", "share class", "ocf");
    for fund in funds {
        println!(
            "{:<10} {:<40} {:<14} {:>8}",
            fund.id,
            fund.name,
            fund.share_class,
            fmt_opt(fund.expense_ratio)
        );
    }
    ExitCode::SUCCESS
}

fn print_ranked_table(table: &[RankedFund]) {
    println!(
        "{:<4} {:<10} {:<32} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "#", "id", "name", "1y", "5y", "vol", "sharpe", "ocf", "total"
    );
    for (i, fund) in table.iter().enumerate() {
        println!(
            "{:<4} {:<10} {:<32} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
            i + 1,
            fund.record.id,
            truncate(&fund.record.name, 32),
            fmt_opt(fund.record.y1_return),
            fmt_opt(fund.record.y5_return),
            fmt_opt(fund.record.volatility),
            fmt_opt(fund.record.sharpe_ratio),
            fmt_opt(fund.record.expense_ratio),
            fmt_opt(fund.total_score),
        );
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
