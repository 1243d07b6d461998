//! Analysis configuration assembly and validation.
//!
//! All fields are checked up front so a bad config fails before any data
//! is loaded.

use crate::domain::calendar::CalendarMode;
use crate::domain::error::FundrankError;
use crate::domain::rank::{RankWeights, ScoreKind};
use crate::domain::strategy::Strategy;
use crate::domain::universe::parse_fund_ids;
use crate::ports::config_port::ConfigPort;
use std::collections::HashMap;
use std::path::PathBuf;

/// Default score weights; `weight_return_5y` defaults to 0 (computed but
/// excluded from the total).
const DEFAULT_WEIGHTS: [(ScoreKind, &str, f64); 5] = [
    (ScoreKind::Return1y, "weight_return_1y", 0.4),
    (ScoreKind::Return5y, "weight_return_5y", 0.0),
    (ScoreKind::Volatility, "weight_volatility", 0.2),
    (ScoreKind::Sharpe, "weight_sharpe", 0.35),
    (ScoreKind::Expense, "weight_expense", 0.05),
];

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub pricing_dir: PathBuf,
    pub funds_file: PathBuf,
    /// Restricts the universe to these ids; `None` takes every fund in
    /// the metadata file.
    pub funds: Option<Vec<String>>,
    pub calendar: CalendarMode,
    pub risk_free_rate: f64,
    pub weights: RankWeights,
    pub strategies: Vec<Strategy>,
}

pub fn validate_analysis_config(config: &dyn ConfigPort) -> Result<(), FundrankError> {
    validate_paths(config)?;
    validate_calendar(config)?;
    validate_risk_free_rate(config)?;
    validate_weights(config)?;
    validate_funds(config)?;
    validate_strategies(config)?;
    Ok(())
}

pub fn build_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, FundrankError> {
    validate_analysis_config(config)?;

    let pricing_dir = required_string(config, "data", "pricing_dir")?;
    let funds_file = required_string(config, "data", "funds_file")?;

    let funds = match config.get_string("data", "funds") {
        Some(list) => Some(parse_fund_ids(&list).map_err(|e| FundrankError::ConfigInvalid {
            section: "data".into(),
            key: "funds".into(),
            reason: e.to_string(),
        })?),
        None => None,
    };

    let calendar = config
        .get_string("analysis", "calendar")
        .unwrap_or_else(|| "trading".to_string())
        .parse::<CalendarMode>()
        .map_err(|reason| FundrankError::ConfigInvalid {
            section: "analysis".into(),
            key: "calendar".into(),
            reason,
        })?;

    let risk_free_rate = config.get_double(
        "analysis",
        "risk_free_rate",
        crate::domain::augment::DEFAULT_RISK_FREE_RATE,
    );

    let mut weights = HashMap::new();
    for (kind, key, default) in DEFAULT_WEIGHTS {
        let weight = config.get_double("ranking", key, default);
        // A zero weight means excluded: it must not let a null score
        // contaminate the total.
        if weight > 0.0 {
            weights.insert(kind, weight);
        }
    }

    Ok(AnalysisConfig {
        pricing_dir: PathBuf::from(pricing_dir),
        funds_file: PathBuf::from(funds_file),
        funds,
        calendar,
        risk_free_rate,
        weights: RankWeights::new(weights),
        strategies: build_strategies(config)?,
    })
}

fn build_strategies(config: &dyn ConfigPort) -> Result<Vec<Strategy>, FundrankError> {
    let mut strategies = Vec::new();

    if let Some(spec) = config.get_string("strategy", "ma_crossover") {
        let (short, long) = parse_pair::<usize, usize>(&spec, "ma_crossover")?;
        strategies.push(Strategy::MovingAverageCrossover {
            short_window: short,
            long_window: long,
        });
    }

    if let Some(spec) = config.get_string("strategy", "bollinger") {
        let (window, num_std) = parse_pair::<usize, f64>(&spec, "bollinger")?;
        strategies.push(Strategy::BollingerBands { window, num_std });
    }

    Ok(strategies)
}

fn parse_pair<A, B>(spec: &str, key: &str) -> Result<(A, B), FundrankError>
where
    A: std::str::FromStr,
    B: std::str::FromStr,
{
    let invalid = || FundrankError::ConfigInvalid {
        section: "strategy".into(),
        key: key.into(),
        reason: format!("expected two comma-separated values, got '{spec}'"),
    };
    let mut parts = spec.split(',');
    let a = parts
        .next()
        .and_then(|s| s.trim().parse::<A>().ok())
        .ok_or_else(invalid)?;
    let b = parts
        .next()
        .and_then(|s| s.trim().parse::<B>().ok())
        .ok_or_else(invalid)?;
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok((a, b))
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, FundrankError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(FundrankError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_paths(config: &dyn ConfigPort) -> Result<(), FundrankError> {
    required_string(config, "data", "pricing_dir")?;
    required_string(config, "data", "funds_file")?;
    Ok(())
}

fn validate_calendar(config: &dyn ConfigPort) -> Result<(), FundrankError> {
    if let Some(value) = config.get_string("analysis", "calendar") {
        value
            .parse::<CalendarMode>()
            .map_err(|reason| FundrankError::ConfigInvalid {
                section: "analysis".into(),
                key: "calendar".into(),
                reason,
            })?;
    }
    Ok(())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), FundrankError> {
    let value = config.get_double(
        "analysis",
        "risk_free_rate",
        crate::domain::augment::DEFAULT_RISK_FREE_RATE,
    );
    if !(0.0..1.0).contains(&value) {
        return Err(FundrankError::ConfigInvalid {
            section: "analysis".into(),
            key: "risk_free_rate".into(),
            reason: "risk_free_rate must be between 0 and 1".into(),
        });
    }
    Ok(())
}

fn validate_weights(config: &dyn ConfigPort) -> Result<(), FundrankError> {
    for (_, key, default) in DEFAULT_WEIGHTS {
        let value = config.get_double("ranking", key, default);
        if value < 0.0 {
            return Err(FundrankError::ConfigInvalid {
                section: "ranking".into(),
                key: key.into(),
                reason: "weights must be non-negative".into(),
            });
        }
    }
    Ok(())
}

fn validate_funds(config: &dyn ConfigPort) -> Result<(), FundrankError> {
    if let Some(list) = config.get_string("data", "funds") {
        parse_fund_ids(&list).map_err(|e| FundrankError::ConfigInvalid {
            section: "data".into(),
            key: "funds".into(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

fn validate_strategies(config: &dyn ConfigPort) -> Result<(), FundrankError> {
    if let Some(spec) = config.get_string("strategy", "ma_crossover") {
        let (short, long) = parse_pair::<usize, usize>(&spec, "ma_crossover")?;
        if short == 0 || long == 0 || short >= long {
            return Err(FundrankError::ConfigInvalid {
                section: "strategy".into(),
                key: "ma_crossover".into(),
                reason: "windows must be positive with short < long".into(),
            });
        }
    }
    if let Some(spec) = config.get_string("strategy", "bollinger") {
        let (window, num_std) = parse_pair::<usize, f64>(&spec, "bollinger")?;
        if window == 0 {
            return Err(FundrankError::ConfigInvalid {
                section: "strategy".into(),
                key: "bollinger".into(),
                reason: "window must be positive".into(),
            });
        }
        if num_std <= 0.0 {
            return Err(FundrankError::ConfigInvalid {
                section: "strategy".into(),
                key: "bollinger".into(),
                reason: "num_std must be positive".into(),
            });
        }
    }
    Ok(())
}
