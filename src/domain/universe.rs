//! Fund universe assembly.
//!
//! Resolves the configured fund list against the pricing provider. Funds
//! with no price history at all are skipped with a warning; young funds
//! with short histories are kept — their long-horizon metrics come out
//! null and they rank last, which is the intended behavior.

use crate::domain::error::FundrankError;
use crate::domain::series::PriceSeries;
use crate::ports::pricing_port::PricingPort;
use std::collections::HashSet;

/// Fund metadata as supplied by the external metadata provider.
#[derive(Debug, Clone)]
pub struct FundMeta {
    pub id: String,
    pub name: String,
    pub share_class: String,
    pub expense_ratio: Option<f64>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in fund list")]
    EmptyToken,

    #[error("duplicate fund id: {0}")]
    DuplicateFund(String),
}

/// Parses a comma-separated fund-id list from configuration.
pub fn parse_fund_ids(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut ids = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(trimmed.to_string()) {
            return Err(UniverseError::DuplicateFund(trimmed.to_string()));
        }
        ids.push(trimmed.to_string());
    }

    Ok(ids)
}

/// One fund's metadata joined with its loaded price history.
#[derive(Debug, Clone)]
pub struct LoadedFund {
    pub meta: FundMeta,
    pub series: PriceSeries,
}

#[derive(Debug, Clone)]
pub struct SkippedFund {
    pub fund_id: String,
    pub reason: String,
}

pub struct UniverseLoadResult {
    pub funds: Vec<LoadedFund>,
    pub skipped: Vec<SkippedFund>,
}

/// Loads price histories for the universe. `selection` restricts the
/// metadata listing to specific fund ids; `None` takes every listed fund.
/// Errors only when nothing at all could be loaded.
pub fn load_universe(
    port: &dyn PricingPort,
    selection: Option<&[String]>,
) -> Result<UniverseLoadResult, FundrankError> {
    let metas = port.list_funds()?;
    let metas: Vec<FundMeta> = match selection {
        Some(ids) => {
            let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
            metas
                .into_iter()
                .filter(|m| wanted.contains(m.id.as_str()))
                .collect()
        }
        None => metas,
    };

    let mut funds = Vec::new();
    let mut skipped = Vec::new();

    for meta in metas {
        let series = match port.fetch_pricing(&meta.id) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Warning: skipping fund {} ({})", meta.id, e);
                skipped.push(SkippedFund {
                    fund_id: meta.id.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if series.is_empty() {
            eprintln!("Warning: skipping fund {} (no pricing rows)", meta.id);
            skipped.push(SkippedFund {
                fund_id: meta.id.clone(),
                reason: "no pricing rows".to_string(),
            });
            continue;
        }

        eprintln!("  {}: {} observations [OK]", meta.id, series.len());
        funds.push(LoadedFund { meta, series });
    }

    if funds.is_empty() {
        return Err(FundrankError::NoData {
            fund_id: "universe".to_string(),
        });
    }

    if !skipped.is_empty() {
        eprintln!(
            "Analyzing {} of {} funds",
            funds.len(),
            funds.len() + skipped.len()
        );
    }

    Ok(UniverseLoadResult { funds, skipped })
}
