//! File-based pricing adapter.
//!
//! Price histories live in one CSV per fund (`<dir>/<fund_id>.csv` with
//! `price`, `asOfDate` and `currencyCode` columns, as written by the
//! upstream scraper); fund metadata lives in a single `portfolios.json`.
//! Rows are sorted ascending by date before return, per the provider
//! contract.

use crate::domain::error::FundrankError;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::domain::universe::FundMeta;
use crate::ports::pricing_port::PricingPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

pub struct CsvPricingAdapter {
    pricing_dir: PathBuf,
    funds_file: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawFund {
    #[serde(rename = "portId")]
    port_id: String,
    name: String,
    #[serde(rename = "shareClass")]
    share_class: String,
    #[serde(rename = "ocfValue", default)]
    ocf_value: Option<serde_json::Value>,
}

impl CsvPricingAdapter {
    pub fn new(pricing_dir: PathBuf, funds_file: PathBuf) -> Self {
        Self {
            pricing_dir,
            funds_file,
        }
    }

    fn csv_path(&self, fund_id: &str) -> PathBuf {
        self.pricing_dir.join(format!("{fund_id}.csv"))
    }
}

impl PricingPort for CsvPricingAdapter {
    fn fetch_pricing(&self, fund_id: &str) -> Result<PriceSeries, FundrankError> {
        let path = self.csv_path(fund_id);
        let content = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FundrankError::NoData {
                    fund_id: fund_id.to_string(),
                }
            } else {
                FundrankError::Data {
                    reason: format!("failed to read {}: {}", path.display(), e),
                }
            }
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr
            .headers()
            .map_err(|e| FundrankError::Data {
                reason: format!("CSV header error in {}: {}", path.display(), e),
            })?
            .clone();
        let price_idx = column_index(&headers, "price", &path)?;
        let date_idx = column_index(&headers, "asOfDate", &path)?;
        let currency_idx = column_index(&headers, "currencyCode", &path)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| FundrankError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(date_idx).unwrap_or_default();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                FundrankError::Data {
                    reason: format!("invalid asOfDate '{date_str}': {e}"),
                }
            })?;

            let price_str = record.get(price_idx).unwrap_or_default();
            let price: f64 = price_str.parse().map_err(|e| FundrankError::Data {
                reason: format!("invalid price '{price_str}': {e}"),
            })?;

            let currency = record.get(currency_idx).unwrap_or_default().to_string();

            points.push(PricePoint {
                date,
                price,
                currency,
            });
        }

        points.sort_by_key(|p| p.date);
        Ok(PriceSeries::new(fund_id, points))
    }

    fn list_funds(&self) -> Result<Vec<FundMeta>, FundrankError> {
        let content = fs::read_to_string(&self.funds_file).map_err(|e| FundrankError::Data {
            reason: format!("failed to read {}: {}", self.funds_file.display(), e),
        })?;

        let raw: Vec<RawFund> =
            serde_json::from_str(&content).map_err(|e| FundrankError::Data {
                reason: format!("invalid JSON in {}: {}", self.funds_file.display(), e),
            })?;

        Ok(raw
            .into_iter()
            .map(|f| FundMeta {
                id: f.port_id,
                name: f.name,
                share_class: f.share_class,
                expense_ratio: f.ocf_value.as_ref().and_then(coerce_ratio),
            })
            .collect())
    }
}

fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    path: &std::path::Path,
) -> Result<usize, FundrankError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| FundrankError::Data {
            reason: format!("missing '{}' column in {}", name, path.display()),
        })
}

/// The metadata feed serves `ocfValue` either as a number or as a string
/// like `"0.22%"`.
fn coerce_ratio(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}
