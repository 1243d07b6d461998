//! Price series representation.

use crate::domain::error::FundrankError;
use chrono::NaiveDate;

/// One daily price observation for a fund.
#[derive(Debug, Clone)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
    pub currency: String,
}

/// Derived metrics for one row of a price series.
///
/// `None` means the value is undefined for that row: not enough history to
/// fill the rolling window, or a zero denominator. Absence propagates
/// through downstream arithmetic instead of raising.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricRow {
    pub y1_return: Option<f64>,
    pub y5_return: Option<f64>,
    pub daily_return: Option<f64>,
    pub volatility: Option<f64>,
    pub average_return: Option<f64>,
    pub excess_return: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

/// Ordered daily price history for one fund, plus derived columns.
///
/// `metrics` is empty until [`augment`](crate::domain::augment::augment) runs,
/// then holds one row per point. `signal` is empty until the first
/// [`Strategy`](crate::domain::strategy::Strategy) is applied.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    pub fund_id: String,
    pub points: Vec<PricePoint>,
    pub metrics: Vec<MetricRow>,
    pub signal: Vec<Option<f64>>,
}

impl PriceSeries {
    pub fn new(fund_id: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            fund_id: fund_id.into(),
            points,
            metrics: Vec::new(),
            signal: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Checks the caller contract: non-empty, strictly ascending by date.
    /// Sorting and deduplication are the provider's responsibility; a
    /// violation here fails fast rather than being repaired.
    pub fn validate(&self) -> Result<(), FundrankError> {
        if self.points.is_empty() {
            return Err(FundrankError::EmptySeries {
                fund_id: self.fund_id.clone(),
            });
        }
        for (i, pair) in self.points.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(FundrankError::UnsortedSeries {
                    fund_id: self.fund_id.clone(),
                    position: i + 1,
                });
            }
        }
        Ok(())
    }

    /// Metrics of the most recent observation, if augmentation has run.
    pub fn latest_metrics(&self) -> Option<&MetricRow> {
        self.metrics.last()
    }
}

/// Null-propagating addition: any absent operand makes the sum absent.
pub fn opt_add(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x + y),
        _ => None,
    }
}
