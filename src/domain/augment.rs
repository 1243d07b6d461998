//! Metric augmentation for a single price series.
//!
//! Computes, row-wise over the whole series: 1-year and 5-year returns,
//! daily return, annualized volatility, rolling average return, excess
//! return over the risk-free rate, and Sharpe ratio. Lookback lengths and
//! annualization follow the configured [`CalendarMode`].

use crate::domain::calendar::CalendarMode;
use crate::domain::error::FundrankError;
use crate::domain::rolling::RollingWindow;
use crate::domain::series::{MetricRow, PricePoint, PriceSeries};

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.01;

/// Fills `series.metrics` with one [`MetricRow`] per observation.
///
/// Recomputes from scratch on every call, so re-augmenting an already
/// augmented series is a no-op beyond the recomputation itself. Numeric
/// edge cases (short history, zero denominators) become `None` fields and
/// never error; only a malformed series does.
pub fn augment(
    series: &mut PriceSeries,
    mode: CalendarMode,
    risk_free_rate: f64,
) -> Result<(), FundrankError> {
    series.validate()?;

    let days_1y = mode.days_per_year();
    let days_5y = mode.days_per_5_years();
    let per_year = days_1y as f64;

    let mut rows = Vec::with_capacity(series.points.len());
    let mut returns = RollingWindow::new(days_1y);

    for t in 0..series.points.len() {
        let price = series.points[t].price;

        let y1_return = lookback_return(&series.points, t, days_1y);
        let y5_return = lookback_return(&series.points, t, days_5y);

        let daily_return = if t == 0 {
            None
        } else {
            pct_change(series.points[t - 1].price, price)
        };
        returns.push(daily_return);

        let volatility = returns.std().map(|s| s * per_year.sqrt());
        let average_return = returns.mean();
        let excess_return = average_return.map(|m| m - risk_free_rate / per_year);
        let sharpe_ratio = match (excess_return, volatility) {
            // Zero volatility gives None, not an infinite ratio.
            (Some(e), Some(v)) if v != 0.0 => Some(e * per_year / v),
            _ => None,
        };

        rows.push(MetricRow {
            y1_return,
            y5_return,
            daily_return,
            volatility,
            average_return,
            excess_return,
            sharpe_ratio,
        });
    }

    series.metrics = rows;
    Ok(())
}

fn lookback_return(points: &[PricePoint], t: usize, lag: usize) -> Option<f64> {
    if t < lag {
        return None;
    }
    pct_change(points[t - lag].price, points[t].price)
}

fn pct_change(base: f64, value: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some((value - base) / base)
    }
}
