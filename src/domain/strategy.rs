//! Signal-generating strategies.
//!
//! Strategies are stateless transformers folded over a series in order.
//! Each contributes additively to the shared `signal` column, which is
//! created as zeros the first time any strategy runs. Contributions are
//! null where a window is not yet full, and `None + x = None`, so a row's
//! cumulative signal stays undefined until every applied strategy has
//! enough history there.

use crate::domain::error::FundrankError;
use crate::domain::rolling::RollingWindow;
use crate::domain::series::{opt_add, PricePoint, PriceSeries};

/// Scale factor applied to relative divergences before accumulation.
pub const SIGNAL_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Adds `1000 * (short_ma / long_ma - 1)`: positive when the
    /// short-term trend is above the long-term trend.
    MovingAverageCrossover {
        short_window: usize,
        long_window: usize,
    },
    /// Adds `1000 * (price / lower_band - 1)` where
    /// `lower = mean - num_std * std`. Measured against the lower band
    /// only; the formula is asymmetric by construction.
    BollingerBands { window: usize, num_std: f64 },
}

impl Strategy {
    pub fn apply(&self, series: &mut PriceSeries) -> Result<(), FundrankError> {
        series.validate()?;
        self.validate_windows()?;
        init_signal_if_missing(series);

        let contributions = match *self {
            Strategy::MovingAverageCrossover {
                short_window,
                long_window,
            } => ma_crossover(&series.points, short_window, long_window),
            Strategy::BollingerBands { window, num_std } => {
                bollinger(&series.points, window, num_std)
            }
        };

        for (slot, contribution) in series.signal.iter_mut().zip(contributions) {
            *slot = opt_add(*slot, contribution);
        }
        Ok(())
    }

    fn validate_windows(&self) -> Result<(), FundrankError> {
        let ok = match *self {
            Strategy::MovingAverageCrossover {
                short_window,
                long_window,
            } => short_window > 0 && long_window > 0,
            Strategy::BollingerBands { window, .. } => window > 0,
        };
        if ok {
            Ok(())
        } else {
            Err(FundrankError::InvalidWindow {
                reason: format!("{self:?} has a zero-length window"),
            })
        }
    }
}

/// Applies an ordered list of strategies, blending into one signal column.
pub fn apply_all(series: &mut PriceSeries, strategies: &[Strategy]) -> Result<(), FundrankError> {
    for strategy in strategies {
        strategy.apply(series)?;
    }
    Ok(())
}

fn init_signal_if_missing(series: &mut PriceSeries) {
    if series.signal.is_empty() {
        series.signal = vec![Some(0.0); series.points.len()];
    }
}

fn ma_crossover(points: &[PricePoint], short: usize, long: usize) -> Vec<Option<f64>> {
    let mut short_win = RollingWindow::new(short);
    let mut long_win = RollingWindow::new(long);

    points
        .iter()
        .map(|p| {
            short_win.push(Some(p.price));
            long_win.push(Some(p.price));
            match (short_win.mean(), long_win.mean()) {
                (Some(s), Some(l)) if l != 0.0 => Some(SIGNAL_SCALE * (s / l - 1.0)),
                _ => None,
            }
        })
        .collect()
}

fn bollinger(points: &[PricePoint], window: usize, num_std: f64) -> Vec<Option<f64>> {
    let mut win = RollingWindow::new(window);

    points
        .iter()
        .map(|p| {
            win.push(Some(p.price));
            match (win.mean(), win.std()) {
                (Some(mean), Some(std)) => {
                    let lower = mean - num_std * std;
                    if lower == 0.0 {
                        None
                    } else {
                        Some(SIGNAL_SCALE * (p.price / lower - 1.0))
                    }
                }
                _ => None,
            }
        })
        .collect()
}
