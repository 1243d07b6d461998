//! Null-aware rolling window statistics.
//!
//! Maintains a running sum and sum of squares so each update is O(1)
//! amortized instead of rescanning the window. A `None` pushed into the
//! window makes mean and std undefined until it falls out, and the window
//! must be full before either is defined.
//!
//! Std is the sample standard deviation (ddof = 1), matching the original
//! data source's rolling-std convention; it is undefined for windows of
//! size 1.

use std::collections::VecDeque;

#[derive(Debug)]
pub struct RollingWindow {
    size: usize,
    values: VecDeque<Option<f64>>,
    sum: f64,
    sum_sq: f64,
    missing: usize,
}

impl RollingWindow {
    /// `size` must be non-zero; window construction is validated upstream.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: VecDeque::with_capacity(size + 1),
            sum: 0.0,
            sum_sq: 0.0,
            missing: 0,
        }
    }

    pub fn push(&mut self, value: Option<f64>) {
        self.values.push_back(value);
        match value {
            Some(v) => {
                self.sum += v;
                self.sum_sq += v * v;
            }
            None => self.missing += 1,
        }
        if self.values.len() > self.size {
            match self.values.pop_front().flatten() {
                Some(v) => {
                    self.sum -= v;
                    self.sum_sq -= v * v;
                }
                None => self.missing -= 1,
            }
        }
    }

    fn is_complete(&self) -> bool {
        self.values.len() == self.size && self.missing == 0
    }

    pub fn mean(&self) -> Option<f64> {
        if !self.is_complete() {
            return None;
        }
        Some(self.sum / self.size as f64)
    }

    /// Sample standard deviation over the window; `None` for size < 2.
    pub fn std(&self) -> Option<f64> {
        if !self.is_complete() || self.size < 2 {
            return None;
        }
        let n = self.size as f64;
        // Rounding can push the two-pass identity slightly negative.
        let variance = ((self.sum_sq - self.sum * self.sum / n) / (n - 1.0)).max(0.0);
        Some(variance.sqrt())
    }
}
