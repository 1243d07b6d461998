//! Cross-sectional fund ranking.
//!
//! Each metric is min-max normalized across the fund collection, the
//! normalized scores are combined under configurable weights, and the
//! table is ordered descending by total score. A metric on which every
//! fund is tied (or a single-fund collection) has no range to scale over,
//! so its scores come out `None` for the whole column and propagate into
//! the totals; that is deliberate, since substituting 0 or 1 would
//! misrepresent a tie.

use crate::domain::series::opt_add;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Fund metadata joined with the latest augmented metrics of its series.
#[derive(Debug, Clone)]
pub struct FundRecord {
    pub id: String,
    pub name: String,
    pub share_class: String,
    pub expense_ratio: Option<f64>,
    pub y1_return: Option<f64>,
    pub y5_return: Option<f64>,
    pub volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreKind {
    Return1y,
    Return5y,
    Volatility,
    Sharpe,
    Expense,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 5] = [
        ScoreKind::Return1y,
        ScoreKind::Return5y,
        ScoreKind::Volatility,
        ScoreKind::Sharpe,
        ScoreKind::Expense,
    ];

    /// Volatility and expense ratio are inverted during normalization.
    fn higher_is_better(self) -> bool {
        !matches!(self, ScoreKind::Volatility | ScoreKind::Expense)
    }
}

/// Weights over normalized scores. Kinds absent from the map do not
/// contribute to the total at all (their scores are still computed for
/// inspection); the default weighting deliberately omits the 5-year
/// return.
#[derive(Debug, Clone)]
pub struct RankWeights {
    weights: HashMap<ScoreKind, f64>,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            weights: HashMap::from([
                (ScoreKind::Return1y, 0.4),
                (ScoreKind::Volatility, 0.2),
                (ScoreKind::Sharpe, 0.35),
                (ScoreKind::Expense, 0.05),
            ]),
        }
    }
}

impl RankWeights {
    pub fn new(weights: HashMap<ScoreKind, f64>) -> Self {
        Self { weights }
    }

    pub fn get(&self, kind: ScoreKind) -> Option<f64> {
        self.weights.get(&kind).copied()
    }
}

/// Normalized per-metric scores for one fund.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scores {
    pub return_1y: Option<f64>,
    pub return_5y: Option<f64>,
    pub volatility: Option<f64>,
    pub sharpe: Option<f64>,
    pub expense: Option<f64>,
}

impl Scores {
    pub fn get(&self, kind: ScoreKind) -> Option<f64> {
        match kind {
            ScoreKind::Return1y => self.return_1y,
            ScoreKind::Return5y => self.return_5y,
            ScoreKind::Volatility => self.volatility,
            ScoreKind::Sharpe => self.sharpe,
            ScoreKind::Expense => self.expense,
        }
    }

    fn set(&mut self, kind: ScoreKind, value: Option<f64>) {
        match kind {
            ScoreKind::Return1y => self.return_1y = value,
            ScoreKind::Return5y => self.return_5y = value,
            ScoreKind::Volatility => self.volatility = value,
            ScoreKind::Sharpe => self.sharpe = value,
            ScoreKind::Expense => self.expense = value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RankedFund {
    pub record: FundRecord,
    pub scores: Scores,
    pub total_score: Option<f64>,
}

fn raw_metric(record: &FundRecord, kind: ScoreKind) -> Option<f64> {
    match kind {
        ScoreKind::Return1y => record.y1_return,
        ScoreKind::Return5y => record.y5_return,
        ScoreKind::Volatility => record.volatility,
        ScoreKind::Sharpe => record.sharpe_ratio,
        ScoreKind::Expense => record.expense_ratio,
    }
}

/// Scores and orders the collection. Pure function of its inputs; the
/// returned table holds every input fund, highest total first, undefined
/// totals last. Order among equal totals is unspecified.
pub fn rank(funds: Vec<FundRecord>, weights: &RankWeights) -> Vec<RankedFund> {
    let mut table: Vec<RankedFund> = funds
        .into_iter()
        .map(|record| RankedFund {
            record,
            scores: Scores::default(),
            total_score: None,
        })
        .collect();

    for kind in ScoreKind::ALL {
        // Min and max over the funds that have the metric; funds without
        // it score None on this column either way.
        let mut bounds: Option<(f64, f64)> = None;
        for fund in &table {
            if let Some(v) = raw_metric(&fund.record, kind) {
                bounds = Some(match bounds {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }

        for fund in &mut table {
            let score = bounds.and_then(|(min, max)| {
                normalize(raw_metric(&fund.record, kind), min, max, kind.higher_is_better())
            });
            fund.scores.set(kind, score);
        }
    }

    for fund in &mut table {
        let mut total = Some(0.0);
        // Fixed iteration order keeps the float sum deterministic.
        for kind in ScoreKind::ALL {
            if let Some(weight) = weights.get(kind) {
                total = opt_add(total, fund.scores.get(kind).map(|s| s * weight));
            }
        }
        fund.total_score = total;
    }

    table.sort_by(compare_total_desc);
    table
}

fn normalize(value: Option<f64>, min: f64, max: f64, higher_is_better: bool) -> Option<f64> {
    let value = value?;
    let range = max - min;
    if range == 0.0 {
        // Degenerate normalization: the whole column is undefined.
        return None;
    }
    Some(if higher_is_better {
        (value - min) / range
    } else {
        (max - value) / range
    })
}

fn compare_total_desc(a: &RankedFund, b: &RankedFund) -> Ordering {
    match (a.total_score, b.total_score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, y1: f64, y5: f64, vol: f64, sharpe: f64, expense: f64) -> FundRecord {
        FundRecord {
            id: id.into(),
            name: format!("Fund {id}"),
            share_class: "Accumulation".into(),
            expense_ratio: Some(expense),
            y1_return: Some(y1),
            y5_return: Some(y5),
            volatility: Some(vol),
            sharpe_ratio: Some(sharpe),
        }
    }

    #[test]
    fn dominant_fund_ranks_first() {
        // X beats Y on every weighted metric.
        let x = record("X", 0.20, 0.80, 0.10, 1.5, 0.001);
        let y = record("Y", 0.05, 0.40, 0.25, 0.4, 0.007);
        let table = rank(vec![y, x], &RankWeights::default());

        assert_eq!(table[0].record.id, "X");
        assert!(table[0].total_score.unwrap() >= table[1].total_score.unwrap());
    }

    #[test]
    fn two_fund_scores_are_zero_and_one() {
        let x = record("X", 0.20, 0.80, 0.10, 1.5, 0.001);
        let y = record("Y", 0.05, 0.40, 0.25, 0.4, 0.007);
        let table = rank(vec![x, y], &RankWeights::default());

        let best = &table[0];
        assert!((best.scores.return_1y.unwrap() - 1.0).abs() < 1e-12);
        // Lower-is-better metrics are inverted: lowest volatility scores 1.
        assert!((best.scores.volatility.unwrap() - 1.0).abs() < 1e-12);
        assert!((best.scores.expense.unwrap() - 1.0).abs() < 1e-12);
        let worst = &table[1];
        assert!((worst.scores.return_1y.unwrap() - 0.0).abs() < 1e-12);
        assert!((worst.total_score.unwrap() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn single_fund_collection_is_degenerate() {
        let table = rank(
            vec![record("X", 0.1, 0.5, 0.2, 1.0, 0.003)],
            &RankWeights::default(),
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table[0].scores.return_1y, None);
        assert_eq!(table[0].scores.volatility, None);
        assert_eq!(table[0].total_score, None);
    }

    #[test]
    fn tied_metric_yields_null_column_but_not_others() {
        let mut x = record("X", 0.20, 0.80, 0.10, 1.5, 0.003);
        let mut y = record("Y", 0.05, 0.40, 0.25, 0.4, 0.003);
        x.expense_ratio = Some(0.003);
        y.expense_ratio = Some(0.003);
        let table = rank(vec![x, y], &RankWeights::default());

        for fund in &table {
            assert_eq!(fund.scores.expense, None);
            assert!(fund.scores.return_1y.is_some());
            // Expense carries weight, so its null spreads into the total.
            assert_eq!(fund.total_score, None);
        }
    }

    #[test]
    fn unweighted_metric_does_not_affect_total() {
        // Y wins only on the 5-year return, which the default weights omit.
        let x = record("X", 0.20, 0.10, 0.10, 1.5, 0.001);
        let y = record("Y", 0.05, 0.90, 0.25, 0.4, 0.007);
        let table = rank(vec![x, y], &RankWeights::default());

        assert_eq!(table[0].record.id, "X");
        // The score is still computed for inspection.
        assert!(table[0].scores.return_5y.is_some());
        assert!(table[1].scores.return_5y.is_some());
    }

    #[test]
    fn fund_with_missing_metric_sorts_last() {
        let x = record("X", 0.20, 0.80, 0.10, 1.5, 0.001);
        let y = record("Y", 0.05, 0.40, 0.25, 0.4, 0.007);
        let mut young = record("Z", 0.10, 0.0, 0.15, 1.0, 0.004);
        young.y1_return = None;
        young.volatility = None;
        young.sharpe_ratio = None;
        young.y5_return = None;

        let table = rank(vec![young, x, y], &RankWeights::default());

        assert_eq!(table.len(), 3);
        assert_eq!(table[2].record.id, "Z");
        assert_eq!(table[2].total_score, None);
        // The other funds still normalize over their own min and max.
        assert!(table[0].total_score.is_some());
        assert!(table[1].total_score.is_some());
    }

    #[test]
    fn custom_weights_change_ordering() {
        let steady = record("S", 0.05, 0.40, 0.02, 2.0, 0.002);
        let hot = record("H", 0.30, 0.50, 0.40, 0.5, 0.006);

        let return_chaser = RankWeights::new(HashMap::from([(ScoreKind::Return1y, 1.0)]));
        let table = rank(vec![steady.clone(), hot.clone()], &return_chaser);
        assert_eq!(table[0].record.id, "H");

        let risk_averse = RankWeights::new(HashMap::from([
            (ScoreKind::Volatility, 0.6),
            (ScoreKind::Sharpe, 0.4),
        ]));
        let table = rank(vec![steady, hot], &risk_averse);
        assert_eq!(table[0].record.id, "S");
    }

    #[test]
    fn empty_collection_ranks_to_empty_table() {
        let table = rank(vec![], &RankWeights::default());
        assert!(table.is_empty());
    }
}
