mod quantile;

pub use quantile::*;

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    /// Population standard deviation (divides by n).
    pub std_dev: f64,
    pub max: f64,
    pub min: f64,
}

/// `None` for an empty sample.
pub fn summary_statistics(returns: &[f64]) -> Option<Summary> {
    let (min, max) = match returns.iter().copied().minmax() {
        MinMaxResult::NoElements => return None,
        MinMaxResult::OneElement(g) => (g, g),
        MinMaxResult::MinMax(lo, hi) => (lo, hi),
    };

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|&g| (g - mean).powi(2)).sum::<f64>() / n;

    Some(Summary {
        n: returns.len(),
        mean,
        std_dev: variance.sqrt(),
        max,
        min,
    })
}
