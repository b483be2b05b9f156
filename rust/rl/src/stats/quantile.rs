use itertools::Itertools;
use serde::Serialize;

/// Empirical CDF evaluated at its own support: `fractions[i]` is the share
/// of the sample that is `<= values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuantileFunction {
    pub fractions: Vec<f64>,
    pub values: Vec<f64>,
}

impl QuantileFunction {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(fraction, value)` pairs, for plotting value against cumulative
    /// probability.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.fractions.iter().copied().zip(self.values.iter().copied())
    }

    /// Smallest sample value whose fraction is at least `q`.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        let i = self.fractions.partition_point(|&f| f < q);
        self.values.get(i).copied()
    }

    /// Share of the sample `<= x`.
    pub fn cdf(&self, x: f64) -> f64 {
        match self.values.partition_point(|&v| v <= x) {
            0 => 0.,
            i => self.fractions[i - 1],
        }
    }
}

pub fn empirical_quantile_function(returns: &[f64]) -> QuantileFunction {
    let n = returns.len() as f64;
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut seen = 0;
    let (fractions, values) = sorted
        .into_iter()
        .dedup_with_count()
        .map(|(count, v)| {
            seen += count;
            (seen as f64 / n, v)
        })
        .unzip();

    QuantileFunction { fractions, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::*;
    use rstest::*;

    fn example() -> QuantileFunction {
        empirical_quantile_function(&[3., 1., 2., 2., -1.5])
    }

    #[test]
    fn duplicates_are_collapsed() {
        let qf = example();

        assert_eq!(qf.len(), 4);
        assert_float_eq!(qf.values, vec![-1.5, 1., 2., 3.], abs_all <= 0.);
        assert_float_eq!(qf.fractions, vec![0.2, 0.4, 0.8, 1.], abs_all <= 1e-12);
        assert_eq!(qf.fractions.last(), Some(&1.));
    }

    #[rstest]
    #[case(0., Some(-1.5))]
    #[case(0.2, Some(-1.5))]
    #[case(0.3, Some(1.))]
    #[case(0.5, Some(2.))]
    #[case(0.8, Some(2.))]
    #[case(1., Some(3.))]
    #[case(1.1, None)]
    fn quantiles(#[case] q: f64, #[case] expected: Option<f64>) {
        assert_eq!(example().quantile(q), expected);
    }

    #[rstest]
    #[case(-2., 0.)]
    #[case(-1.5, 0.2)]
    #[case(1.5, 0.4)]
    #[case(2., 0.8)]
    #[case(10., 1.)]
    fn cdf(#[case] x: f64, #[case] expected: f64) {
        assert_float_eq!(example().cdf(x), expected, abs <= 1e-12);
    }

    #[test]
    fn empty_sample() {
        let qf = empirical_quantile_function(&[]);

        assert!(qf.is_empty());
        assert_eq!(qf.quantile(0.5), None);
        assert_float_eq!(qf.cdf(0.), 0., abs <= 0.);
    }

    #[test]
    fn points_pair_up() {
        let points = example().points().collect::<Vec<_>>();

        assert_eq!(points.len(), 4);
        assert_eq!(points[3], (1., 3.));
    }
}
