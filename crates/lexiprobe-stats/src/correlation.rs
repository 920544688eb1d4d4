//! Association measures between two paired samples.
//!
//! Two measures are provided:
//!
//! - [`AssociationMeasure::Pearson`] - linear association on the raw values
//! - [`AssociationMeasure::Spearman`] - rank association (Pearson on average ranks)
//!
//! Both report a two-sided p-value from Student's t distribution with `n - 2`
//! degrees of freedom.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Association measure declared for a feature.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum AssociationMeasure {
    /// Pearson product-moment correlation.
    #[display("pearson")]
    Pearson,
    /// Spearman rank correlation.
    #[display("spearman")]
    Spearman,
}

impl AssociationMeasure {
    /// Computes the association coefficient for paired samples.
    ///
    /// Returns `None` when fewer than two pairs are given or when either sample
    /// has zero variance.
    ///
    /// # Panics
    ///
    /// Panics if `xs` and `ys` have different lengths.
    #[must_use]
    pub fn coefficient(self, xs: &[f64], ys: &[f64]) -> Option<f64> {
        match self {
            Self::Pearson => pearson(xs, ys),
            Self::Spearman => spearman(xs, ys),
        }
    }
}

/// An association coefficient with its two-sided significance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub coefficient: f64,
    pub p_value: f64,
}

impl Correlation {
    /// Computes the coefficient and its analytic p-value.
    ///
    /// Returns `None` under the same conditions as [`AssociationMeasure::coefficient`].
    #[must_use]
    pub fn compute(measure: AssociationMeasure, xs: &[f64], ys: &[f64]) -> Option<Self> {
        let coefficient = measure.coefficient(xs, ys)?;
        Some(Self {
            coefficient,
            p_value: two_sided_p_value(coefficient, xs.len()),
        })
    }
}

/// Pearson correlation coefficient of paired samples.
///
/// # Panics
///
/// Panics if `xs` and `ys` have different lengths.
///
/// # Examples
///
/// ```
/// use lexiprobe_stats::correlation::pearson;
///
/// let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
/// assert!((r + 1.0).abs() < 1e-12);
/// assert_eq!(pearson(&[1.0, 1.0], &[0.0, 1.0]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    assert_eq!(xs.len(), ys.len(), "paired samples must have equal length");
    if xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// Spearman rank correlation of paired samples.
///
/// Tied values share their average rank.
///
/// # Panics
///
/// Panics if `xs` and `ys` have different lengths.
#[must_use]
pub fn spearman(xs: &[f64], ys: &[f64]) -> Option<f64> {
    pearson(&average_ranks(xs), &average_ranks(ys))
}

/// Ranks values starting at 1, giving tied values the mean of their ranks.
///
/// # Examples
///
/// ```
/// use lexiprobe_stats::correlation::average_ranks;
///
/// assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 5.0]), vec![2.0, 3.5, 3.5, 1.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        start = end;
    }
    ranks
}

/// Two-sided p-value for a correlation coefficient over `n` pairs.
///
/// Uses `t = r * sqrt((n - 2) / (1 - r^2))` against Student's t with `n - 2`
/// degrees of freedom. With two pairs there are no degrees of freedom left and
/// the result is `1.0`; a perfect correlation over more pairs gives `0.0`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn two_sided_p_value(coefficient: f64, n: usize) -> f64 {
    if n < 3 || !coefficient.is_finite() {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let residual = 1.0 - coefficient * coefficient;
    if residual <= 0.0 {
        return 0.0;
    }
    let t = coefficient * (df / residual).sqrt();
    StudentsT::new(0.0, 1.0, df).map_or(1.0, |dist| (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0))
}
