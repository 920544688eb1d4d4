//! Dominance of a binary feature between two label classes.
//!
//! For a binary feature and a binary label, the coverage of a class is the
//! share of that class's samples where the feature is set. The dominance score
//! is `coverage(positive) / coverage(negative)`: above 1 the feature is more
//! common among positive samples, below 1 among negative ones.

use serde::Serialize;

/// Coverage of a binary feature among positive and negative samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dominance {
    pub positive_coverage: f64,
    pub negative_coverage: f64,
}

impl Dominance {
    /// Computes the coverages of `xs` over the classes given by `labels`.
    ///
    /// Returns `None` unless both samples are binary (every value is 0 or 1 and
    /// both values occur) and have the same length.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexiprobe_stats::dominance::Dominance;
    ///
    /// let xs = [1.0, 1.0, 0.0, 1.0, 0.0, 0.0];
    /// let labels = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
    /// let dominance = Dominance::compute(&xs, &labels).unwrap();
    /// assert_eq!(dominance.score(), Some(2.0));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn compute(xs: &[f64], labels: &[f64]) -> Option<Self> {
        if xs.len() != labels.len() || !is_binary(xs) || !is_binary(labels) {
            return None;
        }
        let mut set = [0_usize; 2];
        let mut total = [0_usize; 2];
        for (x, label) in xs.iter().zip(labels) {
            let class = usize::from(*label == 1.0);
            total[class] += 1;
            if *x == 1.0 {
                set[class] += 1;
            }
        }
        Some(Self {
            positive_coverage: set[1] as f64 / total[1] as f64,
            negative_coverage: set[0] as f64 / total[0] as f64,
        })
    }

    /// Ratio of the coverages, `None` when the feature never occurs among
    /// negative samples.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        (self.negative_coverage > 0.0).then(|| self.positive_coverage / self.negative_coverage)
    }
}

/// Every value is 0 or 1, and both occur.
#[must_use]
pub fn is_binary(values: &[f64]) -> bool {
    values.iter().all(|v| *v == 0.0 || *v == 1.0)
        && values.contains(&0.0)
        && values.contains(&1.0)
}
