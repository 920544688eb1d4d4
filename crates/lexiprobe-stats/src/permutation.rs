//! Permutation-based significance for association measures.
//!
//! The dependent sample is shuffled repeatedly and the association recomputed;
//! the p-value is the share of shuffles whose coefficient is at least as extreme
//! as the observed one. The generator is seeded, so the same inputs and seed
//! always give the same p-value.

use rand::{SeedableRng as _, seq::SliceRandom};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::correlation::{self, AssociationMeasure};

/// Relative slack when comparing a permuted coefficient with the observed one.
const TIE_TOLERANCE: f64 = 1e-12;

/// Two-sided permutation test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PermutationTest {
    /// Number of shuffles.
    pub iterations: usize,
    /// Seed of the shuffling generator.
    pub seed: u64,
}

impl PermutationTest {
    /// Estimates the two-sided p-value of `observed` for the paired samples.
    ///
    /// Returns `(1 + extreme) / (1 + iterations)`, which is never zero.
    ///
    /// # Panics
    ///
    /// Panics if `xs` and `ys` have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexiprobe_stats::{correlation::AssociationMeasure, permutation::PermutationTest};
    ///
    /// let xs = (0..20).map(f64::from).collect::<Vec<_>>();
    /// let ys = xs.iter().map(|x| 2.0 * x + 1.0).collect::<Vec<_>>();
    /// let test = PermutationTest { iterations: 199, seed: 7 };
    /// let p = test.p_value(AssociationMeasure::Pearson, &xs, &ys, 1.0);
    /// assert!(p <= 0.01);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn p_value(
        &self,
        measure: AssociationMeasure,
        xs: &[f64],
        ys: &[f64],
        observed: f64,
    ) -> f64 {
        assert_eq!(xs.len(), ys.len(), "paired samples must have equal length");

        // Spearman on values equals Pearson on ranks, and shuffling ranks is
        // shuffling values, so rank once up front.
        let (xs, mut ys) = match measure {
            AssociationMeasure::Pearson => (xs.to_vec(), ys.to_vec()),
            AssociationMeasure::Spearman => {
                (correlation::average_ranks(xs), correlation::average_ranks(ys))
            }
        };

        let threshold = observed.abs() * (1.0 - TIE_TOLERANCE);
        let mut rng = Pcg32::seed_from_u64(self.seed);
        let mut extreme = 0_usize;
        for _ in 0..self.iterations {
            ys.shuffle(&mut rng);
            if correlation::pearson(&xs, &ys).is_some_and(|r| r.abs() >= threshold) {
                extreme += 1;
            }
        }
        (extreme + 1) as f64 / (self.iterations + 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_pairs() -> (Vec<f64>, Vec<f64>) {
        let xs = (0..30).map(f64::from).collect::<Vec<_>>();
        // deterministic zig-zag with no trend
        let ys = (0..30)
            .map(|i| if i % 2 == 0 { 1.0 } else { -1.0 } * f64::from(i % 7))
            .collect::<Vec<_>>();
        (xs, ys)
    }

    #[test]
    fn test_reproducible_for_same_seed() {
        let (xs, ys) = noisy_pairs();
        let observed = correlation::pearson(&xs, &ys).unwrap();
        let test = PermutationTest {
            iterations: 500,
            seed: 42,
        };
        let first = test.p_value(AssociationMeasure::Pearson, &xs, &ys, observed);
        let second = test.p_value(AssociationMeasure::Pearson, &xs, &ys, observed);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_association_is_not_significant() {
        let (xs, ys) = noisy_pairs();
        let observed = correlation::spearman(&xs, &ys).unwrap();
        let test = PermutationTest {
            iterations: 500,
            seed: 1,
        };
        let p = test.p_value(AssociationMeasure::Spearman, &xs, &ys, observed);
        assert!(p > 0.05, "p = {p}");
    }

    #[test]
    fn test_p_value_never_zero() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [1.0, 2.0, 3.0, 4.0];
        let test = PermutationTest {
            iterations: 0,
            seed: 0,
        };
        assert_eq!(test.p_value(AssociationMeasure::Pearson, &xs, &ys, 1.0), 1.0);
    }
}
