//! Correlation of each feature column with the dependent variable.
//!
//! # Algorithm
//!
//! 1. For each active feature, collect the (feature, dependent) pairs of the
//!    rows where the feature is not missing
//! 2. Check the data thresholds (`min_pairs`, `min_nonzero`); a feature below a
//!    threshold gets an [`InsufficientReason`] instead of a statistic
//! 3. Compute the declared association measure and its p-value, analytically or
//!    by permutation
//! 4. Correct all computed p-values together
//! 5. Order by corrected p-value, then raw p-value, then feature id; features
//!    without a statistic come last, by id
//!
//! Columns are independent, so steps 1-3 run in parallel.

use std::{cmp::Ordering, fmt};

use lexiprobe_features::{feature::FeatureInfo, matrix::FeatureMatrix};
use lexiprobe_stats::{
    correction::Correction,
    correlation::{AssociationMeasure, Correlation},
    permutation::PermutationTest,
};
use rayon::prelude::*;
use serde::Serialize;

/// Smallest number of pairs for which a coefficient is defined.
const MIN_DEFINED_PAIRS: usize = 2;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("no active features to analyse")]
    NoActiveFeatures,
    #[display("no example has a dependent-variable value")]
    EmptyDependentVariable,
    #[display("feature matrix has {rows} rows but {dependent} dependent values were given")]
    LengthMismatch { rows: usize, dependent: usize },
    #[display("dependent value of row {row} is not finite")]
    NonFiniteDependent {
        #[error(not(source))]
        row: usize,
    },
}

/// How p-values are obtained.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Significance {
    /// Student's t approximation.
    #[default]
    Analytic,
    /// Shuffled-dependent permutation test.
    Permutation(PermutationTest),
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analytic => write!(f, "analytic"),
            Self::Permutation(test) => write!(
                f,
                "permutation ({} shuffles, seed {})",
                test.iterations, test.seed
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorrelationConfig {
    /// Minimum number of non-missing pairs (never below 2).
    pub min_pairs: usize,
    /// Minimum number of non-zero feature values among the pairs.
    pub min_nonzero: usize,
    pub correction: Correction,
    pub significance: Significance,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            min_pairs: 3,
            min_nonzero: 0,
            correction: Correction::default(),
            significance: Significance::default(),
        }
    }
}

/// Why a feature has no statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InsufficientReason {
    TooFewPairs { required: usize },
    TooFewNonZero { required: usize },
    /// One of the two samples has zero variance over the pairs.
    ConstantValues,
}

impl fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPairs { required } => write!(f, "insufficient (n < {required})"),
            Self::TooFewNonZero { required } => write!(f, "sparse (nonzero < {required})"),
            Self::ConstantValues => write!(f, "constant"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Computed {
        coefficient: f64,
        p_value: f64,
        corrected_p_value: f64,
    },
    Insufficient {
        reason: InsufficientReason,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub feature: String,
    pub name: String,
    pub measure: AssociationMeasure,
    /// Effective sample size: rows where the feature is not missing.
    pub n: usize,
    /// Non-zero feature values among those rows.
    pub nonzero: usize,
    pub outcome: Outcome,
}

impl CorrelationResult {
    #[must_use]
    pub fn corrected_p_value(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Computed {
                corrected_p_value, ..
            } => Some(corrected_p_value),
            Outcome::Insufficient { .. } => None,
        }
    }

    fn ordering(&self, other: &Self) -> Ordering {
        match (self.outcome, other.outcome) {
            (
                Outcome::Computed {
                    p_value: p1,
                    corrected_p_value: q1,
                    ..
                },
                Outcome::Computed {
                    p_value: p2,
                    corrected_p_value: q2,
                    ..
                },
            ) => q1
                .total_cmp(&q2)
                .then_with(|| p1.total_cmp(&p2))
                .then_with(|| self.feature.cmp(&other.feature)),
            (Outcome::Computed { .. }, Outcome::Insufficient { .. }) => Ordering::Less,
            (Outcome::Insufficient { .. }, Outcome::Computed { .. }) => Ordering::Greater,
            (Outcome::Insufficient { .. }, Outcome::Insufficient { .. }) => {
                self.feature.cmp(&other.feature)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorrelationEngine {
    config: CorrelationConfig,
}

impl CorrelationEngine {
    #[must_use]
    pub fn new(config: CorrelationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Correlates every matrix column with `dependent` (aligned with the rows).
    pub fn analyze(
        &self,
        matrix: &FeatureMatrix,
        dependent: &[f64],
    ) -> Result<Vec<CorrelationResult>, AnalysisError> {
        if matrix.columns.is_empty() {
            return Err(AnalysisError::NoActiveFeatures);
        }
        if dependent.len() != matrix.num_rows() {
            return Err(AnalysisError::LengthMismatch {
                rows: matrix.num_rows(),
                dependent: dependent.len(),
            });
        }
        if dependent.is_empty() {
            return Err(AnalysisError::EmptyDependentVariable);
        }
        if let Some(row) = dependent.iter().position(|v| !v.is_finite()) {
            return Err(AnalysisError::NonFiniteDependent { row });
        }

        let raw = matrix
            .columns
            .par_iter()
            .enumerate()
            .map(|(index, info)| self.measure_column(matrix, dependent, index, info))
            .collect::<Vec<_>>();

        let p_values = raw
            .iter()
            .filter_map(|(_, _, computed)| computed.ok().map(|c| c.p_value))
            .collect::<Vec<_>>();
        let mut corrected = self.config.correction.adjust(&p_values).into_iter();

        let mut results = matrix
            .columns
            .iter()
            .zip(raw)
            .map(|(info, (n, nonzero, computed))| {
                let outcome = match computed {
                    Ok(c) => Outcome::Computed {
                        coefficient: c.coefficient,
                        p_value: c.p_value,
                        corrected_p_value: corrected.next().unwrap_or(1.0),
                    },
                    Err(reason) => Outcome::Insufficient { reason },
                };
                CorrelationResult {
                    feature: info.id.clone(),
                    name: info.name.clone(),
                    measure: info.measure,
                    n,
                    nonzero,
                    outcome,
                }
            })
            .collect::<Vec<_>>();
        results.sort_by(CorrelationResult::ordering);

        tracing::info!(
            features = results.len(),
            computed = p_values.len(),
            correction = %self.config.correction,
            "computed correlations"
        );
        Ok(results)
    }

    /// Returns `(n, nonzero, statistic or reason)` for one column.
    fn measure_column(
        &self,
        matrix: &FeatureMatrix,
        dependent: &[f64],
        index: usize,
        info: &FeatureInfo,
    ) -> (usize, usize, Result<Correlation, InsufficientReason>) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = matrix
            .column(index)
            .zip(dependent)
            .filter_map(|(value, y)| value.value().map(|x| (x, *y)))
            .unzip();
        let n = xs.len();
        let nonzero = xs.iter().filter(|x| **x != 0.0).count();

        let required = self.config.min_pairs.max(MIN_DEFINED_PAIRS);
        let result = if n < required {
            Err(InsufficientReason::TooFewPairs { required })
        } else if nonzero < self.config.min_nonzero {
            Err(InsufficientReason::TooFewNonZero {
                required: self.config.min_nonzero,
            })
        } else {
            Correlation::compute(info.measure, &xs, &ys)
                .map(|c| self.significance(info.measure, &xs, &ys, c, index))
                .ok_or(InsufficientReason::ConstantValues)
        };
        match &result {
            Ok(c) => tracing::debug!(
                feature = %info.id,
                n,
                coefficient = c.coefficient,
                p_value = c.p_value,
                "measured feature"
            ),
            Err(reason) => tracing::debug!(feature = %info.id, n, %reason, "feature not measured"),
        }
        (n, nonzero, result)
    }

    fn significance(
        &self,
        measure: AssociationMeasure,
        xs: &[f64],
        ys: &[f64],
        correlation: Correlation,
        index: usize,
    ) -> Correlation {
        match self.config.significance {
            Significance::Analytic => correlation,
            Significance::Permutation(test) => {
                let test = PermutationTest {
                    seed: test.seed.wrapping_add(index as u64),
                    ..test
                };
                Correlation {
                    p_value: test.p_value(measure, xs, ys, correlation.coefficient),
                    ..correlation
                }
            }
        }
    }
}
