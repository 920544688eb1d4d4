//! Multiple-comparison correction of p-values.
//!
//! All procedures operate on the whole batch at once, because the adjustment of
//! each p-value depends on how many tests were run and on the other p-values.
//! Every adjusted value is clamped to `[p, 1.0]`, so an adjusted p-value is never
//! smaller than its raw counterpart.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Multiple-comparison correction procedure.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum Correction {
    /// Benjamini-Hochberg step-up procedure (false discovery rate).
    #[default]
    #[display("benjamini-hochberg")]
    BenjaminiHochberg,
    /// Holm step-down procedure (family-wise error rate).
    #[display("holm")]
    Holm,
    /// Bonferroni (family-wise error rate).
    #[display("bonferroni")]
    Bonferroni,
    /// No adjustment.
    #[display("none")]
    None,
}

impl Correction {
    /// Adjusts a batch of p-values.
    ///
    /// The returned vector is aligned with `p_values`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lexiprobe_stats::correction::Correction;
    ///
    /// let adjusted = Correction::BenjaminiHochberg.adjust(&[0.01, 0.04, 0.03]);
    /// for (adj, expected) in adjusted.iter().zip([0.03, 0.04, 0.04]) {
    ///     assert!((adj - expected).abs() < 1e-12);
    /// }
    /// ```
    #[must_use]
    pub fn adjust(self, p_values: &[f64]) -> Vec<f64> {
        let adjusted = match self {
            Self::BenjaminiHochberg => benjamini_hochberg(p_values),
            Self::Holm => holm(p_values),
            Self::Bonferroni => bonferroni(p_values),
            Self::None => p_values.to_vec(),
        };
        adjusted
            .into_iter()
            .zip(p_values)
            .map(|(adj, &p)| adj.max(p).min(1.0))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown correction '{name}' (expected benjamini-hochberg, holm, bonferroni or none)")]
pub struct UnknownCorrection {
    #[error(not(source))]
    pub name: String,
}

impl FromStr for Correction {
    type Err = UnknownCorrection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "benjamini-hochberg" | "bh" | "fdr" => Ok(Self::BenjaminiHochberg),
            "holm" => Ok(Self::Holm),
            "bonferroni" => Ok(Self::Bonferroni),
            "none" => Ok(Self::None),
            _ => Err(UnknownCorrection { name: s.to_owned() }),
        }
    }
}

/// Indices of `p_values` in ascending order, ties kept in input order.
fn ascending_order(p_values: &[f64]) -> Vec<usize> {
    let mut order = (0..p_values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]).then(a.cmp(&b)));
    order
}

#[expect(clippy::cast_precision_loss)]
fn benjamini_hochberg(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    let order = ascending_order(p_values);
    let mut adjusted = vec![0.0; p_values.len()];
    let mut running_min = 1.0_f64;
    for (rank, &idx) in order.iter().enumerate().rev() {
        let k = (rank + 1) as f64;
        running_min = running_min.min(p_values[idx] * m / k);
        adjusted[idx] = running_min;
    }
    adjusted
}

#[expect(clippy::cast_precision_loss)]
fn holm(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len();
    let order = ascending_order(p_values);
    let mut adjusted = vec![0.0; m];
    let mut running_max = 0.0_f64;
    for (rank, &idx) in order.iter().enumerate() {
        let factor = (m - rank) as f64;
        running_max = running_max.max((p_values[idx] * factor).min(1.0));
        adjusted[idx] = running_max;
    }
    adjusted
}

#[expect(clippy::cast_precision_loss)]
fn bonferroni(p_values: &[f64]) -> Vec<f64> {
    let m = p_values.len() as f64;
    p_values.iter().map(|p| p * m).collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const ALL: [Correction; 4] = [
        Correction::BenjaminiHochberg,
        Correction::Holm,
        Correction::Bonferroni,
        Correction::None,
    ];

    #[test]
    fn test_parse_round_trips_display() {
        for correction in ALL {
            assert_eq!(correction.to_string().parse::<Correction>(), Ok(correction));
        }
        assert_eq!("BH".parse::<Correction>(), Ok(Correction::BenjaminiHochberg));
        assert!("fisher".parse::<Correction>().is_err());
    }

    #[test]
    fn test_empty_batch() {
        for correction in ALL {
            assert!(correction.adjust(&[]).is_empty());
        }
    }

    #[test]
    fn test_adjusted_never_below_raw() {
        let p_values = [0.001, 0.2, 0.049, 0.5, 0.0, 1.0, 0.03, 0.03];
        for correction in ALL {
            let adjusted = correction.adjust(&p_values);
            assert_eq!(adjusted.len(), p_values.len());
            for (adj, raw) in adjusted.iter().zip(&p_values) {
                assert!(adj >= raw, "{correction}: {adj} < {raw}");
                assert!(*adj <= 1.0);
            }
        }
    }

    #[test]
    fn test_benjamini_hochberg_is_monotone() {
        let p_values = [0.01, 0.02, 0.03, 0.04, 0.05];
        let adjusted = Correction::BenjaminiHochberg.adjust(&p_values);
        for adj in &adjusted {
            assert_relative_eq!(*adj, 0.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_holm_step_down() {
        let adjusted = Correction::Holm.adjust(&[0.04, 0.01, 0.03]);
        assert_relative_eq!(adjusted[1], 0.03, epsilon = 1e-12);
        assert_relative_eq!(adjusted[2], 0.06, epsilon = 1e-12);
        assert_relative_eq!(adjusted[0], 0.06, epsilon = 1e-12);
    }

    #[test]
    fn test_bonferroni_clamps() {
        assert_eq!(Correction::Bonferroni.adjust(&[0.4, 0.6]), vec![0.8, 1.0]);
    }
}
