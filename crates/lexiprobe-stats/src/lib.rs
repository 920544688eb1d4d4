//! Statistical utilities for the lexiprobe feature-correlation analysis.
//!
//! This crate provides the numeric building blocks used by the correlation engine:
//!
//! - **Descriptive statistics**: Summarize a dependent variable (mean, median, spread)
//! - **Association measures**: Pearson and Spearman correlation with two-sided p-values
//! - **Multiple-comparison correction**: Benjamini-Hochberg, Holm and Bonferroni adjustments
//! - **Permutation significance**: Seeded, reproducible permutation tests
//! - **Dominance**: Coverage ratio of a binary feature between two label classes
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`correlation`]: Association coefficients and their significance
//! - [`correction`]: Batch p-value adjustment across many simultaneous tests
//! - [`permutation`]: Permutation-based significance for an association measure
//! - [`dominance`]: Binary feature coverage among positive and negative labels
//!
//! # Examples
//!
//! ## Computing a correlation
//!
//! ```
//! use lexiprobe_stats::correlation::{AssociationMeasure, Correlation};
//!
//! let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let ys = [2.0, 4.0, 6.0, 8.0, 10.0];
//! let correlation = Correlation::compute(AssociationMeasure::Pearson, &xs, &ys).unwrap();
//! assert!((correlation.coefficient - 1.0).abs() < 1e-12);
//! assert_eq!(correlation.p_value, 0.0);
//! ```
//!
//! ## Adjusting p-values
//!
//! ```
//! use lexiprobe_stats::correction::Correction;
//!
//! let adjusted = Correction::Bonferroni.adjust(&[0.01, 0.04]);
//! assert_eq!(adjusted, vec![0.02, 0.08]);
//! ```

pub mod correction;
pub mod correlation;
pub mod descriptive;
pub mod dominance;
pub mod permutation;
