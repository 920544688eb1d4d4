//! Feature definitions for the correlation analysis.
//!
//! A feature is a named, pure function from an [`Example`] (and the loaded
//! [`Resources`]) to a real number or an explicit missing value. Every feature
//! declares its metadata up front, so the analysis never infers it at run time:
//!
//! - **Association measure** ([`AssociationMeasure`]): how the feature is
//!   correlated with the dependent variable (Pearson or Spearman)
//! - **Default-enabled flag**: whether the registry activates it without an
//!   explicit request
//! - **Resource dependency** ([`ResourceKind`]): which lexical resource it queries
//!
//! # Feature Families
//!
//! The concrete definitions live in [`definitions`]:
//!
//! **Similarity** - how close the swapped words (or sentences) are:
//! - [`definitions::WordSimilarityFeature`] - embedding, Wu-Palmer and path similarity
//! - [`definitions::TextSimilarityFeature`] - similarity of the two sentences
//!
//! **Word norms** - properties of each swapped word:
//! - [`definitions::ConcretenessFeature`] - concreteness ratings
//! - [`definitions::FrequencyFeature`] - log corpus frequency
//!
//! **Categories** - psycholinguistic category membership:
//! - [`definitions::CategoryChangeFeature`] - one feature per LIWC category or Levin class
//! - [`definitions::CategoryCountChangeFeature`] - change in the number of categories
//!
//! **Structure**:
//! - [`definitions::NegationTypeFeature`] - which triplet slot was swapped
//!
//! # Missing Values
//!
//! [`Feature::compute`] returns `None` when a resource cannot answer (word out of
//! vocabulary, absent frequency entry, resource not loaded). [`Feature::extract`]
//! turns that, and any non-finite result, into [`FeatureValue::Missing`]; a
//! missing value is never replaced by zero.

use std::fmt;

use lexiprobe_lexicon::{ResourceKind, Resources};
use lexiprobe_stats::correlation::AssociationMeasure;
use serde::Serialize;

use crate::example::{Example, SwappedWords};

pub use self::definitions::standard_features;

pub mod definitions;

/// A computed feature value or an explicit missing marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Present(f64),
    Missing,
}

impl FeatureValue {
    /// Wraps a computed value; `None` and non-finite values become [`FeatureValue::Missing`].
    #[must_use]
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Present(v),
            _ => Self::Missing,
        }
    }

    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Present(v) => Some(v),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Declared metadata of a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureInfo {
    pub id: String,
    pub name: String,
    pub measure: AssociationMeasure,
    pub default_enabled: bool,
    pub resource: Option<ResourceKind>,
}

pub trait Feature: fmt::Debug + Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn measure(&self) -> AssociationMeasure;
    fn resource(&self) -> Option<ResourceKind>;
    fn clone_boxed(&self) -> BoxedFeature;

    fn default_enabled(&self) -> bool {
        true
    }

    /// Computes the raw value, `None` when it cannot be computed.
    #[must_use]
    fn compute(
        &self,
        example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64>;

    #[must_use]
    fn extract(
        &self,
        example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> FeatureValue {
        FeatureValue::from_option(self.compute(example, words, resources))
    }

    #[must_use]
    fn info(&self) -> FeatureInfo {
        FeatureInfo {
            id: self.id().to_owned(),
            name: self.name().to_owned(),
            measure: self.measure(),
            default_enabled: self.default_enabled(),
            resource: self.resource(),
        }
    }
}

pub type BoxedFeature = Box<dyn Feature>;

impl Clone for BoxedFeature {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl Feature for BoxedFeature {
    fn id(&self) -> &str {
        self.as_ref().id()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn measure(&self) -> AssociationMeasure {
        self.as_ref().measure()
    }

    fn resource(&self) -> Option<ResourceKind> {
        self.as_ref().resource()
    }

    fn clone_boxed(&self) -> BoxedFeature {
        self.as_ref().clone_boxed()
    }

    fn default_enabled(&self) -> bool {
        self.as_ref().default_enabled()
    }

    fn compute(
        &self,
        example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64> {
        self.as_ref().compute(example, words, resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_is_missing() {
        assert_eq!(FeatureValue::from_option(Some(0.0)), FeatureValue::Present(0.0));
        assert_eq!(FeatureValue::from_option(None), FeatureValue::Missing);
        assert_eq!(FeatureValue::from_option(Some(f64::NAN)), FeatureValue::Missing);
        assert_eq!(
            FeatureValue::from_option(Some(f64::NEG_INFINITY)),
            FeatureValue::Missing
        );
    }
}
