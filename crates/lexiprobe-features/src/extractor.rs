//! Feature extraction over a batch of examples.
//!
//! Each example is independent, so extraction runs on the rayon thread pool.
//! The output keeps input order regardless of scheduling.

use std::collections::BTreeMap;

use lexiprobe_lexicon::{ResourceKind, Resources};
use rayon::prelude::*;

use crate::{
    example::{Example, MalformedExample, SkipCounts, SkipReason},
    feature::{Feature as _, FeatureValue},
    matrix::{FeatureMatrix, MatrixRow},
    registry::ActiveFeatures,
};

#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'a> {
    features: &'a ActiveFeatures,
    resources: &'a Resources,
}

impl<'a> FeatureExtractor<'a> {
    #[must_use]
    pub fn new(features: &'a ActiveFeatures, resources: &'a Resources) -> Self {
        Self {
            features,
            resources,
        }
    }

    /// Resources some active feature needs but that are not loaded.
    #[must_use]
    pub fn unavailable_resources(&self) -> BTreeMap<ResourceKind, usize> {
        let mut unavailable = BTreeMap::new();
        for resource in self
            .features
            .features()
            .iter()
            .filter_map(|feature| feature.resource())
            .filter(|resource| !self.resources.is_available(*resource))
        {
            *unavailable.entry(resource).or_insert(0) += 1;
        }
        unavailable
    }

    /// Warns once per unloaded resource an active feature depends on.
    ///
    /// Such features are still extracted; every value is missing.
    pub fn warn_unavailable(&self) {
        for (resource, features) in self.unavailable_resources() {
            tracing::warn!(
                %resource,
                features,
                "resource not loaded, feature values will be missing"
            );
        }
    }

    /// Computes every active feature for one example, in active order.
    pub fn extract(&self, example: &Example) -> Result<Vec<FeatureValue>, MalformedExample> {
        let words = example.swapped_words()?;
        Ok(self
            .features
            .features()
            .iter()
            .map(|feature| feature.extract(example, words, self.resources))
            .collect())
    }

    /// Extracts the feature matrix for a batch.
    ///
    /// Examples whose swapped word is empty are skipped and counted under
    /// [`SkipReason::EmptySwappedWord`].
    #[must_use]
    pub fn extract_all(&self, examples: &[Example]) -> FeatureMatrix {
        self.warn_unavailable();
        let results = examples
            .par_iter()
            .enumerate()
            .map(|(idx, example)| (idx, self.extract(example)))
            .collect::<Vec<_>>();

        let mut rows = Vec::with_capacity(results.len());
        let mut skipped = SkipCounts::default();
        for (idx, result) in results {
            match result {
                Ok(values) => rows.push(MatrixRow {
                    example: idx,
                    values,
                }),
                Err(e) => {
                    tracing::debug!("skipping example: {e}");
                    skipped.record(SkipReason::EmptySwappedWord);
                }
            }
        }
        tracing::info!(
            examples = rows.len(),
            skipped = skipped.total(),
            features = self.features.len(),
            "extracted features"
        );
        FeatureMatrix {
            columns: self.features.infos(),
            rows,
            skipped,
        }
    }
}
