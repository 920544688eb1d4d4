//! Feature catalog and active-set resolution.
//!
//! The registry owns the full catalog in declaration order. A run activates a
//! subset of it:
//!
//! ```text
//! active = (catalog - default_disabled + include) - remove
//! ```
//!
//! preserving catalog order. Selection entries are feature ids or id prefixes
//! ending in `*` (`liwc:*` selects every LIWC category feature). An entry that
//! matches nothing is an error, never silently ignored.

use std::collections::BTreeSet;

use lexiprobe_lexicon::Resources;
use serde::Serialize;

use crate::feature::{self, BoxedFeature, Feature as _, FeatureInfo};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RegistryError {
    #[display("unknown feature: {id}")]
    UnknownFeature {
        #[error(not(source))]
        id: String,
    },
    #[display("no features remain active after applying the selection")]
    EmptyActiveSet,
    #[display("duplicate feature id in catalog: {id}")]
    DuplicateFeature {
        #[error(not(source))]
        id: String,
    },
}

/// Features to remove from, and add to, the default-enabled set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSelection {
    pub remove: Vec<String>,
    pub include: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FeatureRegistry {
    features: Vec<BoxedFeature>,
}

impl FeatureRegistry {
    /// Creates a registry from a catalog, rejecting duplicate ids.
    pub fn new(features: Vec<BoxedFeature>) -> Result<Self, RegistryError> {
        let mut seen = BTreeSet::new();
        for feature in &features {
            if !seen.insert(feature.id()) {
                return Err(RegistryError::DuplicateFeature {
                    id: feature.id().to_owned(),
                });
            }
        }
        Ok(Self { features })
    }

    /// The standard catalog for the given resources.
    pub fn standard(resources: &Resources) -> Result<Self, RegistryError> {
        Self::new(feature::standard_features(resources))
    }

    #[must_use]
    pub fn features(&self) -> &[BoxedFeature] {
        &self.features
    }

    #[must_use]
    pub fn infos(&self) -> Vec<FeatureInfo> {
        self.features.iter().map(|f| f.info()).collect()
    }

    /// Resolves the active feature set for a selection.
    pub fn resolve(&self, selection: &FeatureSelection) -> Result<ActiveFeatures, RegistryError> {
        let included = self.match_entries(&selection.include)?;
        let removed = self.match_entries(&selection.remove)?;

        let features = self
            .features
            .iter()
            .enumerate()
            .filter(|(idx, f)| f.default_enabled() || included.contains(idx))
            .filter(|(idx, _)| !removed.contains(idx))
            .map(|(_, f)| f.clone())
            .collect::<Vec<_>>();
        if features.is_empty() {
            return Err(RegistryError::EmptyActiveSet);
        }
        tracing::debug!(
            catalog = self.features.len(),
            active = features.len(),
            "resolved active features"
        );
        Ok(ActiveFeatures { features })
    }

    /// Catalog indices matched by the entries.
    fn match_entries(&self, entries: &[String]) -> Result<BTreeSet<usize>, RegistryError> {
        let mut matched = BTreeSet::new();
        for entry in entries {
            let entry = entry.trim();
            let before = matched.len();
            let mut any = false;
            for (idx, feature) in self.features.iter().enumerate() {
                if entry_matches(entry, feature.id()) {
                    matched.insert(idx);
                    any = true;
                }
            }
            if !any {
                return Err(RegistryError::UnknownFeature {
                    id: entry.to_owned(),
                });
            }
            tracing::trace!(entry, added = matched.len() - before, "matched selection entry");
        }
        Ok(matched)
    }
}

fn entry_matches(entry: &str, id: &str) -> bool {
    match entry.strip_suffix('*') {
        Some(prefix) => id.starts_with(prefix),
        None => entry == id,
    }
}

/// The resolved, ordered set of features for one run.
#[derive(Debug, Clone)]
pub struct ActiveFeatures {
    features: Vec<BoxedFeature>,
}

impl ActiveFeatures {
    #[must_use]
    pub fn features(&self) -> &[BoxedFeature] {
        &self.features
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.id()).collect()
    }

    #[must_use]
    pub fn infos(&self) -> Vec<FeatureInfo> {
        self.features.iter().map(|f| f.info()).collect()
    }
}

#[cfg(test)]
mod tests {
    use lexiprobe_lexicon::{LexiconKind, category::CategoryDictionary};

    use super::*;

    fn registry() -> FeatureRegistry {
        let liwc = [("horse", "animal"), ("happy", "posemo")]
            .into_iter()
            .collect::<CategoryDictionary>();
        FeatureRegistry::standard(&Resources::new().with_lexicon(LexiconKind::Liwc, liwc)).unwrap()
    }

    fn selection(remove: &[&str], include: &[&str]) -> FeatureSelection {
        FeatureSelection {
            remove: remove.iter().map(|s| (*s).to_owned()).collect(),
            include: include.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn test_default_selection_skips_disabled() {
        let active = registry().resolve(&FeatureSelection::default()).unwrap();
        let ids = active.ids();
        assert!(ids.contains(&"word_similarity"));
        assert!(!ids.contains(&"wup_similarity"));
        assert!(!ids.contains(&"liwc_count_change"));
    }

    #[test]
    fn test_include_keeps_catalog_order() {
        let active = registry()
            .resolve(&selection(&[], &["path_similarity", "wup_similarity"]))
            .unwrap();
        let ids = active.ids();
        let wup = ids.iter().position(|id| *id == "wup_similarity").unwrap();
        let path = ids.iter().position(|id| *id == "path_similarity").unwrap();
        assert!(wup < path);
    }

    #[test]
    fn test_remove_with_prefix_pattern() {
        let active = registry().resolve(&selection(&["liwc:*", "frequency_change"], &[])).unwrap();
        let ids = active.ids();
        assert!(ids.iter().all(|id| !id.starts_with("liwc:")));
        assert!(!ids.contains(&"frequency_change"));
        assert!(ids.contains(&"frequency_original"));
    }

    #[test]
    fn test_remove_wins_over_include() {
        let active = registry()
            .resolve(&selection(&["wup_similarity"], &["wup_similarity"]))
            .unwrap();
        assert!(!active.ids().contains(&"wup_similarity"));
    }

    #[test]
    fn test_unknown_feature_is_error() {
        let err = registry()
            .resolve(&selection(&["no_such_feature"], &[]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::UnknownFeature { id } if id == "no_such_feature"));

        let err = registry().resolve(&selection(&[], &["levin:*"])).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownFeature { .. }));
    }

    #[test]
    fn test_empty_active_set() {
        let err = registry().resolve(&selection(&["*"], &[])).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyActiveSet));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let registry = registry();
        let mut features = registry.features().to_vec();
        features.push(features[0].clone());
        let err = FeatureRegistry::new(features).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateFeature { id } if id == "word_similarity"));
    }
}
