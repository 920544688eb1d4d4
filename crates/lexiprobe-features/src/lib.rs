//! Feature extraction for image-text negation benchmarks.
//!
//! Each benchmark row pairs a sentence with a negative variant that swaps one
//! word of its (subject, verb, object) triplet. This crate turns such rows into
//! a matrix of linguistic features describing the swap.
//!
//! # Workflow
//!
//! 1. **Examples** ([`example::Example`]): one validated input row
//! 2. **Catalog** ([`registry::FeatureRegistry`]): every known feature, built from
//!    the loaded [`Resources`](lexiprobe_lexicon::Resources)
//! 3. **Selection** ([`registry::FeatureRegistry::resolve`]): the active feature set
//! 4. **Extraction** ([`extractor::FeatureExtractor`]): the [`matrix::FeatureMatrix`]
//!
//! # Example
//!
//! ```
//! use lexiprobe_features::{
//!     example::{Example, NegationType, Triplet},
//!     extractor::FeatureExtractor,
//!     registry::{FeatureRegistry, FeatureSelection},
//! };
//! use lexiprobe_lexicon::Resources;
//!
//! let resources = Resources::new();
//! let registry = FeatureRegistry::standard(&resources)?;
//! let active = registry.resolve(&FeatureSelection::default())?;
//!
//! let examples = vec![Example {
//!     row: 0,
//!     sentence: "a man rides a horse".to_owned(),
//!     negative_sentence: "a man feeds a horse".to_owned(),
//!     positive: Triplet::new("man", "ride", "horse"),
//!     negative: Triplet::new("man", "feed", "horse"),
//!     negation: NegationType::Verb,
//!     dependent: 0.25,
//! }];
//! let matrix = FeatureExtractor::new(&active, &resources).extract_all(&examples);
//! assert_eq!(matrix.num_rows(), 1);
//! assert_eq!(matrix.columns.len(), active.len());
//! # Ok::<(), lexiprobe_features::registry::RegistryError>(())
//! ```

pub mod example;
pub mod extractor;
pub mod feature;
pub mod matrix;
pub mod registry;
