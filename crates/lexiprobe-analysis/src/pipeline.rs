//! End-to-end analysis run.
//!
//! ```text
//! RunConfiguration + Resources
//!     ↓ FeatureRegistry::resolve   (unknown / empty selection fails here)
//! ActiveFeatures
//!     ↓ Dataset::load              (missing column / empty dependent fails here)
//! Examples
//!     ↓ FeatureExtractor
//! FeatureMatrix
//!     ↓ CorrelationEngine
//! Report
//! ```
//!
//! Every configuration error is raised before feature extraction starts.
//! A run never mutates the resources, so several runs (for example with
//! different dependent variables) can share one loaded [`Resources`].

use std::{io::Read, path::PathBuf};

use lexiprobe_features::{
    extractor::FeatureExtractor,
    registry::{ActiveFeatures, FeatureRegistry, FeatureSelection, RegistryError},
};
use lexiprobe_lexicon::Resources;
use lexiprobe_stats::descriptive::DescriptiveStats;
use serde::Serialize;

use crate::{
    correlation::{AnalysisError, CorrelationConfig, CorrelationEngine},
    dataset::{Dataset, DatasetError, TableSchema},
    report::{ExemplarWords, FeatureDominance, Report, RunSummary},
};

/// Immutable parameters of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfiguration {
    pub input: PathBuf,
    pub schema: TableSchema,
    pub selection: FeatureSelection,
    pub correlation: CorrelationConfig,
    /// Corrected p-value threshold of the exemplar-words section.
    pub alpha: f64,
    /// Number of exemplar words per significant feature.
    pub exemplars: usize,
    /// Only the first `limit` data rows are read.
    pub limit: Option<usize>,
}

impl RunConfiguration {
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            schema: TableSchema::default(),
            selection: FeatureSelection::default(),
            correlation: CorrelationConfig::default(),
            alpha: 0.05,
            exemplars: 5,
            limit: None,
        }
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum RunError {
    #[display("{_0}")]
    Registry(RegistryError),
    #[display("{_0}")]
    Dataset(DatasetError),
    #[display("{_0}")]
    Analysis(AnalysisError),
}

/// Runs the analysis on the table at `config.input`.
pub fn run(config: &RunConfiguration, resources: &Resources) -> Result<Report, RunError> {
    let active = resolve_features(config, resources)?;
    let dataset = Dataset::load(&config.input, &config.schema, config.limit)?;
    Ok(analyze(config, &active, &dataset, resources)?)
}

/// Runs the analysis on a table read from `reader`.
///
/// `config.input` is only used as the input label of the report.
pub fn run_from_reader<R>(
    config: &RunConfiguration,
    reader: R,
    resources: &Resources,
) -> Result<Report, RunError>
where
    R: Read,
{
    let active = resolve_features(config, resources)?;
    let dataset = Dataset::from_reader(reader, &config.schema, config.limit)?;
    Ok(analyze(config, &active, &dataset, resources)?)
}

/// Resolves the active features of a run against the standard catalog.
pub fn resolve_features(
    config: &RunConfiguration,
    resources: &Resources,
) -> Result<ActiveFeatures, RegistryError> {
    let active = FeatureRegistry::standard(resources)?.resolve(&config.selection)?;
    tracing::info!(active = active.len(), "resolved feature selection");
    Ok(active)
}

/// Extracts features from a loaded dataset and correlates them.
pub fn analyze(
    config: &RunConfiguration,
    active: &ActiveFeatures,
    dataset: &Dataset,
    resources: &Resources,
) -> Result<Report, AnalysisError> {
    if active.is_empty() {
        return Err(AnalysisError::NoActiveFeatures);
    }
    let matrix = FeatureExtractor::new(active, resources).extract_all(&dataset.examples);
    let dependent = matrix.dependent_column(&dataset.examples);
    let results = CorrelationEngine::new(config.correlation).analyze(&matrix, &dependent)?;
    let exemplars = ExemplarWords::collect(
        &results,
        &matrix,
        &dataset.examples,
        config.alpha,
        config.exemplars,
    );
    let dominance = FeatureDominance::collect(&matrix, &dependent);

    let mut skipped = dataset.skipped.clone();
    skipped.merge(&matrix.skipped);
    let summary = RunSummary {
        rows_read: dataset.rows_read,
        examples_analysed: matrix.num_rows(),
        skipped_total: skipped.total(),
        skipped,
        active_features: active.len(),
        dependent: DescriptiveStats::new(dependent.iter().copied()),
    };
    Ok(Report::new(
        config.clone(),
        summary,
        results,
        exemplars,
        dominance,
    ))
}
