//! Feature-correlation analysis command
//!
//! Loads the lexical resources, runs the analysis on one benchmark table and
//! writes the ranked report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use lexiprobe_analysis::{
    correlation::{CorrelationConfig, Significance},
    dataset::TableSchema,
    pipeline::{self, RunConfiguration},
    report::ReportFormat,
};
use lexiprobe_features::registry::FeatureSelection;
use lexiprobe_stats::{correction::Correction, permutation::PermutationTest};

use crate::{command::resources::ResourceArg, util::Output};

#[derive(Debug, Clone, Copy, Default, derive_more::FromStr)]
pub(crate) enum SignificanceMethod {
    #[default]
    Analytic,
    Permutation,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    /// Benchmark table (comma-separated, with a header row)
    pub input: PathBuf,

    /// Column holding the dependent variable (a score or a pos/neg label)
    #[arg(long, default_value = "clip_score_diff")]
    pub dependent: String,

    /// Feature ids or `prefix*` patterns to disable (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub remove: Vec<String>,

    /// Default-disabled feature ids or `prefix*` patterns to enable (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Minimum number of examples with a defined value per feature
    #[arg(long, default_value_t = 3)]
    pub min_pairs: usize,

    /// Minimum number of non-zero values per feature
    #[arg(long, default_value_t = 0)]
    pub min_nonzero: usize,

    /// Multiple-comparison correction (benjamini-hochberg, holm, bonferroni, none)
    #[arg(long, default_value = "benjamini-hochberg")]
    pub correction: Correction,

    /// How p-values are computed (analytic, permutation)
    #[arg(long, default_value = "analytic")]
    pub significance: SignificanceMethod,

    /// Number of shuffles of the permutation test
    #[arg(long, default_value_t = 10_000)]
    pub permutations: usize,

    /// Seed of the permutation test
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Corrected p-value threshold for the example-words section
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Number of example words listed per significant feature
    #[arg(long, default_value_t = 5)]
    pub exemplars: usize,

    /// Only read the first N data rows
    #[arg(long)]
    pub limit: Option<usize>,

    /// Report format (text, json)
    #[arg(long, default_value = "text")]
    pub format: ReportFormat,

    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value = "sentence")]
    pub sentence_column: String,

    #[arg(long, default_value = "neg_sentence")]
    pub negative_sentence_column: String,

    #[arg(long, default_value = "pos_triplet")]
    pub positive_triplet_column: String,

    #[arg(long, default_value = "neg_triplet")]
    pub negative_triplet_column: String,

    #[arg(long, default_value = "neg_type")]
    pub negation_type_column: String,

    #[clap(flatten)]
    pub resources: ResourceArg,
}

impl AnalyzeArg {
    fn significance(&self) -> Significance {
        match self.significance {
            SignificanceMethod::Analytic => Significance::Analytic,
            SignificanceMethod::Permutation => Significance::Permutation(PermutationTest {
                iterations: self.permutations,
                seed: self.seed,
            }),
        }
    }

    pub(crate) fn to_config(&self) -> anyhow::Result<RunConfiguration> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.alpha),
            "--alpha must be between 0 and 1, got {}",
            self.alpha
        );
        anyhow::ensure!(
            self.permutations > 0,
            "--permutations must be at least 1"
        );
        Ok(RunConfiguration {
            input: self.input.clone(),
            schema: TableSchema {
                sentence: self.sentence_column.clone(),
                negative_sentence: self.negative_sentence_column.clone(),
                positive_triplet: self.positive_triplet_column.clone(),
                negative_triplet: self.negative_triplet_column.clone(),
                negation_type: self.negation_type_column.clone(),
                dependent: self.dependent.clone(),
            },
            selection: FeatureSelection {
                remove: self.remove.clone(),
                include: self.include.clone(),
            },
            correlation: CorrelationConfig {
                min_pairs: self.min_pairs,
                min_nonzero: self.min_nonzero,
                correction: self.correction,
                significance: self.significance(),
            },
            alpha: self.alpha,
            exemplars: self.exemplars,
            limit: self.limit,
        })
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.to_config()?;
    let resources = arg.resources.load()?;

    let report = pipeline::run(&config, &resources)
        .with_context(|| format!("Failed to analyse {}", config.input.display()))?;

    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_report(&report, arg.format)?;
    tracing::info!(
        output = %output.display_path(),
        format = %arg.format,
        results = report.results.len(),
        "wrote report"
    );
    Ok(())
}
