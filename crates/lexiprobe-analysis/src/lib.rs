//! Feature-correlation analysis of image-text negation benchmarks.
//!
//! This crate ties the other layers together: it reads the input table, runs
//! feature extraction, measures how each feature correlates with the dependent
//! variable and renders the ranked results.
//!
//! # Overview
//!
//! 1. **Load Examples** ([`dataset::Dataset`]): parse and validate the rows of the
//!    input table ([`table::Table`]), counting skipped rows per reason
//! 2. **Extract Features** ([`lexiprobe_features::extractor::FeatureExtractor`]):
//!    build the feature matrix for the active features
//! 3. **Correlate** ([`correlation::CorrelationEngine`]): association measure,
//!    p-value and corrected p-value per feature, ranked
//! 4. **Report** ([`report::Report`]): text table or JSON
//!
//! [`pipeline::run`] performs all steps for one [`pipeline::RunConfiguration`].
//!
//! # Example
//!
//! ```
//! use lexiprobe_analysis::{
//!     pipeline::{self, RunConfiguration},
//!     report::ReportFormat,
//! };
//! use lexiprobe_lexicon::Resources;
//!
//! let csv = "\
//! sentence,neg_sentence,pos_triplet,neg_triplet,neg_type,clip_score_diff
//! a man rides a horse,a man feeds a horse,\"man,ride,horse\",\"man,feed,horse\",v,0.4
//! a dog chases a cat,a cat chases a cat,\"dog,chase,cat\",\"cat,chase,cat\",s,0.1
//! a girl eats cake,a girl eats soup,\"girl,eat,cake\",\"girl,eat,soup\",o,0.3
//! ";
//! let config = RunConfiguration::new("benchmark.csv");
//! let report = pipeline::run_from_reader(&config, csv.as_bytes(), &Resources::new())?;
//! assert_eq!(report.summary.examples_analysed, 3);
//! println!("{}", report.render(ReportFormat::Text)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod correlation;
pub mod dataset;
pub mod pipeline;
pub mod report;
pub mod table;
