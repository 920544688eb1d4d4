//! Rendering of analysis results.
//!
//! A [`Report`] is rendered either as a fixed-width text table or as one JSON
//! object. Both renderings depend only on the report content (no timestamps,
//! no hash-map iteration), so identical runs give byte-identical output.

use std::{
    collections::BTreeMap,
    io::{self, Write},
};

use lexiprobe_features::{
    example::{Example, SkipCounts},
    matrix::FeatureMatrix,
};
use lexiprobe_stats::{
    descriptive::DescriptiveStats,
    dominance::{self, Dominance},
};
use serde::Serialize;

use crate::{
    correlation::{CorrelationResult, Outcome},
    pipeline::RunConfiguration,
};

const TOOL_NAME: &str = "lexiprobe";

/// Output format of a report.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::FromStr, derive_more::Display)]
pub enum ReportFormat {
    #[default]
    #[display("text")]
    Text,
    #[display("json")]
    Json,
}

/// What happened during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub examples_analysed: usize,
    pub skipped_total: usize,
    pub skipped: SkipCounts,
    pub active_features: usize,
    /// Summary of the dependent variable over the analysed examples.
    pub dependent: Option<DescriptiveStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Most frequent swapped words of a significant feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExemplarWords {
    pub feature: String,
    pub words: Vec<WordCount>,
}

impl ExemplarWords {
    /// Collects exemplar words for every computed result with corrected
    /// p-value at most `alpha`, in result order.
    ///
    /// Both the original and the replacement word of each example with a
    /// non-zero feature value are counted; the `limit` most frequent are kept,
    /// ties broken alphabetically.
    #[must_use]
    pub fn collect(
        results: &[CorrelationResult],
        matrix: &FeatureMatrix,
        examples: &[Example],
        alpha: f64,
        limit: usize,
    ) -> Vec<Self> {
        results
            .iter()
            .filter(|result| result.corrected_p_value().is_some_and(|q| q <= alpha))
            .filter_map(|result| {
                let column = matrix.column_index(&result.feature)?;
                let mut counts = BTreeMap::<&str, usize>::new();
                for (row, value) in matrix.rows.iter().zip(matrix.column(column)) {
                    if value.value().is_none_or(|v| v == 0.0) {
                        continue;
                    }
                    let Ok(words) = examples[row.example].swapped_words() else {
                        continue;
                    };
                    *counts.entry(words.original).or_default() += 1;
                    *counts.entry(words.replacement).or_default() += 1;
                }
                let mut words = counts.into_iter().collect::<Vec<_>>();
                // BTreeMap order is alphabetical and the sort is stable.
                words.sort_by(|a, b| b.1.cmp(&a.1));
                Some(Self {
                    feature: result.feature.clone(),
                    words: words
                        .into_iter()
                        .take(limit)
                        .map(|(word, count)| WordCount {
                            word: word.to_owned(),
                            count,
                        })
                        .collect(),
                })
            })
            .collect()
    }
}

/// Dominance score of a binary feature over a binary dependent variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDominance {
    pub feature: String,
    pub positive_coverage: f64,
    pub negative_coverage: f64,
    /// `None` when the feature never occurs among negative examples.
    pub score: Option<f64>,
}

impl FeatureDominance {
    /// Scores every binary column of the matrix.
    ///
    /// Returns `None` unless the dependent variable is a binary label. Only the
    /// rows where a feature is defined take part in its coverages. Scores are
    /// sorted in decreasing order, unbounded scores first, ties by feature id.
    #[must_use]
    pub fn collect(matrix: &FeatureMatrix, dependent: &[f64]) -> Option<Vec<Self>> {
        if !dominance::is_binary(dependent) {
            return None;
        }
        let mut scores = matrix
            .columns
            .iter()
            .enumerate()
            .filter_map(|(index, info)| {
                let (xs, labels): (Vec<f64>, Vec<f64>) = matrix
                    .column(index)
                    .zip(dependent)
                    .filter_map(|(value, label)| value.value().map(|x| (x, *label)))
                    .unzip();
                let dominance = Dominance::compute(&xs, &labels)?;
                Some(Self {
                    feature: info.id.clone(),
                    positive_coverage: dominance.positive_coverage,
                    negative_coverage: dominance.negative_coverage,
                    score: dominance.score(),
                })
            })
            .collect::<Vec<_>>();
        scores.sort_by(|a, b| {
            let a_score = a.score.unwrap_or(f64::INFINITY);
            let b_score = b.score.unwrap_or(f64::INFINITY);
            b_score
                .total_cmp(&a_score)
                .then_with(|| a.feature.cmp(&b.feature))
        });
        Some(scores)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub tool: &'static str,
    pub configuration: RunConfiguration,
    pub summary: RunSummary,
    pub results: Vec<CorrelationResult>,
    pub exemplars: Vec<ExemplarWords>,
    /// Only present when the dependent variable is a binary label.
    pub dominance: Option<Vec<FeatureDominance>>,
}

impl Report {
    #[must_use]
    pub fn new(
        configuration: RunConfiguration,
        summary: RunSummary,
        results: Vec<CorrelationResult>,
        exemplars: Vec<ExemplarWords>,
        dominance: Option<Vec<FeatureDominance>>,
    ) -> Self {
        Self {
            tool: TOOL_NAME,
            configuration,
            summary,
            results,
            exemplars,
            dominance,
        }
    }

    pub fn write<W>(&self, format: ReportFormat, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        match format {
            ReportFormat::Text => self.write_text(writer),
            ReportFormat::Json => self.write_json(writer),
        }
    }

    /// Renders the report to a string.
    pub fn render(&self, format: ReportFormat) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write(format, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn write_json<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)
    }

    pub fn write_text<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        self.write_header(writer)?;
        writeln!(writer)?;
        self.write_results(writer)?;
        if !self.exemplars.is_empty() {
            writeln!(writer)?;
            self.write_exemplars(writer)?;
        }
        if let Some(dominance) = &self.dominance {
            writeln!(writer)?;
            write_dominance(writer, dominance)?;
        }
        Ok(())
    }

    fn write_header<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        let config = &self.configuration;
        let summary = &self.summary;
        let title = format!("{TOOL_NAME} feature correlation report");
        writeln!(w, "{title}")?;
        writeln!(w, "{}", "=".repeat(title.len()))?;
        writeln!(w)?;
        writeln!(w, "  {:<22} {}", "Input:", config.input.display())?;
        writeln!(w, "  {:<22} {}", "Dependent variable:", config.schema.dependent)?;
        if let Some(limit) = config.limit {
            writeln!(w, "  {:<22} {limit}", "Row limit:")?;
        }
        writeln!(w, "  {:<22} {}", "Rows read:", summary.rows_read)?;
        writeln!(w, "  {:<22} {}", "Examples analysed:", summary.examples_analysed)?;
        writeln!(w, "  {:<22} {}", "Skipped examples:", summary.skipped_total)?;
        for (reason, count) in summary.skipped.iter() {
            writeln!(w, "    {:<20} {count}", format!("{reason}:"))?;
        }
        writeln!(w, "  {:<22} {}", "Active features:", summary.active_features)?;
        writeln!(
            w,
            "  {:<22} {}",
            "Removed features:",
            sorted_list(&config.selection.remove)
        )?;
        writeln!(
            w,
            "  {:<22} {}",
            "Included features:",
            sorted_list(&config.selection.include)
        )?;
        writeln!(
            w,
            "  {:<22} min pairs {}, min non-zero {}",
            "Thresholds:", config.correlation.min_pairs, config.correlation.min_nonzero
        )?;
        writeln!(w, "  {:<22} {}", "Correction:", config.correlation.correction)?;
        writeln!(w, "  {:<22} {}", "Significance:", config.correlation.significance)?;
        match &summary.dependent {
            Some(stats) => writeln!(
                w,
                "  {:<22} n={} mean={:.4} sd={:.4} min={:.4} max={:.4}",
                "Dependent summary:", stats.count, stats.mean, stats.std_dev, stats.min, stats.max
            ),
            None => writeln!(w, "  {:<22} (no values)", "Dependent summary:"),
        }
    }

    fn write_results<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        writeln!(
            w,
            "  {:>4}  {:<32} {:<8} {:>9} {:>10} {:>11} {:>6}",
            "Rank", "Feature", "Measure", "Coef", "p", "Corrected", "n"
        )?;
        // rank(4) + feature(32) + measure(8) + coef(9) + p(10) + corrected(11) + n(6) + spaces(7)
        writeln!(w, "  {}", "-".repeat(87))?;
        let mut rank = 0;
        for result in &self.results {
            match result.outcome {
                Outcome::Computed {
                    coefficient,
                    p_value,
                    corrected_p_value,
                } => {
                    rank += 1;
                    writeln!(
                        w,
                        "  {:>4}  {:<32} {:<8} {:>+9.4} {:>10.3e} {:>11.3e} {:>6}",
                        rank,
                        result.feature,
                        result.measure.to_string(),
                        coefficient,
                        p_value,
                        corrected_p_value,
                        result.n
                    )?;
                }
                Outcome::Insufficient { reason } => writeln!(
                    w,
                    "  {:>4}  {:<32} {:<8} {:>32} {:>6}",
                    "-",
                    result.feature,
                    result.measure.to_string(),
                    reason.to_string(),
                    result.n
                )?,
            }
        }
        Ok(())
    }

    fn write_exemplars<W>(&self, w: &mut W) -> io::Result<()>
    where
        W: Write,
    {
        writeln!(
            w,
            "Example words of significant features (corrected p <= {}):",
            self.configuration.alpha
        )?;
        for exemplar in &self.exemplars {
            let words = if exemplar.words.is_empty() {
                "(none)".to_owned()
            } else {
                exemplar
                    .words
                    .iter()
                    .map(|wc| format!("{} ({})", wc.word, wc.count))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            writeln!(w, "  {:<32} {words}", exemplar.feature)?;
        }
        Ok(())
    }
}

fn write_dominance<W>(w: &mut W, dominance: &[FeatureDominance]) -> io::Result<()>
where
    W: Write,
{
    writeln!(w, "Dominance scores of binary features (positive / negative coverage):")?;
    if dominance.is_empty() {
        return writeln!(w, "  (no binary features)");
    }
    writeln!(
        w,
        "  {:<32} {:>9} {:>9} {:>9}",
        "Feature", "Score", "Positive", "Negative"
    )?;
    writeln!(w, "  {}", "-".repeat(62))?;
    for entry in dominance {
        let score = entry
            .score
            .map_or_else(|| "inf".to_owned(), |score| format!("{score:.4}"));
        writeln!(
            w,
            "  {:<32} {:>9} {:>9.4} {:>9.4}",
            entry.feature, score, entry.positive_coverage, entry.negative_coverage
        )?;
    }
    Ok(())
}

fn sorted_list(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_owned();
    }
    let mut items = items.to_vec();
    items.sort();
    items.join(", ")
}

#[cfg(test)]
mod tests {
    use lexiprobe_features::{
        example::{NegationType, Triplet},
        feature::{FeatureInfo, FeatureValue},
        matrix::MatrixRow,
    };
    use approx::assert_relative_eq;
    use lexiprobe_stats::correlation::AssociationMeasure;

    use super::*;
    use crate::correlation::InsufficientReason;

    fn example(row: usize, original: &str, replacement: &str) -> Example {
        Example {
            row,
            sentence: format!("a man rides a {original}"),
            negative_sentence: format!("a man rides a {replacement}"),
            positive: Triplet::new("man", "ride", original),
            negative: Triplet::new("man", "ride", replacement),
            negation: NegationType::Object,
            dependent: 0.0,
        }
    }

    fn computed(feature: &str, q: f64) -> CorrelationResult {
        CorrelationResult {
            feature: feature.to_owned(),
            name: feature.to_owned(),
            measure: AssociationMeasure::Spearman,
            n: 4,
            nonzero: 3,
            outcome: Outcome::Computed {
                coefficient: 0.5,
                p_value: q / 2.0,
                corrected_p_value: q,
            },
        }
    }

    #[test]
    fn test_exemplar_words() {
        let examples = vec![
            example(0, "horse", "dog"),
            example(1, "horse", "cat"),
            example(2, "cow", "dog"),
            example(3, "bird", "fish"),
        ];
        let matrix = FeatureMatrix {
            columns: vec![FeatureInfo {
                id: "liwc:animal".to_owned(),
                name: "animal".to_owned(),
                measure: AssociationMeasure::Spearman,
                default_enabled: true,
                resource: None,
            }],
            rows: [Some(1.0), Some(-1.0), Some(1.0), Some(0.0)]
                .into_iter()
                .enumerate()
                .map(|(example, v)| MatrixRow {
                    example,
                    values: vec![FeatureValue::from_option(v)],
                })
                .collect(),
            skipped: SkipCounts::default(),
        };
        let results = vec![
            computed("liwc:animal", 0.01),
            computed("not_in_matrix", 0.01),
            CorrelationResult {
                outcome: Outcome::Insufficient {
                    reason: InsufficientReason::ConstantValues,
                },
                ..computed("liwc:other", 0.0)
            },
        ];

        let exemplars = ExemplarWords::collect(&results, &matrix, &examples, 0.05, 3);
        assert_eq!(exemplars.len(), 1);
        let words = exemplars[0]
            .words
            .iter()
            .map(|wc| (wc.word.as_str(), wc.count))
            .collect::<Vec<_>>();
        assert_eq!(words, [("dog", 2), ("horse", 2), ("cat", 1)]);

        assert!(ExemplarWords::collect(&results, &matrix, &examples, 0.001, 3).is_empty());
    }

    fn binary_matrix(columns: &[(&str, [Option<f64>; 6])]) -> FeatureMatrix {
        FeatureMatrix {
            columns: columns
                .iter()
                .map(|(id, _)| FeatureInfo {
                    id: (*id).to_owned(),
                    name: (*id).to_owned(),
                    measure: AssociationMeasure::Pearson,
                    default_enabled: true,
                    resource: None,
                })
                .collect(),
            rows: (0..6)
                .map(|example| MatrixRow {
                    example,
                    values: columns
                        .iter()
                        .map(|(_, values)| FeatureValue::from_option(values[example]))
                        .collect(),
                })
                .collect(),
            skipped: SkipCounts::default(),
        }
    }

    #[test]
    fn test_dominance_of_binary_features() {
        let matrix = binary_matrix(&[
            ("negation_type:o", [Some(1.0), Some(1.0), Some(0.0), Some(1.0), Some(0.0), Some(0.0)]),
            ("negation_type:s", [Some(0.0), Some(0.0), Some(1.0), Some(0.0), Some(1.0), Some(1.0)]),
            ("only_positive", [Some(1.0), Some(0.0), None, Some(0.0), Some(0.0), None]),
            ("liwc:animal", [Some(1.0), Some(-1.0), Some(0.0), Some(1.0), Some(0.0), Some(0.0)]),
            ("always_set", [Some(1.0); 6]),
        ]);
        let labels = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];

        let dominance = FeatureDominance::collect(&matrix, &labels).unwrap();
        let order = dominance
            .iter()
            .map(|d| (d.feature.as_str(), d.score))
            .collect::<Vec<_>>();
        assert_eq!(
            order,
            [
                ("only_positive", None),
                ("negation_type:o", Some(2.0)),
                ("negation_type:s", Some(0.5)),
            ]
        );
        // missing values leave the class sizes at 2 positive and 2 negative rows
        assert_relative_eq!(dominance[0].positive_coverage, 0.5);

        assert_eq!(FeatureDominance::collect(&matrix, &[0.9, 0.1, 0.5, 0.2, 0.3, 0.4]), None);
    }

    #[test]
    fn test_dominance_section_rendering() {
        let entries = vec![
            FeatureDominance {
                feature: "only_positive".to_owned(),
                positive_coverage: 0.5,
                negative_coverage: 0.0,
                score: None,
            },
            FeatureDominance {
                feature: "negation_type:o".to_owned(),
                positive_coverage: 2.0 / 3.0,
                negative_coverage: 1.0 / 3.0,
                score: Some(2.0),
            },
        ];
        let mut buf = Vec::new();
        write_dominance(&mut buf, &entries).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let row = |feature: &str, score: &str, positive: f64, negative: f64| {
            format!("  {feature:<32} {score:>9} {positive:>9.4} {negative:>9.4}\n")
        };
        assert!(text.contains(&row("only_positive", "inf", 0.5, 0.0)));
        assert!(text.contains(&row("negation_type:o", "2.0000", 2.0 / 3.0, 1.0 / 3.0)));

        let mut buf = Vec::new();
        write_dominance(&mut buf, &[]).unwrap();
        assert!(String::from_utf8(buf).unwrap().ends_with("  (no binary features)\n"));
    }

    #[test]
    fn test_sorted_list() {
        assert_eq!(sorted_list(&[]), "(none)");
        assert_eq!(
            sorted_list(&["b".to_owned(), "a".to_owned()]),
            "a, b"
        );
    }
}
