use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{analyze::AnalyzeArg, list_features::ListFeaturesArg};

mod analyze;
mod list_features;
mod resources;

/// Environment variable holding the log filter (`tracing-subscriber` syntax).
const LOG_ENV: &str = "LEXIPROBE_LOG";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug details to stderr (overridden by LEXIPROBE_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Correlate lexical features with a benchmark score
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Print the feature catalog
    ListFeatures(#[clap(flatten)] ListFeaturesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logging(args.verbose);
    match &args.mode {
        Mode::Analyze(arg) => analyze::run(arg)?,
        Mode::ListFeatures(arg) => list_features::run(arg)?,
    }
    Ok(())
}

/// Logs go to stderr so that stdout only carries the report.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use lexiprobe_analysis::{correlation::Significance, report::ReportFormat};
    use lexiprobe_stats::{correction::Correction, permutation::PermutationTest};

    use super::*;

    fn parse_analyze(args: &[&str]) -> AnalyzeArg {
        let args =
            CommandArgs::try_parse_from(["lexiprobe", "analyze"].iter().chain(args)).unwrap();
        match args.mode {
            Mode::Analyze(arg) => arg,
            Mode::ListFeatures(_) => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_analyze_defaults() {
        let arg = parse_analyze(&["benchmark.csv"]);
        let config = arg.to_config().unwrap();
        assert_eq!(config.schema.dependent, "clip_score_diff");
        assert!(config.selection.remove.is_empty());
        assert_eq!(config.correlation.min_pairs, 3);
        assert_eq!(config.correlation.correction, Correction::BenjaminiHochberg);
        assert_eq!(config.correlation.significance, Significance::Analytic);
        assert_eq!(arg.format, ReportFormat::Text);
        assert_eq!(config.limit, None);
    }

    #[test]
    fn test_analyze_options() {
        let arg = parse_analyze(&[
            "benchmark.csv",
            "--dependent",
            "clip prediction",
            "--remove",
            "word_similarity,liwc:*",
            "--include",
            "wup_similarity",
            "--correction",
            "holm",
            "--significance",
            "permutation",
            "--permutations",
            "500",
            "--seed",
            "7",
            "--format",
            "json",
            "--limit",
            "1000",
        ]);
        let config = arg.to_config().unwrap();
        assert_eq!(config.schema.dependent, "clip prediction");
        assert_eq!(config.selection.remove, ["word_similarity", "liwc:*"]);
        assert_eq!(config.selection.include, ["wup_similarity"]);
        assert_eq!(config.correlation.correction, Correction::Holm);
        assert_eq!(
            config.correlation.significance,
            Significance::Permutation(PermutationTest {
                iterations: 500,
                seed: 7
            })
        );
        assert_eq!(arg.format, ReportFormat::Json);
        assert_eq!(config.limit, Some(1000));
    }

    #[test]
    fn test_invalid_options() {
        let parse = |args: &[&str]| {
            CommandArgs::try_parse_from(["lexiprobe", "analyze", "a.csv"].iter().chain(args))
        };
        assert!(parse(&["--correction", "sidak"]).is_err());
        assert!(parse(&["--levin-groups", "g.json"]).is_err());
        assert!(parse_analyze(&["a.csv", "--alpha", "1.5"]).to_config().is_err());
    }

    #[test]
    fn test_global_verbose_flag() {
        let args = CommandArgs::try_parse_from(["lexiprobe", "list-features", "-v"]).unwrap();
        assert!(args.verbose);
        assert!(matches!(args.mode, Mode::ListFeatures(_)));
    }
}
