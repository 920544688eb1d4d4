use lexiprobe_analysis::{
    correlation::{InsufficientReason, Outcome},
    dataset::DatasetError,
    pipeline::{self, RunConfiguration, RunError},
    report::ReportFormat,
};
use lexiprobe_features::registry::RegistryError;
use lexiprobe_lexicon::{
    LexiconKind, Resources,
    category::CategoryDictionary,
    embedding::EmbeddingTable,
    table::{FrequencyTable, RatingTable},
};

const HEADER: &str =
    ",sentence,neg_sentence,pos_triplet,neg_triplet,neg_type,clip prediction,clip_score_diff\n";

const BENCHMARK: &str = "\
0,A man rides a horse.,A man rides a dog.,\"man,ride,horse\",\"man,ride,dog\",o,pos,0.42
1,A woman feeds a cat.,A woman feeds a dog.,\"woman,feed,cat\",\"woman,feed,dog\",o,pos,0.31
2,A dog chases a ball.,A cat chases a ball.,\"dog,chase,ball\",\"cat,chase,ball\",s,neg,-0.05
3,Two people ride horses.,Two people feed horses.,\
\"['man,ride,horse', 'person,ride,horse']\",\"['person,feed,horse']\",v,pos,0.12
4,A girl eats a cake.,A girl eats a soup.,\"girl,eat,cake\",\"girl,eat,soup\",o,neg,-0.20
5,A boy throws a ball.,A boy kicks a ball.,\"boy,throw,ball\",\"boy,kick,ball\",v,pos,0.08
6,A cat sleeps on a bed.,A dog sleeps on a bed.,\"cat,sleep,bed\",\"dog,sleep,bed\",s,neg,-0.11
7,A man eats an apple.,A man eats a horse.,\"man,eat,apple\",\"man,eat,horse\",o,pos,0.27
8,,A man eats a horse.,\"man,eat,apple\",\"man,eat,horse\",o,pos,0.27
9,A man eats an apple.,A man eats a horse.,\"man,eat,apple\",\"man,eat,\",o,pos,0.27
";

const EMBEDDINGS: &str = "\
man 0.9 0.1 0.0
woman 0.8 0.2 0.1
person 0.85 0.15 0.05
horse 0.1 0.9 0.2
dog 0.2 0.8 0.3
cat 0.25 0.75 0.35
ball 0.0 0.1 0.9
cake 0.05 0.2 0.8
soup 0.1 0.25 0.7
apple 0.1 0.3 0.85
ride 0.5 0.5 0.1
feed 0.45 0.4 0.2
";

fn resources() -> Resources {
    let embeddings = EmbeddingTable::from_reader(EMBEDDINGS.as_bytes()).unwrap();
    let frequencies = [
        ("man", 5000),
        ("woman", 3000),
        ("horse", 800),
        ("dog", 2500),
        ("cat", 1800),
        ("cake", 400),
        ("soup", 350),
        ("apple", 600),
        ("throw", 700),
        ("kick", 300),
        ("ride", 900),
        ("feed", 650),
    ]
    .into_iter()
    .map(|(w, c)| (w.to_owned(), c))
    .collect::<FrequencyTable>();
    let concreteness = [
        ("horse", 4.9),
        ("dog", 4.85),
        ("cat", 4.86),
        ("cake", 4.9),
        ("soup", 4.7),
        ("apple", 5.0),
        ("ball", 4.9),
    ]
    .into_iter()
    .map(|(w, r)| (w.to_owned(), r))
    .collect::<RatingTable>();
    let liwc = [
        ("horse", "animal"),
        ("dog", "animal"),
        ("cat", "animal"),
        ("dog", "pet"),
        ("cat", "pet"),
        ("cake", "ingest"),
        ("soup", "ingest"),
        ("apple", "ingest"),
        ("eat*", "ingest"),
        ("kick", "motion"),
        ("ride", "motion"),
    ]
    .into_iter()
    .collect::<CategoryDictionary>();
    let levin = [("ride", "51.4.2"), ("feed", "13.1"), ("throw", "17.1"), ("kick", "18.1")]
        .into_iter()
        .collect::<CategoryDictionary>();
    Resources::new()
        .with_embeddings(embeddings)
        .with_frequencies(frequencies)
        .with_concreteness(concreteness)
        .with_lexicon(LexiconKind::Liwc, liwc)
        .with_lexicon(LexiconKind::Levin, levin)
}

fn benchmark() -> String {
    format!("{HEADER}{BENCHMARK}")
}

#[test]
fn test_reports_are_byte_identical_across_runs() {
    let resources = resources();
    let mut config = RunConfiguration::new("benchmark.csv");
    config.alpha = 1.0;

    let first = pipeline::run_from_reader(&config, benchmark().as_bytes(), &resources).unwrap();
    let second = pipeline::run_from_reader(&config, benchmark().as_bytes(), &resources).unwrap();
    for format in [ReportFormat::Text, ReportFormat::Json] {
        assert_eq!(first.render(format).unwrap(), second.render(format).unwrap());
    }

    let text = first.render(ReportFormat::Text).unwrap();
    assert!(text.starts_with("lexiprobe feature correlation report\n"));
    for (label, value) in [
        ("Dependent variable:", "clip_score_diff"),
        ("Rows read:", "10"),
        ("Examples analysed:", "8"),
        ("Skipped examples:", "2"),
    ] {
        assert!(text.contains(&format!("  {label:<22} {value}\n")), "{label}");
    }

    let json: serde_json::Value =
        serde_json::from_str(&first.render(ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["tool"], "lexiprobe");
    assert_eq!(json["summary"]["examples_analysed"], 8);
    assert_eq!(json["summary"]["skipped"]["empty_sentence"], 1);
    assert_eq!(json["summary"]["skipped"]["empty_swapped_word"], 1);
}

#[test]
fn test_report_invariants() {
    let resources = resources();
    let config = RunConfiguration::new("benchmark.csv");
    let report = pipeline::run_from_reader(&config, benchmark().as_bytes(), &resources).unwrap();

    assert_eq!(report.results.len(), report.summary.active_features);
    let mut seen_insufficient = false;
    for result in &report.results {
        assert!(result.n <= report.summary.examples_analysed);
        match result.outcome {
            Outcome::Computed {
                coefficient,
                p_value,
                corrected_p_value,
            } => {
                assert!(!seen_insufficient, "computed result after an insufficient one");
                assert!((-1.0..=1.0).contains(&coefficient));
                assert!(corrected_p_value >= p_value);
                assert!(corrected_p_value <= 1.0);
            }
            Outcome::Insufficient { .. } => seen_insufficient = true,
        }
    }

    // Levin features only see the two verb swaps.
    let levin = report
        .results
        .iter()
        .find(|r| r.feature == "levin:13.1")
        .unwrap();
    assert_eq!(levin.n, 2);
    assert_eq!(
        levin.outcome,
        Outcome::Insufficient {
            reason: InsufficientReason::TooFewPairs { required: 3 }
        }
    );
}

#[test]
fn test_missing_values_only_reduce_sample_size() {
    let rows = "\
0,a man rides a horse,a man rides a dog,\"man,ride,horse\",\"man,ride,dog\",o,pos,0.9
1,a man rides a cat,a man rides a dog,\"man,ride,cat\",\"man,ride,dog\",o,neg,0.1
2,a man rides a cow,a man rides a dog,\"man,ride,cow\",\"man,ride,dog\",o,pos,0.5
";
    let frequencies = [("horse".to_owned(), 10), ("cat".to_owned(), 1)]
        .into_iter()
        .collect::<FrequencyTable>();
    let resources = Resources::new().with_frequencies(frequencies);
    let mut config = RunConfiguration::new("three.csv");
    config.selection.remove = [
        "word_similarity",
        "text_similarity",
        "concreteness_*",
        "frequency_replacement",
        "frequency_change",
        "negation_type:*",
    ]
    .map(str::to_owned)
    .to_vec();

    let input = format!("{HEADER}{rows}");
    let report = pipeline::run_from_reader(&config, input.as_bytes(), &resources).unwrap();
    assert_eq!(report.summary.active_features, 1);
    let result = &report.results[0];
    assert_eq!(result.feature, "frequency_original");
    assert_eq!(result.n, 2);
    assert_eq!(
        result.outcome,
        Outcome::Insufficient {
            reason: InsufficientReason::TooFewPairs { required: 3 }
        }
    );
    let text = report.render(ReportFormat::Text).unwrap();
    assert!(text.contains("insufficient (n < 3)"));

    config.correlation.min_pairs = 2;
    let report = pipeline::run_from_reader(&config, input.as_bytes(), &resources).unwrap();
    assert!(matches!(
        report.results[0].outcome,
        Outcome::Computed { coefficient, .. } if (coefficient - 1.0).abs() < 1e-12
    ));
}

#[test]
fn test_unknown_removed_feature_is_fatal() {
    let mut config = RunConfiguration::new("benchmark.csv");
    config.selection.remove = vec!["wordsimilarity".to_owned()];
    let err = pipeline::run_from_reader(&config, benchmark().as_bytes(), &resources()).unwrap_err();
    assert!(matches!(
        err,
        RunError::Registry(RegistryError::UnknownFeature { ref id }) if id == "wordsimilarity"
    ));
}

#[test]
fn test_empty_dependent_column_fails_before_extraction() {
    let rows = "\
0,a man rides a horse,a man rides a dog,\"man,ride,horse\",\"man,ride,dog\",o,pos,
1,a man rides a cat,a man rides a dog,\"man,ride,cat\",\"man,ride,dog\",o,neg,
";
    let config = RunConfiguration::new("empty.csv");
    let err = pipeline::run_from_reader(&config, format!("{HEADER}{rows}").as_bytes(), &resources())
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::Dataset(DatasetError::EmptyDependentVariable { .. })
    ));
}

#[test]
fn test_missing_dependent_column() {
    let mut config = RunConfiguration::new("benchmark.csv");
    config.schema.dependent = "siglip_score_diff".to_owned();
    let err = pipeline::run_from_reader(&config, benchmark().as_bytes(), &resources()).unwrap_err();
    assert!(matches!(
        err,
        RunError::Dataset(DatasetError::MissingColumn { ref column })
            if column == "siglip_score_diff"
    ));
}

#[test]
fn test_label_as_dependent_variable() {
    let mut config = RunConfiguration::new("benchmark.csv");
    config.schema.dependent = "clip prediction".to_owned();
    let report = pipeline::run_from_reader(&config, benchmark().as_bytes(), &resources()).unwrap();
    let stats = report.summary.dependent.unwrap();
    assert_eq!(stats.count, 8);
    assert!((stats.min - 0.0).abs() < f64::EPSILON);
    assert!((stats.max - 1.0).abs() < f64::EPSILON);

    let dominance = report.dominance.as_ref().unwrap();
    let object_swaps = dominance
        .iter()
        .find(|d| d.feature == "negation_type:o")
        .unwrap();
    // object swaps: 3 of 5 positive examples, 1 of 3 negative ones
    assert!((object_swaps.positive_coverage - 0.6).abs() < 1e-12);
    assert!((object_swaps.negative_coverage - 1.0 / 3.0).abs() < 1e-12);
    assert!(dominance.iter().all(|d| !d.feature.starts_with("liwc:")));
    let text = report.render(ReportFormat::Text).unwrap();
    assert!(text.contains("Dominance scores of binary features"));
}

#[test]
fn test_no_dominance_for_continuous_dependent_variable() {
    let config = RunConfiguration::new("benchmark.csv");
    let report = pipeline::run_from_reader(&config, benchmark().as_bytes(), &resources()).unwrap();
    assert_eq!(report.dominance, None);
    assert!(!report.render(ReportFormat::Text).unwrap().contains("Dominance"));
}
