//! Benchmark examples: an image-sentence pair with its negative variant.

use std::{collections::BTreeMap, fmt};

use lexiprobe_lexicon::PartOfSpeech;
use serde::Serialize;

/// Which element of the triplet the negative sentence swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NegationType {
    Subject,
    Verb,
    Object,
}

impl NegationType {
    pub const ALL: [Self; 3] = [Self::Subject, Self::Verb, Self::Object];

    /// Parses the leading `s`, `v` or `o` of a negation-type cell.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().chars().next()? {
            's' => Some(Self::Subject),
            'v' => Some(Self::Verb),
            'o' => Some(Self::Object),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Subject => 's',
            Self::Verb => 'v',
            Self::Object => 'o',
        }
    }

    /// Part of speech of the swapped word.
    #[must_use]
    pub fn part_of_speech(self) -> PartOfSpeech {
        match self {
            Self::Verb => PartOfSpeech::Verb,
            Self::Subject | Self::Object => PartOfSpeech::Noun,
        }
    }
}

/// A (subject, verb, object) word combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Triplet {
    pub subject: String,
    pub verb: String,
    pub object: String,
}

impl Triplet {
    #[must_use]
    pub fn new(subject: &str, verb: &str, object: &str) -> Self {
        Self {
            subject: subject.to_owned(),
            verb: verb.to_owned(),
            object: object.to_owned(),
        }
    }

    #[must_use]
    pub fn get(&self, slot: NegationType) -> &str {
        match slot {
            NegationType::Subject => &self.subject,
            NegationType::Verb => &self.verb,
            NegationType::Object => &self.object,
        }
    }

    #[must_use]
    pub fn words(&self) -> [&str; 3] {
        [&self.subject, &self.verb, &self.object]
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.subject, self.verb, self.object)
    }
}

/// One row of the input table.
#[derive(Debug, Clone)]
pub struct Example {
    /// Zero-based data row number in the input table.
    pub row: usize,
    pub sentence: String,
    pub negative_sentence: String,
    pub positive: Triplet,
    pub negative: Triplet,
    pub negation: NegationType,
    /// Dependent-variable value (model score or score difference).
    pub dependent: f64,
}

/// The word replaced by the negative example and its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwappedWords<'a> {
    pub original: &'a str,
    pub replacement: &'a str,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("row {row}: empty {side} word for a {negation:?} swap")]
pub struct MalformedExample {
    pub row: usize,
    pub side: &'static str,
    pub negation: NegationType,
}

impl Example {
    /// Returns the swapped word pair selected by the negation type.
    pub fn swapped_words(&self) -> Result<SwappedWords<'_>, MalformedExample> {
        let original = self.positive.get(self.negation).trim();
        let replacement = self.negative.get(self.negation).trim();
        let malformed = |side| MalformedExample {
            row: self.row,
            side,
            negation: self.negation,
        };
        if original.is_empty() {
            return Err(malformed("original"));
        }
        if replacement.is_empty() {
            return Err(malformed("replacement"));
        }
        Ok(SwappedWords {
            original,
            replacement,
        })
    }
}

/// Why an input row did not become an analysed example.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[display("empty sentence")]
    EmptySentence,
    #[display("empty triplet")]
    EmptyTriplet,
    #[display("malformed triplet")]
    MalformedTriplet,
    #[display("unknown negation type")]
    UnknownNegationType,
    #[display("missing dependent value")]
    MissingDependent,
    #[display("empty swapped word")]
    EmptySwappedWord,
}

/// Number of skipped rows per reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkipCounts(BTreeMap<SkipReason, usize>);

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        *self.0.entry(reason).or_default() += 1;
    }

    pub fn merge(&mut self, other: &SkipCounts) {
        for (reason, count) in &other.0 {
            *self.0.entry(*reason).or_default() += count;
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    #[must_use]
    pub fn get(&self, reason: SkipReason) -> usize {
        self.0.get(&reason).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkipReason, usize)> + '_ {
        self.0.iter().map(|(reason, count)| (*reason, *count))
    }
}

#[cfg(test)]
pub(crate) fn example(
    row: usize,
    positive: [&str; 3],
    negative: [&str; 3],
    negation: NegationType,
    dependent: f64,
) -> Example {
    let [ps, pv, po] = positive;
    let [ns, nv, no] = negative;
    Example {
        row,
        sentence: format!("{ps} {pv} {po}"),
        negative_sentence: format!("{ns} {nv} {no}"),
        positive: Triplet::new(ps, pv, po),
        negative: Triplet::new(ns, nv, no),
        negation,
        dependent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation_codes() {
        assert_eq!(NegationType::from_code("s"), Some(NegationType::Subject));
        assert_eq!(NegationType::from_code("verb"), Some(NegationType::Verb));
        assert_eq!(NegationType::from_code(" o,s"), Some(NegationType::Object));
        assert_eq!(NegationType::from_code("x"), None);
        assert_eq!(NegationType::from_code(""), None);
    }

    #[test]
    fn test_swapped_words() {
        let ex = example(
            0,
            ["man", "ride", "horse"],
            ["man", "feed", "horse"],
            NegationType::Verb,
            0.3,
        );
        let words = ex.swapped_words().unwrap();
        assert_eq!(words.original, "ride");
        assert_eq!(words.replacement, "feed");
    }

    #[test]
    fn test_empty_swapped_word() {
        let ex = example(
            4,
            ["man", "ride", "horse"],
            ["man", "ride", " "],
            NegationType::Object,
            0.3,
        );
        let err = ex.swapped_words().unwrap_err();
        assert_eq!(err.row, 4);
        assert_eq!(err.side, "replacement");
    }

    #[test]
    fn test_skip_counts() {
        let mut counts = SkipCounts::default();
        counts.record(SkipReason::EmptySentence);
        counts.record(SkipReason::EmptySentence);
        let mut other = SkipCounts::default();
        other.record(SkipReason::MissingDependent);
        counts.merge(&other);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts.get(SkipReason::EmptySentence), 2);
        assert_eq!(counts.get(SkipReason::EmptyTriplet), 0);
    }
}
