//! Word-keyed lookup tables: corpus frequencies and rating norms.

use std::{collections::HashMap, io::BufRead, path::Path};

use crate::{LoadError, WordFrequency, WordRating};

/// Precomputed corpus counts (`word<whitespace>count` per line).
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(crate::open(path.as_ref())?)
    }

    /// Parses counts. Empty lines and lines starting with `#` are ignored; a
    /// word listed twice keeps the sum of its counts.
    pub fn from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: BufRead,
    {
        let mut counts = HashMap::<String, u64>::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(LoadError::Read)?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let (Some(word), Some(count), None) = (tokens.next(), tokens.next(), tokens.next())
            else {
                return Err(LoadError::malformed(idx + 1, "expected 'word count'"));
            };
            let count = count
                .parse::<u64>()
                .map_err(|e| LoadError::malformed(idx + 1, format!("invalid count: {e}")))?;
            *counts.entry(word.to_owned()).or_default() += count;
        }
        tracing::debug!(words = counts.len(), "loaded frequency table");
        Ok(Self { counts })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

impl WordFrequency for FrequencyTable {
    fn frequency(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }
}

/// Per-word rating norms such as concreteness.
///
/// The file is tab-separated with one header line; the word is in the first
/// column and the mean rating in the third (`Word  Bigram  Conc.M  ...`).
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    ratings: HashMap<String, f64>,
}

impl RatingTable {
    const WORD_COLUMN: usize = 0;
    const RATING_COLUMN: usize = 2;

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(crate::open(path.as_ref())?)
    }

    pub fn from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: BufRead,
    {
        let mut ratings = HashMap::new();
        for (idx, line) in reader.lines().enumerate().skip(1) {
            let line = line.map_err(LoadError::Read)?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = line.split('\t').collect::<Vec<_>>();
            let (Some(word), Some(rating)) = (
                fields.get(Self::WORD_COLUMN),
                fields.get(Self::RATING_COLUMN),
            ) else {
                return Err(LoadError::malformed(
                    idx + 1,
                    format!("expected at least 3 tab-separated fields, found {}", fields.len()),
                ));
            };
            let rating = rating
                .trim()
                .parse::<f64>()
                .map_err(|e| LoadError::malformed(idx + 1, format!("invalid rating: {e}")))?;
            ratings.insert(word.trim().to_owned(), rating);
        }
        tracing::debug!(words = ratings.len(), "loaded rating table");
        Ok(Self { ratings })
    }
}

impl FromIterator<(String, f64)> for RatingTable {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            ratings: iter.into_iter().collect(),
        }
    }
}

impl WordRating for RatingTable {
    fn rating(&self, word: &str) -> Option<f64> {
        self.ratings.get(word).copied()
    }
}
