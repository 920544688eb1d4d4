//! Word vectors with cosine similarity.
//!
//! The text format is one word per line followed by its components, separated
//! by whitespace (`word 0.1 -0.3 ...`). A leading `count dimension` header line,
//! as written by word2vec tools, is skipped.

use std::{collections::HashMap, io::BufRead, path::Path};

use crate::{LoadError, PartOfSpeech, TextSimilarity, WordSimilarity};

#[derive(Debug, Clone, Default)]
pub struct EmbeddingTable {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl EmbeddingTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(crate::open(path.as_ref())?)
    }

    pub fn from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: BufRead,
    {
        let mut table = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(LoadError::Read)?;
            let mut tokens = line.split_whitespace();
            let Some(word) = tokens.next() else {
                continue;
            };
            let rest = tokens.collect::<Vec<_>>();
            if idx == 0 && is_word2vec_header(word, &rest) {
                continue;
            }
            let vector = rest
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| LoadError::malformed(idx + 1, format!("invalid component: {e}")))?;
            table
                .insert(word, vector)
                .map_err(|message| LoadError::malformed(idx + 1, message))?;
        }
        tracing::debug!(
            words = table.vectors.len(),
            dimension = table.dimension,
            "loaded embeddings"
        );
        Ok(table)
    }

    /// Adds a vector; every vector must have the dimension of the first one.
    pub fn insert(&mut self, word: &str, vector: Vec<f32>) -> Result<(), String> {
        if vector.is_empty() {
            return Err(format!("empty vector for '{word}'"));
        }
        if self.vectors.is_empty() {
            self.dimension = vector.len();
        } else if vector.len() != self.dimension {
            return Err(format!(
                "vector for '{word}' has dimension {}, expected {}",
                vector.len(),
                self.dimension
            ));
        }
        self.vectors.insert(word.to_owned(), vector);
        Ok(())
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    /// Mean vector of the known whitespace-separated tokens of `text`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_vector(&self, text: &str) -> Option<Vec<f64>> {
        let mut sum = vec![0.0; self.dimension];
        let mut count = 0_usize;
        for vector in text.split_whitespace().filter_map(|token| self.get(token)) {
            for (acc, v) in sum.iter_mut().zip(vector) {
                *acc += f64::from(*v);
            }
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(sum.into_iter().map(|v| v / n).collect())
    }
}

impl WordSimilarity for EmbeddingTable {
    fn word_similarity(&self, a: &str, b: &str, _pos: PartOfSpeech) -> Option<f64> {
        let a = self.get(a)?.iter().map(|v| f64::from(*v));
        let b = self.get(b)?.iter().map(|v| f64::from(*v));
        cosine(a, b)
    }
}

impl TextSimilarity for EmbeddingTable {
    fn text_similarity(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.mean_vector(a)?;
        let b = self.mean_vector(b)?;
        cosine(a, b)
    }
}

fn is_word2vec_header(first: &str, rest: &[&str]) -> bool {
    rest.len() == 1 && first.parse::<usize>().is_ok() && rest[0].parse::<usize>().is_ok()
}

/// Cosine similarity, undefined when either vector has zero norm.
fn cosine<A, B>(a: A, b: B) -> Option<f64>
where
    A: IntoIterator<Item = f64>,
    B: IntoIterator<Item = f64>,
{
    let (mut dot, mut norm_a, mut norm_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.into_iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= 0.0 || norm_b <= 0.0 {
        return None;
    }
    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const VECTORS: &str = "\
4 2
dog 1.0 0.0
puppy 0.8 0.6
cat 0.0 1.0
void 0.0 0.0
";

    fn table() -> EmbeddingTable {
        EmbeddingTable::from_reader(VECTORS.as_bytes()).unwrap()
    }

    #[test]
    fn test_word_similarity() {
        let table = table();
        assert_eq!(table.dimension(), 2);
        let sim = table.word_similarity("dog", "puppy", PartOfSpeech::Noun).unwrap();
        assert_relative_eq!(sim, 0.8, epsilon = 1e-6);
        assert_relative_eq!(
            table.word_similarity("dog", "cat", PartOfSpeech::Noun).unwrap(),
            0.0
        );
        assert_eq!(table.word_similarity("dog", "zebra", PartOfSpeech::Noun), None);
        assert_eq!(table.word_similarity("dog", "void", PartOfSpeech::Noun), None);
    }

    #[test]
    fn test_text_similarity_ignores_unknown_tokens() {
        let table = table();
        let sim = table.text_similarity("a dog runs", "the dog sleeps").unwrap();
        assert_relative_eq!(sim, 1.0, epsilon = 1e-9);
        assert_eq!(table.text_similarity("nothing known", "dog"), None);
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let err = EmbeddingTable::from_reader("a 1 2\nb 1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 2, .. }));
    }
}
