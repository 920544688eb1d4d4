use std::{collections::BTreeSet, fmt, sync::Arc};

use serde::Serialize;

use crate::taxonomy::{Taxonomy, TaxonomyMetric, TaxonomySimilarity};

/// External resource a feature depends on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    #[display("embeddings")]
    Embeddings,
    #[display("taxonomy")]
    Taxonomy,
    #[display("frequencies")]
    Frequencies,
    #[display("concreteness")]
    Concreteness,
    #[display("liwc")]
    Liwc,
    #[display("levin")]
    Levin,
}

impl ResourceKind {
    pub const ALL: [Self; 6] = [
        Self::Embeddings,
        Self::Taxonomy,
        Self::Frequencies,
        Self::Concreteness,
        Self::Liwc,
        Self::Levin,
    ];
}

/// Coarse part of speech used to pick the hypernym graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PartOfSpeech {
    #[display("n")]
    Noun,
    #[display("v")]
    Verb,
}

/// Word-to-word similarity metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityKind {
    /// Cosine similarity of word embeddings.
    Embedding,
    /// Wu-Palmer similarity in the hypernym graph.
    WuPalmer,
    /// Inverse shortest-path similarity in the hypernym graph.
    Path,
}

/// Category lexicon slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexiconKind {
    /// LIWC psycholinguistic word categories.
    Liwc,
    /// Levin verb classes.
    Levin,
}

pub trait WordSimilarity: Send + Sync {
    fn word_similarity(&self, a: &str, b: &str, pos: PartOfSpeech) -> Option<f64>;
}

pub trait TextSimilarity: Send + Sync {
    fn text_similarity(&self, a: &str, b: &str) -> Option<f64>;
}

pub trait WordFrequency: Send + Sync {
    fn frequency(&self, word: &str) -> Option<u64>;
}

pub trait WordRating: Send + Sync {
    fn rating(&self, word: &str) -> Option<f64>;
}

pub trait CategoryLexicon: Send + Sync {
    /// Categories the word belongs to (empty if it belongs to none).
    fn categories(&self, word: &str) -> BTreeSet<String>;

    /// Every category the lexicon can return, sorted.
    fn all_categories(&self) -> Vec<String>;
}

/// Loaded lexical resources, one optional slot per resource.
///
/// An empty slot answers every query with `None`. The bundle is cheap to clone
/// and can be shared by several analysis runs.
#[derive(Clone, Default)]
pub struct Resources {
    embedding: Option<Arc<dyn WordSimilarity>>,
    text: Option<Arc<dyn TextSimilarity>>,
    wu_palmer: Option<Arc<dyn WordSimilarity>>,
    path: Option<Arc<dyn WordSimilarity>>,
    frequencies: Option<Arc<dyn WordFrequency>>,
    concreteness: Option<Arc<dyn WordRating>>,
    liwc: Option<Arc<dyn CategoryLexicon>>,
    levin: Option<Arc<dyn CategoryLexicon>>,
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("available", &self.available())
            .finish()
    }
}

impl Resources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs word embeddings for both word and sentence similarity.
    #[must_use]
    pub fn with_embeddings<T>(mut self, embeddings: T) -> Self
    where
        T: WordSimilarity + TextSimilarity + 'static,
    {
        let embeddings = Arc::new(embeddings);
        self.embedding = Some(embeddings.clone());
        self.text = Some(embeddings);
        self
    }

    /// Installs a hypernym graph for Wu-Palmer and path similarity.
    #[must_use]
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        let taxonomy = Arc::new(taxonomy);
        self.wu_palmer = Some(Arc::new(TaxonomySimilarity::new(
            taxonomy.clone(),
            TaxonomyMetric::WuPalmer,
        )));
        self.path = Some(Arc::new(TaxonomySimilarity::new(
            taxonomy,
            TaxonomyMetric::Path,
        )));
        self
    }

    /// Installs a single word-similarity metric.
    #[must_use]
    pub fn with_word_similarity<T>(mut self, kind: SimilarityKind, similarity: T) -> Self
    where
        T: WordSimilarity + 'static,
    {
        let similarity: Arc<dyn WordSimilarity> = Arc::new(similarity);
        match kind {
            SimilarityKind::Embedding => self.embedding = Some(similarity),
            SimilarityKind::WuPalmer => self.wu_palmer = Some(similarity),
            SimilarityKind::Path => self.path = Some(similarity),
        }
        self
    }

    #[must_use]
    pub fn with_text_similarity<T>(mut self, similarity: T) -> Self
    where
        T: TextSimilarity + 'static,
    {
        self.text = Some(Arc::new(similarity));
        self
    }

    #[must_use]
    pub fn with_frequencies<T>(mut self, frequencies: T) -> Self
    where
        T: WordFrequency + 'static,
    {
        self.frequencies = Some(Arc::new(frequencies));
        self
    }

    #[must_use]
    pub fn with_concreteness<T>(mut self, ratings: T) -> Self
    where
        T: WordRating + 'static,
    {
        self.concreteness = Some(Arc::new(ratings));
        self
    }

    #[must_use]
    pub fn with_lexicon<T>(mut self, kind: LexiconKind, lexicon: T) -> Self
    where
        T: CategoryLexicon + 'static,
    {
        let lexicon: Arc<dyn CategoryLexicon> = Arc::new(lexicon);
        match kind {
            LexiconKind::Liwc => self.liwc = Some(lexicon),
            LexiconKind::Levin => self.levin = Some(lexicon),
        }
        self
    }

    #[must_use]
    pub fn is_available(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Embeddings => self.embedding.is_some() || self.text.is_some(),
            ResourceKind::Taxonomy => self.wu_palmer.is_some() || self.path.is_some(),
            ResourceKind::Frequencies => self.frequencies.is_some(),
            ResourceKind::Concreteness => self.concreteness.is_some(),
            ResourceKind::Liwc => self.liwc.is_some(),
            ResourceKind::Levin => self.levin.is_some(),
        }
    }

    /// Resources with a loaded slot, in [`ResourceKind::ALL`] order.
    #[must_use]
    pub fn available(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|kind| self.is_available(*kind))
            .collect()
    }

    #[must_use]
    pub fn word_similarity(
        &self,
        kind: SimilarityKind,
        a: &str,
        b: &str,
        pos: PartOfSpeech,
    ) -> Option<f64> {
        let slot = match kind {
            SimilarityKind::Embedding => &self.embedding,
            SimilarityKind::WuPalmer => &self.wu_palmer,
            SimilarityKind::Path => &self.path,
        };
        slot.as_ref()?.word_similarity(a, b, pos)
    }

    #[must_use]
    pub fn text_similarity(&self, a: &str, b: &str) -> Option<f64> {
        self.text.as_ref()?.text_similarity(a, b)
    }

    #[must_use]
    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.frequencies.as_ref()?.frequency(word)
    }

    #[must_use]
    pub fn concreteness(&self, word: &str) -> Option<f64> {
        self.concreteness.as_ref()?.rating(word)
    }

    /// Categories of `word`, or `None` when the lexicon is not loaded.
    #[must_use]
    pub fn categories(&self, kind: LexiconKind, word: &str) -> Option<BTreeSet<String>> {
        Some(self.lexicon(kind)?.categories(word))
    }

    /// All categories of a lexicon (empty when it is not loaded).
    #[must_use]
    pub fn lexicon_categories(&self, kind: LexiconKind) -> Vec<String> {
        self.lexicon(kind)
            .map(|lexicon| lexicon.all_categories())
            .unwrap_or_default()
    }

    fn lexicon(&self, kind: LexiconKind) -> Option<&Arc<dyn CategoryLexicon>> {
        match kind {
            LexiconKind::Liwc => self.liwc.as_ref(),
            LexiconKind::Levin => self.levin.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstantSimilarity(f64);

    impl WordSimilarity for ConstantSimilarity {
        fn word_similarity(&self, _a: &str, _b: &str, _pos: PartOfSpeech) -> Option<f64> {
            Some(self.0)
        }
    }

    #[test]
    fn test_empty_resources_answer_none() {
        let resources = Resources::new();
        assert!(resources.available().is_empty());
        assert_eq!(
            resources.word_similarity(SimilarityKind::Embedding, "a", "b", PartOfSpeech::Noun),
            None
        );
        assert_eq!(resources.text_similarity("a b", "c d"), None);
        assert_eq!(resources.concreteness("a"), None);
        assert!(resources.lexicon_categories(LexiconKind::Levin).is_empty());
    }

    #[test]
    fn test_single_metric_slot() {
        let resources =
            Resources::new().with_word_similarity(SimilarityKind::Path, ConstantSimilarity(0.25));
        assert_eq!(resources.available(), vec![ResourceKind::Taxonomy]);
        assert_eq!(
            resources.word_similarity(SimilarityKind::Path, "a", "b", PartOfSpeech::Verb),
            Some(0.25)
        );
        assert_eq!(
            resources.word_similarity(SimilarityKind::WuPalmer, "a", "b", PartOfSpeech::Verb),
            None
        );
    }
}
