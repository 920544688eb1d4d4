//! Concrete feature definitions.
//!
//! Each type implements [`Feature`] and documents the value it produces.

use lexiprobe_lexicon::{LexiconKind, ResourceKind, Resources, SimilarityKind};
use lexiprobe_stats::correlation::AssociationMeasure;

use super::{BoxedFeature, Feature};
use crate::example::{Example, NegationType, SwappedWords};

/// The full catalog of features, in declaration order.
///
/// Category features are generated from the categories of the loaded LIWC
/// dictionary and Levin classes, in sorted category order.
#[must_use]
pub fn standard_features(resources: &Resources) -> Vec<BoxedFeature> {
    let mut features: Vec<BoxedFeature> = vec![
        // similarity features
        Box::new(WordSimilarityFeature::new(SimilarityKind::Embedding)),
        Box::new(TextSimilarityFeature),
        Box::new(WordSimilarityFeature::new(SimilarityKind::WuPalmer)),
        Box::new(WordSimilarityFeature::new(SimilarityKind::Path)),
        // word norm features
        Box::new(ConcretenessFeature::new(WordSide::Original)),
        Box::new(ConcretenessFeature::new(WordSide::Replacement)),
        Box::new(ConcretenessFeature::new(WordSide::Change)),
        Box::new(FrequencyFeature::new(WordSide::Original)),
        Box::new(FrequencyFeature::new(WordSide::Replacement)),
        Box::new(FrequencyFeature::new(WordSide::Change)),
    ];
    // structure features
    features.extend(
        NegationType::ALL
            .into_iter()
            .map(|negation| Box::new(NegationTypeFeature::new(negation)) as BoxedFeature),
    );
    // category features
    for lexicon in [LexiconKind::Liwc, LexiconKind::Levin] {
        features.extend(
            resources
                .lexicon_categories(lexicon)
                .into_iter()
                .map(|category| {
                    Box::new(CategoryChangeFeature::new(lexicon, &category)) as BoxedFeature
                }),
        );
    }
    features.push(Box::new(CategoryCountChangeFeature::new(LexiconKind::Liwc)));
    features
}

/// Which swapped word a per-word feature describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSide {
    Original,
    Replacement,
    /// `value(original) - value(replacement)`
    Change,
}

impl WordSide {
    fn suffix(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Replacement => "replacement",
            Self::Change => "change",
        }
    }

    fn apply<F>(self, words: SwappedWords<'_>, value: F) -> Option<f64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        match self {
            Self::Original => value(words.original),
            Self::Replacement => value(words.replacement),
            Self::Change => Some(value(words.original)? - value(words.replacement)?),
        }
    }
}

/// Similarity between the original and the replacement word.
///
/// # Value
///
/// - `word_similarity`: cosine similarity of the word embeddings
/// - `wup_similarity`: Wu-Palmer similarity in the hypernym graph
/// - `path_similarity`: inverse shortest-path similarity in the hypernym graph
///
/// The hypernym graph is chosen by the part of speech of the swapped slot
/// (verb for verb swaps, noun otherwise). The taxonomy metrics are disabled
/// by default: they are slow on large graphs and largely redundant with the
/// embedding similarity.
#[derive(Debug, Clone)]
pub struct WordSimilarityFeature {
    kind: SimilarityKind,
}

impl WordSimilarityFeature {
    #[must_use]
    pub fn new(kind: SimilarityKind) -> Self {
        Self { kind }
    }
}

impl Feature for WordSimilarityFeature {
    fn id(&self) -> &str {
        match self.kind {
            SimilarityKind::Embedding => "word_similarity",
            SimilarityKind::WuPalmer => "wup_similarity",
            SimilarityKind::Path => "path_similarity",
        }
    }

    fn name(&self) -> &str {
        match self.kind {
            SimilarityKind::Embedding => "Word Embedding Similarity",
            SimilarityKind::WuPalmer => "Wu-Palmer Similarity",
            SimilarityKind::Path => "Path Similarity",
        }
    }

    fn measure(&self) -> AssociationMeasure {
        match self.kind {
            SimilarityKind::Embedding => AssociationMeasure::Pearson,
            SimilarityKind::WuPalmer | SimilarityKind::Path => AssociationMeasure::Spearman,
        }
    }

    fn resource(&self) -> Option<ResourceKind> {
        match self.kind {
            SimilarityKind::Embedding => Some(ResourceKind::Embeddings),
            SimilarityKind::WuPalmer | SimilarityKind::Path => Some(ResourceKind::Taxonomy),
        }
    }

    fn default_enabled(&self) -> bool {
        self.kind == SimilarityKind::Embedding
    }

    fn clone_boxed(&self) -> BoxedFeature {
        Box::new(self.clone())
    }

    fn compute(
        &self,
        example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64> {
        resources.word_similarity(
            self.kind,
            words.original,
            words.replacement,
            example.negation.part_of_speech(),
        )
    }
}

/// Similarity between the positive and the negative sentence.
///
/// # Value
///
/// Cosine similarity of the mean embedding of each sentence's known tokens.
/// Missing when either sentence has no token in the vocabulary.
#[derive(Debug, Clone)]
pub struct TextSimilarityFeature;

impl Feature for TextSimilarityFeature {
    fn id(&self) -> &str {
        "text_similarity"
    }
    fn name(&self) -> &str {
        "Sentence Similarity"
    }
    fn measure(&self) -> AssociationMeasure {
        AssociationMeasure::Pearson
    }
    fn resource(&self) -> Option<ResourceKind> {
        Some(ResourceKind::Embeddings)
    }
    fn clone_boxed(&self) -> BoxedFeature {
        Box::new(self.clone())
    }
    fn compute(
        &self,
        example: &Example,
        _words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64> {
        resources.text_similarity(&example.sentence, &example.negative_sentence)
    }
}

/// Concreteness rating of the swapped words.
///
/// # Value
///
/// The mean concreteness rating (1 = abstract, 5 = concrete) of the original
/// word, of the replacement word, or their difference.
#[derive(Debug, Clone)]
pub struct ConcretenessFeature {
    side: WordSide,
    id: String,
    name: String,
}

impl ConcretenessFeature {
    #[must_use]
    pub fn new(side: WordSide) -> Self {
        Self {
            side,
            id: format!("concreteness_{}", side.suffix()),
            name: format!("Concreteness ({})", side.suffix()),
        }
    }
}

impl Feature for ConcretenessFeature {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn measure(&self) -> AssociationMeasure {
        AssociationMeasure::Pearson
    }
    fn resource(&self) -> Option<ResourceKind> {
        Some(ResourceKind::Concreteness)
    }
    fn clone_boxed(&self) -> BoxedFeature {
        Box::new(self.clone())
    }
    fn compute(
        &self,
        _example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64> {
        self.side.apply(words, |word| resources.concreteness(word))
    }
}

/// Corpus frequency of the swapped words.
///
/// # Value
///
/// `log10(count)` of the original or replacement word, or the log ratio
/// `log10(count(original) / count(replacement))`. A word absent from the
/// frequency table, or with a zero count, is missing.
#[derive(Debug, Clone)]
pub struct FrequencyFeature {
    side: WordSide,
    id: String,
    name: String,
}

impl FrequencyFeature {
    #[must_use]
    pub fn new(side: WordSide) -> Self {
        Self {
            side,
            id: format!("frequency_{}", side.suffix()),
            name: format!("Log Frequency ({})", side.suffix()),
        }
    }
}

impl Feature for FrequencyFeature {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn measure(&self) -> AssociationMeasure {
        AssociationMeasure::Spearman
    }
    fn resource(&self) -> Option<ResourceKind> {
        Some(ResourceKind::Frequencies)
    }
    fn clone_boxed(&self) -> BoxedFeature {
        Box::new(self.clone())
    }
    #[expect(clippy::cast_precision_loss)]
    fn compute(
        &self,
        _example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64> {
        self.side.apply(words, |word| {
            let count = resources.frequency(word).filter(|c| *c > 0)?;
            Some((count as f64).log10())
        })
    }
}

/// Indicator of the swapped triplet slot.
///
/// # Value
///
/// `1.0` if the example swaps this slot (subject, verb or object), else `0.0`.
#[derive(Debug, Clone)]
pub struct NegationTypeFeature {
    negation: NegationType,
    id: String,
    name: String,
}

impl NegationTypeFeature {
    #[must_use]
    pub fn new(negation: NegationType) -> Self {
        Self {
            negation,
            id: format!("negation_type:{}", negation.code()),
            name: format!("Negation Type ({negation:?})"),
        }
    }
}

impl Feature for NegationTypeFeature {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn measure(&self) -> AssociationMeasure {
        AssociationMeasure::Pearson
    }
    fn resource(&self) -> Option<ResourceKind> {
        None
    }
    fn clone_boxed(&self) -> BoxedFeature {
        Box::new(self.clone())
    }
    fn compute(
        &self,
        example: &Example,
        _words: SwappedWords<'_>,
        _resources: &Resources,
    ) -> Option<f64> {
        Some(if example.negation == self.negation { 1.0 } else { 0.0 })
    }
}

fn lexicon_prefix(lexicon: LexiconKind) -> &'static str {
    match lexicon {
        LexiconKind::Liwc => "liwc",
        LexiconKind::Levin => "levin",
    }
}

fn lexicon_resource(lexicon: LexiconKind) -> ResourceKind {
    match lexicon {
        LexiconKind::Liwc => ResourceKind::Liwc,
        LexiconKind::Levin => ResourceKind::Levin,
    }
}

/// Whether the lexicon can describe the swapped word of this example.
///
/// Levin classes only cover verbs, so they are undefined for noun swaps.
fn lexicon_applies(lexicon: LexiconKind, example: &Example) -> bool {
    match lexicon {
        LexiconKind::Liwc => true,
        LexiconKind::Levin => example.negation == NegationType::Verb,
    }
}

/// Change in membership of a single category.
///
/// # Value
///
/// `member(original) - member(replacement)` where `member` is 1 if the word is
/// in the category: `1.0` when the swap leaves the category, `-1.0` when it
/// enters it, `0.0` otherwise. Levin features are missing for noun swaps.
#[derive(Debug, Clone)]
pub struct CategoryChangeFeature {
    lexicon: LexiconKind,
    category: String,
    id: String,
    name: String,
}

impl CategoryChangeFeature {
    #[must_use]
    pub fn new(lexicon: LexiconKind, category: &str) -> Self {
        let prefix = lexicon_prefix(lexicon);
        Self {
            lexicon,
            category: category.to_owned(),
            id: format!("{prefix}:{category}"),
            name: format!("{} category change: {category}", prefix.to_uppercase()),
        }
    }
}

impl Feature for CategoryChangeFeature {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn measure(&self) -> AssociationMeasure {
        AssociationMeasure::Spearman
    }
    fn resource(&self) -> Option<ResourceKind> {
        Some(lexicon_resource(self.lexicon))
    }
    fn clone_boxed(&self) -> BoxedFeature {
        Box::new(self.clone())
    }
    fn compute(
        &self,
        example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64> {
        if !lexicon_applies(self.lexicon, example) {
            return None;
        }
        let member = |word: &str| {
            let categories = resources.categories(self.lexicon, word)?;
            Some(if categories.contains(&self.category) { 1.0 } else { 0.0 })
        };
        Some(member(words.original)? - member(words.replacement)?)
    }
}

/// Change in the number of categories of the swapped word.
///
/// # Value
///
/// `|categories(original)| - |categories(replacement)|`. Disabled by default:
/// it summarises the per-category features and is redundant with them.
#[derive(Debug, Clone)]
pub struct CategoryCountChangeFeature {
    lexicon: LexiconKind,
    id: String,
    name: String,
}

impl CategoryCountChangeFeature {
    #[must_use]
    pub fn new(lexicon: LexiconKind) -> Self {
        let prefix = lexicon_prefix(lexicon);
        Self {
            lexicon,
            id: format!("{prefix}_count_change"),
            name: format!("{} category count change", prefix.to_uppercase()),
        }
    }
}

impl Feature for CategoryCountChangeFeature {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn measure(&self) -> AssociationMeasure {
        AssociationMeasure::Spearman
    }
    fn resource(&self) -> Option<ResourceKind> {
        Some(lexicon_resource(self.lexicon))
    }
    fn default_enabled(&self) -> bool {
        false
    }
    fn clone_boxed(&self) -> BoxedFeature {
        Box::new(self.clone())
    }
    #[expect(clippy::cast_precision_loss)]
    fn compute(
        &self,
        example: &Example,
        words: SwappedWords<'_>,
        resources: &Resources,
    ) -> Option<f64> {
        if !lexicon_applies(self.lexicon, example) {
            return None;
        }
        let original = resources.categories(self.lexicon, words.original)?.len();
        let replacement = resources.categories(self.lexicon, words.replacement)?.len();
        Some(original as f64 - replacement as f64)
    }
}
