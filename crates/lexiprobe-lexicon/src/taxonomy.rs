//! Hypernym graph with taxonomy-based similarity metrics.
//!
//! The graph is loaded from tab-separated `pos<TAB>child<TAB>parent` edges,
//! where `pos` is `n` or `v`. A node may have several parents. Nodes without
//! parents are roots and have depth 1.
//!
//! # Metrics
//!
//! For two words `a` and `b` with a common ancestor `c`:
//!
//! - Wu-Palmer: `2 * depth(c) / (dist(a, c) + dist(b, c) + 2 * depth(c))`,
//!   maximised over common ancestors
//! - Path: `1 / (1 + dist(a, c) + dist(b, c))`, using the closest common ancestor
//!
//! Both are `1.0` for a word compared with itself and undefined (`None`) when
//! either word is absent or the words share no ancestor.

use std::{
    collections::{HashMap, VecDeque},
    io::BufRead,
    path::Path,
    sync::Arc,
};

use crate::{LoadError, PartOfSpeech, WordSimilarity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyMetric {
    WuPalmer,
    Path,
}

#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    nouns: HashMap<String, Vec<String>>,
    verbs: HashMap<String, Vec<String>>,
}

impl Taxonomy {
    /// Loads hypernym edges from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(crate::open(path.as_ref())?)
    }

    /// Parses hypernym edges. Empty lines and lines starting with `#` are ignored.
    pub fn from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: BufRead,
    {
        let mut taxonomy = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(LoadError::Read)?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields = line.split('\t').map(str::trim).collect::<Vec<_>>();
            let [pos, child, parent] = fields.as_slice() else {
                return Err(LoadError::malformed(
                    idx + 1,
                    format!("expected 3 tab-separated fields, found {}", fields.len()),
                ));
            };
            let pos = match *pos {
                "n" => PartOfSpeech::Noun,
                "v" => PartOfSpeech::Verb,
                other => {
                    return Err(LoadError::malformed(
                        idx + 1,
                        format!("unknown part of speech '{other}'"),
                    ));
                }
            };
            taxonomy.add_edge(pos, child, parent);
        }
        tracing::debug!(
            nouns = taxonomy.nouns.len(),
            verbs = taxonomy.verbs.len(),
            "loaded taxonomy"
        );
        Ok(taxonomy)
    }

    /// Adds a `child -> parent` hypernym edge.
    pub fn add_edge(&mut self, pos: PartOfSpeech, child: &str, parent: &str) {
        let graph = self.graph_mut(pos);
        graph.entry(parent.to_owned()).or_default();
        let parents = graph.entry(child.to_owned()).or_default();
        if !parents.iter().any(|p| p == parent) {
            parents.push(parent.to_owned());
        }
    }

    #[must_use]
    pub fn contains(&self, pos: PartOfSpeech, word: &str) -> bool {
        self.graph(pos).contains_key(word)
    }

    #[must_use]
    pub fn similarity(
        &self,
        metric: TaxonomyMetric,
        pos: PartOfSpeech,
        a: &str,
        b: &str,
    ) -> Option<f64> {
        match metric {
            TaxonomyMetric::WuPalmer => self.wu_palmer(pos, a, b),
            TaxonomyMetric::Path => self.path(pos, a, b),
        }
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn wu_palmer(&self, pos: PartOfSpeech, a: &str, b: &str) -> Option<f64> {
        let graph = self.graph(pos);
        let up_a = ancestors(graph, a)?;
        let up_b = ancestors(graph, b)?;
        up_a.iter()
            .filter_map(|(node, &dist_a)| {
                let dist_b = *up_b.get(node)?;
                let depth = depth(graph, node) as f64;
                Some(2.0 * depth / ((dist_a + dist_b) as f64 + 2.0 * depth))
            })
            .max_by(f64::total_cmp)
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn path(&self, pos: PartOfSpeech, a: &str, b: &str) -> Option<f64> {
        let graph = self.graph(pos);
        let up_a = ancestors(graph, a)?;
        let up_b = ancestors(graph, b)?;
        let shortest = up_a
            .iter()
            .filter_map(|(node, &dist_a)| Some(dist_a + *up_b.get(node)?))
            .min()?;
        Some(1.0 / (1.0 + shortest as f64))
    }

    fn graph(&self, pos: PartOfSpeech) -> &HashMap<String, Vec<String>> {
        match pos {
            PartOfSpeech::Noun => &self.nouns,
            PartOfSpeech::Verb => &self.verbs,
        }
    }

    fn graph_mut(&mut self, pos: PartOfSpeech) -> &mut HashMap<String, Vec<String>> {
        match pos {
            PartOfSpeech::Noun => &mut self.nouns,
            PartOfSpeech::Verb => &mut self.verbs,
        }
    }
}

/// Shortest upward distance from `word` to each of its ancestors (itself at 0).
fn ancestors<'a>(
    graph: &'a HashMap<String, Vec<String>>,
    word: &str,
) -> Option<HashMap<&'a str, usize>> {
    let (start, _) = graph.get_key_value(word)?;
    let mut dist = HashMap::from([(start.as_str(), 0)]);
    let mut queue = VecDeque::from([start.as_str()]);
    while let Some(node) = queue.pop_front() {
        let next = dist[node] + 1;
        for parent in graph.get(node).into_iter().flatten() {
            if !dist.contains_key(parent.as_str()) {
                dist.insert(parent.as_str(), next);
                queue.push_back(parent.as_str());
            }
        }
    }
    Some(dist)
}

/// Depth of a node: one plus its shortest distance to a root.
fn depth(graph: &HashMap<String, Vec<String>>, node: &str) -> usize {
    ancestors(graph, node)
        .and_then(|up| {
            up.into_iter()
                .filter(|(n, _)| graph.get(*n).is_none_or(Vec::is_empty))
                .map(|(_, d)| d)
                .min()
        })
        .map_or(1, |d| d + 1)
}

/// [`WordSimilarity`] view of a taxonomy for a fixed metric.
#[derive(Debug, Clone)]
pub struct TaxonomySimilarity {
    taxonomy: Arc<Taxonomy>,
    metric: TaxonomyMetric,
}

impl TaxonomySimilarity {
    #[must_use]
    pub fn new(taxonomy: Arc<Taxonomy>, metric: TaxonomyMetric) -> Self {
        Self { taxonomy, metric }
    }
}

impl WordSimilarity for TaxonomySimilarity {
    fn word_similarity(&self, a: &str, b: &str, pos: PartOfSpeech) -> Option<f64> {
        self.taxonomy.similarity(self.metric, pos, a, b)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const EDGES: &str = "\
# pos\tchild\tparent
n\tanimal\tentity
n\tdog\tanimal
n\tcat\tanimal
n\tpuppy\tdog
n\tcar\tartifact
n\tartifact\tentity
v\trun\tmove
n\tstone\tmineral
";

    fn taxonomy() -> Taxonomy {
        Taxonomy::from_reader(EDGES.as_bytes()).unwrap()
    }

    #[test]
    fn test_identical_words() {
        let taxonomy = taxonomy();
        assert_relative_eq!(taxonomy.wu_palmer(PartOfSpeech::Noun, "dog", "dog").unwrap(), 1.0);
        assert_relative_eq!(taxonomy.path(PartOfSpeech::Noun, "dog", "dog").unwrap(), 1.0);
    }

    #[test]
    fn test_siblings() {
        let taxonomy = taxonomy();
        // animal has depth 2, dog and cat are one step below it
        assert_relative_eq!(
            taxonomy.wu_palmer(PartOfSpeech::Noun, "dog", "cat").unwrap(),
            4.0 / 6.0
        );
        assert_relative_eq!(
            taxonomy.path(PartOfSpeech::Noun, "dog", "cat").unwrap(),
            1.0 / 3.0
        );
        assert!(
            taxonomy.wu_palmer(PartOfSpeech::Noun, "puppy", "cat").unwrap()
                > taxonomy.wu_palmer(PartOfSpeech::Noun, "puppy", "car").unwrap()
        );
    }

    #[test]
    fn test_missing_or_disconnected() {
        let taxonomy = taxonomy();
        assert_eq!(taxonomy.wu_palmer(PartOfSpeech::Noun, "dog", "unicorn"), None);
        assert_eq!(taxonomy.path(PartOfSpeech::Noun, "dog", "stone"), None);
        // verbs and nouns live in separate graphs
        assert_eq!(taxonomy.path(PartOfSpeech::Verb, "dog", "run"), None);
        assert!(taxonomy.contains(PartOfSpeech::Verb, "move"));
    }

    #[test]
    fn test_malformed_line() {
        let err = Taxonomy::from_reader("n\tdog\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 1, .. }));
        let err = Taxonomy::from_reader("x\tdog\tanimal\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 1, .. }));
    }
}
