use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use lexiprobe_lexicon::{
    LexiconKind, LoadError, Resources,
    category::CategoryDictionary,
    embedding::EmbeddingTable,
    levin::{LevinClasses, LevinGranularity},
    table::{FrequencyTable, RatingTable},
    taxonomy::Taxonomy,
};

/// Lexical resource files shared by all subcommands.
///
/// Every resource is optional. Features depending on an absent resource yield
/// missing values.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct ResourceArg {
    /// Word vectors, one `word v1 v2 ...` line per word
    #[arg(long)]
    pub embeddings: Option<PathBuf>,

    /// Hypernym edges, tab-separated `pos child parent` lines
    #[arg(long)]
    pub taxonomy: Option<PathBuf>,

    /// Corpus word counts, `word count` lines
    #[arg(long)]
    pub frequencies: Option<PathBuf>,

    /// Concreteness norms (tab-separated, with header)
    #[arg(long)]
    pub concreteness: Option<PathBuf>,

    /// LIWC-style `word,category` dictionary
    #[arg(long)]
    pub liwc: Option<PathBuf>,

    /// Levin verb-class file
    #[arg(long)]
    pub levin: Option<PathBuf>,

    /// JSON map from leading Levin class number to a group name
    /// Uses broad groups instead of one category per class
    #[arg(long, requires = "levin")]
    pub levin_groups: Option<PathBuf>,
}

impl ResourceArg {
    pub(crate) fn load(&self) -> anyhow::Result<Resources> {
        let mut resources = Resources::new();
        if let Some(path) = &self.embeddings {
            resources = resources.with_embeddings(load("embeddings", path, EmbeddingTable::load)?);
        }
        if let Some(path) = &self.taxonomy {
            resources = resources.with_taxonomy(load("taxonomy", path, Taxonomy::load)?);
        }
        if let Some(path) = &self.frequencies {
            resources = resources.with_frequencies(load("frequency", path, FrequencyTable::load)?);
        }
        if let Some(path) = &self.concreteness {
            resources = resources.with_concreteness(load("concreteness", path, RatingTable::load)?);
        }
        if let Some(path) = &self.liwc {
            let dictionary = load("LIWC dictionary", path, CategoryDictionary::load)?;
            resources = resources.with_lexicon(LexiconKind::Liwc, dictionary);
        }
        if let Some(path) = &self.levin {
            let classes = load("Levin class", path, LevinClasses::load)?;
            let granularity = match &self.levin_groups {
                Some(groups) => load("Levin group", groups, LevinGranularity::load_groups)?,
                None => LevinGranularity::Fine,
            };
            resources =
                resources.with_lexicon(LexiconKind::Levin, classes.to_dictionary(&granularity));
        }

        let available = resources
            .available()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        tracing::info!(available = %available.join(","), "loaded lexical resources");
        Ok(resources)
    }
}

fn load<'a, T, F>(kind: &str, path: &'a Path, loader: F) -> anyhow::Result<T>
where
    F: FnOnce(&'a Path) -> Result<T, LoadError>,
{
    tracing::debug!(path = %path.display(), "loading {kind} file");
    loader(path).with_context(|| format!("Failed to load {kind} file: {}", path.display()))
}
