//! Lexical resource adapter for feature extraction.
//!
//! Feature definitions never touch resource files directly. They query a
//! [`Resources`] bundle through narrow, read-only interfaces:
//!
//! - [`WordSimilarity`]: `(word, word, part of speech) -> similarity`
//! - [`TextSimilarity`]: `(sentence, sentence) -> similarity`
//! - [`WordFrequency`]: `word -> corpus count`
//! - [`WordRating`]: `word -> psycholinguistic rating` (concreteness norms)
//! - [`CategoryLexicon`]: `word -> set of categories`
//!
//! Every lookup is pure. A word the resource does not know yields `None`, which
//! the feature layer turns into an explicit missing value.
//!
//! # In-memory implementations
//!
//! - [`embedding::EmbeddingTable`]: word vectors (cosine similarity)
//! - [`taxonomy::Taxonomy`]: hypernym graph (Wu-Palmer and path similarity)
//! - [`table::FrequencyTable`]: precomputed corpus counts
//! - [`table::RatingTable`]: concreteness norms
//! - [`category::CategoryDictionary`]: LIWC-style dictionary with prefix wildcards
//! - [`levin::LevinClasses`]: Levin verb classes, converted to a category dictionary
//!
//! All of them load from text files once, before any example is processed.
//!
//! # Example
//!
//! ```
//! use lexiprobe_lexicon::{LexiconKind, Resources, table::FrequencyTable};
//!
//! let frequencies = [("dog".to_owned(), 120), ("cat".to_owned(), 80)]
//!     .into_iter()
//!     .collect::<FrequencyTable>();
//! let resources = Resources::new().with_frequencies(frequencies);
//!
//! assert_eq!(resources.frequency("dog"), Some(120));
//! assert_eq!(resources.frequency("zebra"), None);
//! assert_eq!(resources.categories(LexiconKind::Liwc, "dog"), None);
//! ```

use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

pub use self::resource::{
    CategoryLexicon, LexiconKind, PartOfSpeech, ResourceKind, Resources, SimilarityKind,
    TextSimilarity, WordFrequency, WordRating, WordSimilarity,
};

pub mod category;
pub mod embedding;
pub mod levin;
mod resource;
pub mod table;
pub mod taxonomy;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to read resource: {_0}")]
    Read(io::Error),
    #[display("line {line}: {message}")]
    Malformed {
        line: usize,
        #[error(not(source))]
        message: String,
    },
    #[display("invalid group map: {_0}")]
    Json(serde_json::Error),
}

impl LoadError {
    fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}
