//! Word category dictionaries (LIWC style).
//!
//! Each entry maps a key to a category. A key ending in `*` is a prefix
//! pattern: `happ*` matches `happy`, `happiness` and `happ` itself. A word can
//! belong to any number of categories.

use std::{
    collections::{BTreeSet, HashMap},
    io::BufRead,
    path::Path,
};

use crate::{CategoryLexicon, LoadError};

#[derive(Debug, Clone, Default)]
pub struct CategoryDictionary {
    exact: HashMap<String, BTreeSet<String>>,
    prefixes: Vec<(String, BTreeSet<String>)>,
    categories: BTreeSet<String>,
}

impl CategoryDictionary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(crate::open(path.as_ref())?)
    }

    /// Parses `word,category` lines. Empty lines are ignored.
    pub fn from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: BufRead,
    {
        let mut dictionary = Self::default();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(LoadError::Read)?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, category)) = line.split_once(',') else {
                return Err(LoadError::malformed(idx + 1, "expected 'word,category'"));
            };
            let (key, category) = (key.trim(), category.trim());
            if key.is_empty() || category.is_empty() {
                return Err(LoadError::malformed(idx + 1, "empty word or category"));
            }
            dictionary.insert(key, category);
        }
        tracing::debug!(
            words = dictionary.exact.len(),
            prefixes = dictionary.prefixes.len(),
            categories = dictionary.categories.len(),
            "loaded category dictionary"
        );
        Ok(dictionary)
    }

    pub fn insert(&mut self, key: &str, category: &str) {
        self.categories.insert(category.to_owned());
        if let Some(prefix) = key.strip_suffix('*') {
            if let Some((_, categories)) = self.prefixes.iter_mut().find(|(p, _)| p == prefix) {
                categories.insert(category.to_owned());
            } else {
                self.prefixes
                    .push((prefix.to_owned(), BTreeSet::from([category.to_owned()])));
            }
        } else {
            self.exact
                .entry(key.to_owned())
                .or_default()
                .insert(category.to_owned());
        }
    }
}

impl<K, C> FromIterator<(K, C)> for CategoryDictionary
where
    K: AsRef<str>,
    C: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, C)>>(iter: T) -> Self {
        let mut dictionary = Self::default();
        for (key, category) in iter {
            dictionary.insert(key.as_ref(), category.as_ref());
        }
        dictionary
    }
}

impl CategoryLexicon for CategoryDictionary {
    fn categories(&self, word: &str) -> BTreeSet<String> {
        let mut found = self.exact.get(word).cloned().unwrap_or_default();
        for (prefix, categories) in &self.prefixes {
            if word.starts_with(prefix.as_str()) {
                found.extend(categories.iter().cloned());
            }
        }
        found
    }

    fn all_categories(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }
}
