//! Levin verb classes.
//!
//! The class file is a sequence of blocks. A line starting with a digit opens a
//! class (`9.1 Put Verbs`), the following non-empty lines list member verbs, and
//! a blank line closes the block. Blocks whose content contains `-*-` are
//! cross-references, not member lists, and are skipped.
//!
//! Classes numbered 1-8 describe argument alternations; classes from 9 on are
//! semantic classes. [`LevinGranularity`] selects how classes become categories.

use std::{
    collections::{BTreeMap, BTreeSet},
    io::{BufRead, Read},
    path::Path,
};

use crate::{LoadError, category::CategoryDictionary};

/// Largest class number that describes alternations rather than semantics.
const LAST_ALTERNATION_CLASS: u32 = 8;

#[derive(Debug, Clone, Default)]
pub struct LevinClasses {
    /// Class key (whitespace-normalised header line) to lower-cased member verbs.
    classes: BTreeMap<String, BTreeSet<String>>,
}

/// How Levin classes map to categories.
#[derive(Debug, Clone, Default)]
pub enum LevinGranularity {
    /// One category per class number (`9.1`, `26.3`, ...), alternations included.
    #[default]
    Fine,
    /// One category per named group of semantic classes, keyed by the leading
    /// class integer. Classes without a group name keep their integer as name.
    Broad(BTreeMap<u32, String>),
}

impl LevinGranularity {
    /// Loads a broad grouping from a JSON object such as `{"9": "putting"}`.
    pub fn load_groups(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::groups_from_reader(crate::open(path.as_ref())?)
    }

    pub fn groups_from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: Read,
    {
        let raw: BTreeMap<String, String> =
            serde_json::from_reader(reader).map_err(LoadError::Json)?;
        let groups = raw
            .into_iter()
            .map(|(key, name)| {
                key.trim()
                    .parse::<u32>()
                    .map(|key| (key, name))
                    .map_err(|_| {
                        LoadError::malformed(0, format!("group key '{key}' is not an integer"))
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self::Broad(groups))
    }
}

impl LevinClasses {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_reader(crate::open(path.as_ref())?)
    }

    pub fn from_reader<R>(reader: R) -> Result<Self, LoadError>
    where
        R: BufRead,
    {
        let mut levin = Self::default();
        let mut key: Option<String> = None;
        let mut content = String::new();
        for line in reader.lines() {
            let line = line.map_err(LoadError::Read)?;
            let line = line.trim();
            if line.starts_with(|c: char| c.is_ascii_digit()) {
                levin.close_block(key.as_deref(), &mut content);
                key = Some(line.split_whitespace().collect::<Vec<_>>().join(" "));
            } else if line.is_empty() {
                levin.close_block(key.as_deref(), &mut content);
            } else {
                content.push_str(line);
                content.push(' ');
            }
        }
        levin.close_block(key.as_deref(), &mut content);
        tracing::debug!(classes = levin.classes.len(), "loaded Levin classes");
        Ok(levin)
    }

    fn close_block(&mut self, key: Option<&str>, content: &mut String) {
        let is_member_list = !content.trim().is_empty() && !content.contains("-*-");
        if let Some(key) = key.filter(|_| is_member_list) {
            self.classes
                .entry(key.to_owned())
                .or_default()
                .extend(content.split_whitespace().map(str::to_lowercase));
        }
        content.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Member verbs of each class, keyed by the class header.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.classes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Builds a category dictionary at the requested granularity.
    #[must_use]
    pub fn to_dictionary(&self, granularity: &LevinGranularity) -> CategoryDictionary {
        let mut dictionary = CategoryDictionary::default();
        for (key, verbs) in &self.classes {
            let number = class_number(key);
            let category = match granularity {
                LevinGranularity::Fine => number.to_owned(),
                LevinGranularity::Broad(groups) => {
                    let Some(major) = major_class(number) else {
                        continue;
                    };
                    if major <= LAST_ALTERNATION_CLASS {
                        continue;
                    }
                    groups
                        .get(&major)
                        .cloned()
                        .unwrap_or_else(|| major.to_string())
                }
            };
            for verb in verbs {
                dictionary.insert(verb, &category);
            }
        }
        dictionary
    }
}

/// First token of a class key (`"9.1 Put Verbs"` -> `"9.1"`).
fn class_number(key: &str) -> &str {
    key.split_whitespace().next().unwrap_or(key)
}

/// Leading integer of a class number (`"9.1"` -> `9`).
fn major_class(number: &str) -> Option<u32> {
    number.split('.').next()?.parse().ok()
}
