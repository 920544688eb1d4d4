//! Loading benchmark examples from the input table.
//!
//! # Row format
//!
//! Each row holds a sentence, its negative variant, the triplets of both, the
//! negation type and the dependent variable. Column names are configurable
//! through [`TableSchema`].
//!
//! - Sentences are lower-cased and stripped of ASCII punctuation.
//! - A triplet cell is `a,b,c` or a bracketed list of quoted triplets
//!   (`['man,ride,horse', 'person,ride,horse']`).
//! - The negation type is read from the first character (`s`, `v`, `o`).
//! - The dependent variable is a real number or a label (`pos`/`true` = 1,
//!   `neg`/`false` = 0).
//!
//! # Triplet alignment
//!
//! When a cell lists several triplets, the one kept is the first whose three
//! words all occur among the token forms of its sentence: the token itself, the
//! token without a trailing `s` or `es`, and `person` for `people`. Without such
//! a triplet the first one listed is kept.
//!
//! Rows that fail any of these checks are skipped and counted per
//! [`SkipReason`]; they never abort the load.

use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use lexiprobe_features::example::{Example, NegationType, SkipCounts, SkipReason, Triplet};
use serde::Serialize;

use crate::table::{Record, Table, TableError};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DatasetError {
    #[display("failed to open input table {}: {source}", path.display())]
    #[from(skip)]
    Open { path: PathBuf, source: io::Error },
    #[display("{_0}")]
    Table(TableError),
    #[display("input table has no column named '{column}'")]
    #[from(skip)]
    MissingColumn {
        #[error(not(source))]
        column: String,
    },
    #[display("dependent variable column '{column}' has no value in any row")]
    #[from(skip)]
    EmptyDependentVariable {
        #[error(not(source))]
        column: String,
    },
}

/// Names of the input table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSchema {
    pub sentence: String,
    pub negative_sentence: String,
    pub positive_triplet: String,
    pub negative_triplet: String,
    pub negation_type: String,
    pub dependent: String,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            sentence: "sentence".to_owned(),
            negative_sentence: "neg_sentence".to_owned(),
            positive_triplet: "pos_triplet".to_owned(),
            negative_triplet: "neg_triplet".to_owned(),
            negation_type: "neg_type".to_owned(),
            dependent: "clip_score_diff".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    sentence: usize,
    negative_sentence: usize,
    positive_triplet: usize,
    negative_triplet: usize,
    negation_type: usize,
    dependent: usize,
}

impl ColumnIndices {
    fn resolve(table: &Table, schema: &TableSchema) -> Result<Self, DatasetError> {
        let index = |column: &str| {
            table
                .column_index(column)
                .ok_or_else(|| DatasetError::MissingColumn {
                    column: column.to_owned(),
                })
        };
        Ok(Self {
            sentence: index(&schema.sentence)?,
            negative_sentence: index(&schema.negative_sentence)?,
            positive_triplet: index(&schema.positive_triplet)?,
            negative_triplet: index(&schema.negative_triplet)?,
            negation_type: index(&schema.negation_type)?,
            dependent: index(&schema.dependent)?,
        })
    }
}

/// Validated examples of one input table.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub examples: Vec<Example>,
    /// Data rows considered (after `limit`).
    pub rows_read: usize,
    pub skipped: SkipCounts,
}

impl Dataset {
    pub fn load(
        path: impl AsRef<Path>,
        schema: &TableSchema,
        limit: Option<usize>,
    ) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DatasetError::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), schema, limit)
    }

    pub fn from_reader<R>(
        reader: R,
        schema: &TableSchema,
        limit: Option<usize>,
    ) -> Result<Self, DatasetError>
    where
        R: Read,
    {
        let table = Table::from_reader(reader)?;
        Self::from_table(&table, schema, limit)
    }

    /// Builds examples from a parsed table.
    ///
    /// Fails when a required column is absent or when no row carries a
    /// dependent-variable value.
    pub fn from_table(
        table: &Table,
        schema: &TableSchema,
        limit: Option<usize>,
    ) -> Result<Self, DatasetError> {
        let columns = ColumnIndices::resolve(table, schema)?;
        let records = table.records();
        let records = &records[..limit.map_or(records.len(), |n| n.min(records.len()))];

        if !records
            .iter()
            .any(|record| parse_dependent(record.get(columns.dependent)).is_some())
        {
            return Err(DatasetError::EmptyDependentVariable {
                column: schema.dependent.clone(),
            });
        }

        let mut examples = Vec::with_capacity(records.len());
        let mut skipped = SkipCounts::default();
        for (row, record) in records.iter().enumerate() {
            match parse_example(row, record, columns) {
                Ok(example) => examples.push(example),
                Err(reason) => {
                    tracing::debug!(line = record.line, %reason, "skipping row");
                    skipped.record(reason);
                }
            }
        }

        for (reason, count) in skipped.iter() {
            tracing::warn!(%reason, count, "skipped input rows");
        }
        tracing::info!(
            rows = records.len(),
            examples = examples.len(),
            skipped = skipped.total(),
            "loaded dataset"
        );
        Ok(Self {
            examples,
            rows_read: records.len(),
            skipped,
        })
    }
}

fn parse_example(
    row: usize,
    record: &Record,
    columns: ColumnIndices,
) -> Result<Example, SkipReason> {
    let sentence = preprocess_sentence(record.get(columns.sentence));
    let negative_sentence = preprocess_sentence(record.get(columns.negative_sentence));
    if sentence.is_empty() || negative_sentence.is_empty() {
        return Err(SkipReason::EmptySentence);
    }

    let positive = parse_triplets(record.get(columns.positive_triplet))?;
    let negative = parse_triplets(record.get(columns.negative_triplet))?;
    // Every word of the positive triplet is required. Only the swapped word of
    // the negative triplet is, and the extractor checks that one.
    let (Some(positive), Some(negative)) = (
        align_triplet(positive, &sentence).filter(|t| t.words().iter().all(|w| !w.is_empty())),
        align_triplet(negative, &negative_sentence),
    ) else {
        return Err(SkipReason::EmptyTriplet);
    };

    let negation = NegationType::from_code(record.get(columns.negation_type))
        .ok_or(SkipReason::UnknownNegationType)?;
    let dependent =
        parse_dependent(record.get(columns.dependent)).ok_or(SkipReason::MissingDependent)?;

    Ok(Example {
        row,
        sentence,
        negative_sentence,
        positive,
        negative,
        negation,
        dependent,
    })
}

/// Lower-cases and removes ASCII punctuation.
#[must_use]
pub fn preprocess_sentence(sentence: &str) -> String {
    sentence
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .trim()
        .to_owned()
}

/// Parses a dependent-variable cell.
#[must_use]
pub fn parse_dependent(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    match cell.to_ascii_lowercase().as_str() {
        "" => None,
        "pos" | "true" => Some(1.0),
        "neg" | "false" => Some(0.0),
        _ => cell.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Parses a triplet cell into its listed triplets.
///
/// An empty cell or an empty list gives no triplet.
pub fn parse_triplets(cell: &str) -> Result<Vec<Triplet>, SkipReason> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(vec![]);
    }
    match cell.strip_prefix('[') {
        Some(rest) => {
            let inner = rest.strip_suffix(']').ok_or(SkipReason::MalformedTriplet)?;
            quoted_items(inner)?
                .iter()
                .map(|item| parse_triplet(item))
                .collect()
        }
        None => Ok(vec![parse_triplet(cell)?]),
    }
}

fn parse_triplet(text: &str) -> Result<Triplet, SkipReason> {
    let words = text.split(',').map(str::trim).collect::<Vec<_>>();
    let [subject, verb, object] = words.as_slice() else {
        return Err(SkipReason::MalformedTriplet);
    };
    Ok(Triplet::new(subject, verb, object))
}

/// Splits `'a,b,c', "d,e,f"` into its quoted items.
fn quoted_items(list: &str) -> Result<Vec<String>, SkipReason> {
    let mut items = Vec::new();
    let mut chars = list.chars();
    loop {
        let Some(quote) = chars.find(|c| !c.is_whitespace() && *c != ',') else {
            return Ok(items);
        };
        if quote != '\'' && quote != '"' {
            return Err(SkipReason::MalformedTriplet);
        }
        let mut item = String::new();
        loop {
            match chars.next() {
                None => return Err(SkipReason::MalformedTriplet),
                Some('\\') => item.extend(chars.next()),
                Some(c) if c == quote => break,
                Some(c) => item.push(c),
            }
        }
        items.push(item);
    }
}

/// Picks the triplet matching the sentence, `None` when there is none.
#[must_use]
pub fn align_triplet(triplets: Vec<Triplet>, sentence: &str) -> Option<Triplet> {
    if triplets.len() <= 1 {
        return triplets.into_iter().next();
    }
    let forms = token_forms(sentence);
    let matched = triplets
        .iter()
        .position(|triplet| triplet.words().iter().all(|word| forms.contains(*word)))
        .unwrap_or(0);
    triplets.into_iter().nth(matched)
}

fn token_forms(sentence: &str) -> HashSet<&str> {
    let mut forms = HashSet::new();
    for token in sentence.split_whitespace() {
        forms.insert(token);
        if token == "people" {
            forms.insert("person");
        }
        forms.extend(token.strip_suffix('s'));
        forms.extend(token.strip_suffix("es"));
    }
    forms
}
