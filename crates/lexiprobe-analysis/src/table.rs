//! Comma-separated input tables.
//!
//! Fields are separated by commas and records by `\n` or `\r\n`. A field
//! enclosed in double quotes may contain commas, line breaks and doubled quotes
//! (`""`), as in RFC 4180. The first record is the header. Blank lines are
//! ignored.

use std::{
    io::{self, Read},
    mem,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TableError {
    #[display("failed to read table: {_0}")]
    Read(io::Error),
    #[display("table has no header row")]
    MissingHeader,
    #[display("unterminated quoted field starting on line {line}")]
    UnterminatedQuote {
        #[error(not(source))]
        line: usize,
    },
}

/// One data record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Line on which the record starts (1-based, header is line 1).
    pub line: usize,
    fields: Vec<String>,
}

impl Record {
    /// Field at `index`, or `""` when the record is shorter.
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    header: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn from_reader<R>(mut reader: R) -> Result<Self, TableError>
    where
        R: Read,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text).map_err(TableError::Read)?;
        text.parse()
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Index of the first column with this name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h.trim() == name)
    }
}

impl std::str::FromStr for Table {
    type Err = TableError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_records(text)?.into_iter();
        let header = records.next().ok_or(TableError::MissingHeader)?.fields;
        Ok(Self {
            header,
            records: records.collect(),
        })
    }
}

fn parse_records(text: &str) -> Result<Vec<Record>, TableError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = None;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if quote_line.is_some() {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => quote_line = None,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => quote_line = Some(line),
            ',' => fields.push(mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(mem::take(&mut field));
                push_record(&mut records, record_line, mem::take(&mut fields));
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }
    if let Some(line) = quote_line {
        return Err(TableError::UnterminatedQuote { line });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, record_line, fields);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Record>, line: usize, fields: Vec<String>) {
    let blank = matches!(fields.as_slice(), [only] if only.trim().is_empty());
    if !blank {
        records.push(Record { line, fields });
    }
}
