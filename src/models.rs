use crate::error::{ExplorerError, ExplorerResult};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Raw cell value as read from the tabular source.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Missing,
}

impl FieldValue {
    /// Display form for pass-through metadata columns.
    pub fn to_display(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text.clone()),
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(format!("{:.0}", n)),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Missing => None,
        }
    }
}

/// Loaded CSV before preprocessing
#[derive(Debug, Clone)]
pub struct Corpus {
    pub source: Option<PathBuf>,
    pub checksum: String,
    pub(crate) headers: Vec<String>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl Corpus {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &FieldValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&FieldValue::Missing)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Columns passed through to the output untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_onset_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub index: usize,
    pub raw: FieldValue,
    pub normalized: Option<String>,
    pub metadata: RecordMetadata,
}

impl Record {
    pub fn is_searchable(&self) -> bool {
        self.normalized.is_some()
    }
}

/// Corpus after every record's free text has been normalized once.
#[derive(Debug, Clone)]
pub struct NormalizedCorpus {
    pub text_column: String,
    pub checksum: String,
    records: Vec<Record>,
}

impl NormalizedCorpus {
    pub fn new(text_column: String, checksum: String, records: Vec<Record>) -> Self {
        NormalizedCorpus {
            text_column,
            checksum,
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn searchable_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_searchable()).count()
    }
}

/// Context tokens kept on each side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Bounded(usize),
    All,
}

impl Window {
    pub const CHOICES: [usize; 6] = [5, 10, 15, 20, 25, 30];

    /// A side with at most this many tokens is kept whole.
    pub fn exhausts(&self, token_count: usize) -> bool {
        match self {
            Window::Bounded(n) => token_count <= *n,
            Window::All => true,
        }
    }

    pub fn size(&self) -> Option<usize> {
        match self {
            Window::Bounded(n) => Some(*n),
            Window::All => None,
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::Bounded(10)
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Bounded(n) => write!(f, "{}", n),
            Window::All => write!(f, "All"),
        }
    }
}

impl FromStr for Window {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Window::All);
        }
        match trimmed.parse::<usize>() {
            Ok(n) if Window::CHOICES.contains(&n) => Ok(Window::Bounded(n)),
            _ => Err(ExplorerError::InvalidWindow(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub phrase: String,
    pub window: Window,
}

/// True for phrases with nothing but whitespace, which would match between
/// every pair of words.
pub(crate) fn is_blank(phrase: &str) -> bool {
    phrase.trim().is_empty()
}

impl Query {
    /// The phrase is kept as typed; only blank phrases are rejected.
    pub fn new(phrase: impl Into<String>, window: Window) -> ExplorerResult<Self> {
        let phrase = phrase.into();
        if is_blank(&phrase) {
            return Err(ExplorerError::EmptyQuery);
        }
        Ok(Query { phrase, window })
    }
}

/// One located phrase occurrence.
///
/// `residual` is the untokenized text after the match, borrowed from the
/// searched record; searching it again yields the next occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<'a> {
    pub left: Vec<String>,
    pub phrase: Vec<String>,
    pub right: Vec<String>,
    pub residual: &'a str,
}

impl<'a> Occurrence<'a> {
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.left
            .iter()
            .chain(self.phrase.iter())
            .chain(self.right.iter())
            .map(String::as_str)
    }

    pub fn snippet(&self) -> String {
        self.tokens().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStep<'a> {
    Found(Occurrence<'a>),
    Terminal,
}

impl<'a> SearchStep<'a> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchStep::Terminal)
    }
}

/// All snippets found in one record
#[derive(Debug, Clone)]
pub struct RecordMatches<'a> {
    pub record: &'a Record,
    pub snippets: Vec<String>,
}
