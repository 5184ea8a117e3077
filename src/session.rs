use crate::error::{ExplorerError, ExplorerResult};
use crate::models::*;
use crate::search::locate;

/// A hit produced while stepping through a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHit<'a> {
    pub record: &'a Record,
    /// 1-based position of this occurrence within its record.
    pub ordinal: usize,
    pub snippet: String,
}

/// Step-by-step walk over a corpus for one query.
///
/// The session borrows the corpus for its whole life, so the corpus cannot be
/// replaced while a walk is in progress.
pub struct SearchSession<'a> {
    corpus: &'a NormalizedCorpus,
    query: Query,
    record_idx: usize,
    // None until the current record has produced its first match.
    cursor: Option<&'a str>,
    ordinal: usize,
    hits: usize,
    records_hit: usize,
}

impl<'a> SearchSession<'a> {
    pub fn new(corpus: &'a NormalizedCorpus, query: Query) -> ExplorerResult<Self> {
        if is_blank(&query.phrase) {
            return Err(ExplorerError::EmptyQuery);
        }
        Ok(SearchSession {
            corpus,
            query,
            record_idx: 0,
            cursor: None,
            ordinal: 0,
            hits: 0,
            records_hit: 0,
        })
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn next_occurrence(&mut self) -> Option<SessionHit<'a>> {
        let corpus = self.corpus;
        let records = corpus.records();
        while let Some(record) = records.get(self.record_idx) {
            let text = match self.cursor {
                Some(residual) => Some(residual),
                None => record.normalized.as_deref(),
            };

            match locate(text, &self.query.phrase, self.query.window) {
                SearchStep::Found(occurrence) => {
                    self.cursor = Some(occurrence.residual);
                    self.ordinal += 1;
                    self.hits += 1;
                    if self.ordinal == 1 {
                        self.records_hit += 1;
                    }
                    return Some(SessionHit {
                        record,
                        ordinal: self.ordinal,
                        snippet: occurrence.snippet(),
                    });
                }
                SearchStep::Terminal => self.advance_record(),
            }
        }
        None
    }

    /// Abandons the remaining occurrences of the current record.
    pub fn skip_record(&mut self) {
        if self.record_idx < self.corpus.len() {
            self.advance_record();
        }
    }

    pub fn hits_so_far(&self) -> usize {
        self.hits
    }

    /// Records that produced at least one hit so far.
    pub fn records_so_far(&self) -> usize {
        self.records_hit
    }

    pub fn is_exhausted(&self) -> bool {
        self.record_idx >= self.corpus.len()
    }

    fn advance_record(&mut self) {
        self.record_idx += 1;
        self.cursor = None;
        self.ordinal = 0;
    }
}
