use crate::error::{ExplorerError, ExplorerResult};
use crate::models::*;
use crate::text_normalizer::tokenize;

fn owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

/// Finds the first occurrence of `phrase` in `text` and cuts a context window
/// around it.
///
/// `text` is `None` for records whose raw value was not text; those, like text
/// without the phrase, end in [`SearchStep::Terminal`]. Feeding the returned
/// residual back in steps to the next occurrence.
pub fn find_occurrence<'a>(
    text: Option<&'a str>,
    phrase: &str,
    window: Window,
) -> ExplorerResult<SearchStep<'a>> {
    if is_blank(phrase) {
        return Err(ExplorerError::EmptyQuery);
    }
    Ok(locate(text, phrase, window))
}

/// Core of [`find_occurrence`]; callers guarantee `phrase` is not blank.
pub(crate) fn locate<'a>(text: Option<&'a str>, phrase: &str, window: Window) -> SearchStep<'a> {
    let text = match text {
        Some(text) => text,
        None => return SearchStep::Terminal,
    };

    let start = match text.find(phrase) {
        Some(pos) => pos,
        None => return SearchStep::Terminal,
    };

    let left = &text[..start];
    let right = &text[start + phrase.len()..];

    let left_tokens = tokenize(left);
    let right_tokens = tokenize(right);

    let left_exhausted = left.is_empty() || window.exhausts(left_tokens.len());
    let right_exhausted = right.is_empty() || window.exhausts(right_tokens.len());

    // An exhausted side is kept whole; otherwise window.size() is Some.
    let left_context = match (left_exhausted, window.size()) {
        (false, Some(n)) => &left_tokens[left_tokens.len() - n..],
        _ => &left_tokens[..],
    };
    let right_context = match (right_exhausted, window.size()) {
        (false, Some(n)) => &right_tokens[..n],
        _ => &right_tokens[..],
    };

    SearchStep::Found(Occurrence {
        left: owned(left_context),
        phrase: owned(&tokenize(phrase)),
        right: owned(right_context),
        residual: right,
    })
}

/// Walks every occurrence of a phrase within one record.
pub struct Occurrences<'a, 'q> {
    cursor: Option<&'a str>,
    phrase: &'q str,
    window: Window,
    done: bool,
}

impl<'a, 'q> Iterator for Occurrences<'a, 'q> {
    type Item = Occurrence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match locate(self.cursor, self.phrase, self.window) {
            SearchStep::Found(occurrence) => {
                self.cursor = Some(occurrence.residual);
                Some(occurrence)
            }
            SearchStep::Terminal => {
                self.done = true;
                None
            }
        }
    }
}

pub fn occurrences<'a, 'q>(
    text: Option<&'a str>,
    phrase: &'q str,
    window: Window,
) -> ExplorerResult<Occurrences<'a, 'q>> {
    if is_blank(phrase) {
        return Err(ExplorerError::EmptyQuery);
    }
    Ok(Occurrences {
        cursor: text,
        phrase,
        window,
        done: false,
    })
}

/// Lazily yields the matches of each record that contains the phrase, in
/// corpus order. Records without matches are skipped.
pub struct CorpusMatches<'a, 'q> {
    records: std::slice::Iter<'a, Record>,
    query: &'q Query,
}

impl<'a, 'q> Iterator for CorpusMatches<'a, 'q> {
    type Item = RecordMatches<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            let snippets: Vec<String> = Occurrences {
                cursor: record.normalized.as_deref(),
                phrase: &self.query.phrase,
                window: self.query.window,
                done: false,
            }
            .map(|occurrence| occurrence.snippet())
            .collect();

            if !snippets.is_empty() {
                return Some(RecordMatches { record, snippets });
            }
        }
        None
    }
}

pub fn search<'a, 'q>(
    corpus: &'a NormalizedCorpus,
    query: &'q Query,
) -> ExplorerResult<CorpusMatches<'a, 'q>> {
    if is_blank(&query.phrase) {
        return Err(ExplorerError::EmptyQuery);
    }
    Ok(CorpusMatches {
        records: corpus.records().iter(),
        query,
    })
}

pub fn search_all<'a>(
    corpus: &'a NormalizedCorpus,
    query: &Query,
) -> ExplorerResult<Vec<RecordMatches<'a>>> {
    Ok(search(corpus, query)?.collect())
}
