use crate::models::*;
use crate::output::record_heading;
use crate::pipeline::ExplorerPipeline;
use crate::session::SearchSession;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

const HELP: &str = "Type a phrase to search. Enter: next occurrence, n: next record, q: end search (q again to quit).";

/// Interactive loop over one preprocessed corpus.
///
/// Reads commands line by line from `input` until end of input or `q` with no
/// search open.
pub fn run<R: BufRead, W: Write>(
    pipeline: &mut ExplorerPipeline,
    corpus: &NormalizedCorpus,
    window: Window,
    input: R,
    output: &mut W,
) -> Result<()> {
    writeln!(
        output,
        "{} records loaded ({} searchable). {}",
        corpus.len(),
        corpus.searchable_count(),
        HELP
    )?;

    let mut session: Option<SearchSession<'_>> = None;
    prompt(output, session.is_some())?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let command = line.trim();

        match (command, session.as_mut()) {
            ("q", Some(active)) => {
                end_session(pipeline, active, output)?;
                session = None;
            }
            ("q", None) => break,
            ("", Some(active)) => {
                if !step(active, output)? {
                    end_session(pipeline, active, output)?;
                    session = None;
                }
            }
            ("n", Some(active)) => {
                active.skip_record();
                if !step(active, output)? {
                    end_session(pipeline, active, output)?;
                    session = None;
                }
            }
            ("", None) => {}
            (phrase, previous) => {
                if let Some(previous) = previous {
                    end_session(pipeline, previous, output)?;
                }
                let query = Query::new(phrase, window)?;
                let mut active = SearchSession::new(corpus, query)?;
                session = if step(&mut active, output)? {
                    Some(active)
                } else {
                    end_session(pipeline, &active, output)?;
                    None
                };
            }
        }

        prompt(output, session.is_some())?;
    }

    if let Some(active) = session.as_ref() {
        end_session(pipeline, active, output)?;
    }
    output.flush()?;
    Ok(())
}

/// Prints the next hit; false once the corpus is exhausted.
fn step<W: Write>(session: &mut SearchSession<'_>, output: &mut W) -> Result<bool> {
    match session.next_occurrence() {
        Some(hit) => {
            writeln!(output, "{} [{}]", record_heading(hit.record), hit.ordinal)?;
            writeln!(output, "  {}", hit.snippet)?;
            Ok(true)
        }
        None => {
            writeln!(output, "No more occurrences of '{}'.", session.query().phrase)?;
            Ok(false)
        }
    }
}

fn end_session<W: Write>(
    pipeline: &mut ExplorerPipeline,
    session: &SearchSession<'_>,
    output: &mut W,
) -> Result<()> {
    writeln!(
        output,
        "Search for '{}' ended after {} occurrence(s).",
        session.query().phrase,
        session.hits_so_far()
    )?;
    pipeline.record_query(session.query(), session.hits_so_far(), session.records_so_far());
    Ok(())
}

fn prompt<W: Write>(output: &mut W, searching: bool) -> Result<()> {
    write!(output, "{}", if searching { "next> " } else { "phrase> " })?;
    output.flush()?;
    Ok(())
}
