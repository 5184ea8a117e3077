use crate::cli::{Cli, Command, CorpusArgs, OutputFormat};
use crate::explore;
use crate::loader::CsvLoader;
use crate::logger::SessionReport;
use crate::models::*;
use crate::output::{render_json, render_text};
use crate::pipeline::ExplorerPipeline;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;

/// Runs one parsed command line.
///
/// Every command except `columns` opens a logged session. The session is
/// finalized whether or not the command succeeds; on failure the command's
/// error is returned after the log has been written and rotated.
pub fn run<R: BufRead, W: Write>(cli: &Cli, input: R, output: &mut W) -> Result<Option<SessionReport>> {
    if let Command::Columns { csv } = &cli.command {
        let corpus = CsvLoader::new()
            .load_path(csv)
            .with_context(|| format!("Failed to load {:?}", csv))?;
        for header in corpus.headers() {
            writeln!(output, "{}", header)?;
        }
        return Ok(None);
    }

    let config = cli.search_config();
    let log_dir = cli.log_dir.as_deref().unwrap_or_else(|| Path::new("logs"));
    let mut pipeline = ExplorerPipeline::new(log_dir)
        .context("Failed to create explorer pipeline")?;

    let outcome = execute(&mut pipeline, &cli.command, config.window, input, output);
    let report = pipeline.finalize(config.keep_logs)?;
    outcome.map(|()| Some(report))
}

fn execute<R: BufRead, W: Write>(
    pipeline: &mut ExplorerPipeline,
    command: &Command,
    window: Window,
    input: R,
    output: &mut W,
) -> Result<()> {
    match command {
        Command::Search {
            corpus,
            phrase,
            format,
            ..
        } => {
            let normalized = load_corpus(pipeline, corpus)?;
            let query = Query::new(phrase.as_str(), window)?;
            let matches = pipeline
                .search(&normalized, &query)
                .with_context(|| format!("Search for '{}' failed", phrase))?;

            match format {
                OutputFormat::Text => write!(output, "{}", render_text(&query, &matches))?,
                OutputFormat::Json => writeln!(
                    output,
                    "{}",
                    render_json(&query, &matches).context("Failed to serialize results")?
                )?,
            }
        }
        Command::Explore { corpus, .. } => {
            let normalized = load_corpus(pipeline, corpus)?;
            explore::run(pipeline, &normalized, window, input, output)?;
        }
        Command::Columns { .. } => {}
    }
    Ok(())
}

fn load_corpus(pipeline: &mut ExplorerPipeline, args: &CorpusArgs) -> Result<NormalizedCorpus> {
    let mapping = args.mapping()?;
    let corpus = pipeline
        .load(&args.csv)
        .with_context(|| format!("Failed to load {:?}", args.csv))?;
    pipeline.preprocess(&corpus, &mapping)
}
