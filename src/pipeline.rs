use crate::column_mapping::ColumnMapping;
use crate::error::{ExplorerError, ExplorerResult};
use crate::loader::CsvLoader;
use crate::logger::*;
use crate::models::*;
use crate::search;
use crate::text_normalizer::TextNormalizer;
use crate::validation::CorpusValidator;
use anyhow::{Context, Result};
use std::path::Path;

/// Normalizes the mapped free-text column of every row.
///
/// Fails with [`ExplorerError::MissingColumn`] before touching any row when the
/// text column does not exist. Pass-through columns that are unmapped or
/// absent are left empty.
pub fn preprocess(
    corpus: &Corpus,
    mapping: &ColumnMapping,
    normalizer: &TextNormalizer,
) -> ExplorerResult<NormalizedCorpus> {
    let text_idx = corpus
        .column_index(&mapping.text)
        .ok_or_else(|| ExplorerError::MissingColumn {
            column: mapping.text.clone(),
            available: corpus.headers().to_vec(),
        })?;

    let [id, date_of_birth, completion_date, condition_type, condition_onset_year] = mapping
        .optional_columns()
        .map(|(_, column)| column.and_then(|name| corpus.column_index(name)));

    let pass_through = |row: usize, column: Option<usize>| {
        column.and_then(|idx| corpus.cell(row, idx).to_display())
    };

    let records = (0..corpus.len())
        .map(|row| {
            let raw = corpus.cell(row, text_idx).clone();
            Record {
                index: row,
                normalized: normalizer.normalize(&raw),
                raw,
                metadata: RecordMetadata {
                    id: pass_through(row, id),
                    date_of_birth: pass_through(row, date_of_birth),
                    completion_date: pass_through(row, completion_date),
                    condition_type: pass_through(row, condition_type),
                    condition_onset_year: pass_through(row, condition_onset_year),
                },
            }
        })
        .collect();

    Ok(NormalizedCorpus::new(
        mapping.text.clone(),
        corpus.checksum.clone(),
        records,
    ))
}

pub struct ExplorerPipeline {
    pub loader: CsvLoader,
    pub normalizer: TextNormalizer,
    pub validator: CorpusValidator,
    pub logger: DiagnosticLogger,
    stats: SessionStats,
}

impl ExplorerPipeline {
    pub fn new(log_dir: &Path) -> Result<Self> {
        Ok(ExplorerPipeline {
            loader: CsvLoader::new(),
            normalizer: TextNormalizer::new()
                .context("Failed to create TextNormalizer")?,
            validator: CorpusValidator::new()
                .context("Failed to create CorpusValidator")?,
            logger: DiagnosticLogger::new(log_dir)
                .context("Failed to create DiagnosticLogger")?,
            stats: SessionStats::default(),
        })
    }

    pub fn load(&mut self, path: &Path) -> Result<Corpus> {
        self.logger.info(format!("Loading corpus: {:?}", path));

        let corpus = match self.loader.load_path(path) {
            Ok(corpus) => corpus,
            Err(e) => {
                self.logger.error(e.to_string(), None);
                return Err(e.into());
            }
        };

        self.logger.info_with(
            format!("Loaded {} rows, {} columns", corpus.len(), corpus.headers().len()),
            serde_json::json!({
                "source": path.display().to_string(),
                "sha256": corpus.checksum,
                "columns": corpus.headers(),
            }),
        );

        Ok(corpus)
    }

    /// Validates the mapping, then normalizes every record.
    pub fn preprocess(&mut self, corpus: &Corpus, mapping: &ColumnMapping) -> Result<NormalizedCorpus> {
        let report = self.validator.validate(corpus, mapping);

        for error in &report.errors {
            self.logger.error(
                error.message.clone(),
                Some(serde_json::json!({ "column": error.column })),
            );
        }
        for warning in &report.warnings {
            self.logger.warning(
                warning.message.clone(),
                Some(serde_json::json!({ "column": warning.column })),
            );
        }

        let normalized = preprocess(corpus, mapping, &self.normalizer)
            .with_context(|| format!("Failed to preprocess column '{}'", mapping.text))?;

        self.stats.records = normalized.len();
        self.stats.searchable_records = normalized.searchable_count();

        let statistics = &report.statistics;
        self.logger.info_with(
            format!(
                "Preprocessed {} records: {} text ({} without words), {} skipped as non-text",
                statistics.total_records,
                statistics.text_records,
                statistics.empty_text_records,
                statistics.non_text_records
            ),
            serde_json::json!({ "column": mapping.text, "statistics": statistics }),
        );

        Ok(normalized)
    }

    pub fn search<'a>(
        &mut self,
        corpus: &'a NormalizedCorpus,
        query: &Query,
    ) -> Result<Vec<RecordMatches<'a>>> {
        let matches = search::search_all(corpus, query)?;
        let occurrences: usize = matches.iter().map(|m| m.snippets.len()).sum();
        self.record_query(query, occurrences, matches.len());
        Ok(matches)
    }

    pub fn record_query(&mut self, query: &Query, occurrences: usize, records: usize) {
        self.stats.queries += 1;
        self.stats.occurrences += occurrences;
        self.logger.info_with(
            format!(
                "Query '{}' (window {}): {} occurrences in {} records",
                query.phrase, query.window, occurrences, records
            ),
            serde_json::json!({
                "phrase": query.phrase,
                "window": query.window.to_string(),
                "occurrences": occurrences,
                "records": records,
            }),
        );
    }

    /// Closes the session log and prunes old ones. Safe to call after a
    /// failed load or preprocess.
    pub fn finalize(&mut self, keep_logs: usize) -> Result<SessionReport> {
        let report = self.logger.finish(self.stats.clone())?;
        self.logger
            .rotate_logs(keep_logs)
            .context("Failed to rotate session logs")?;
        Ok(report)
    }
}
