use crate::error::{ExplorerError, ExplorerResult};
use crate::models::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Cell contents the tabular reader treats as a missing value.
static MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Reads survey CSV files into a [`Corpus`].
///
/// Column types are inferred per column: a column is numeric when every
/// non-missing cell parses as a number, otherwise all its cells are text.
#[derive(Debug, Default)]
pub struct CsvLoader;

impl CsvLoader {
    pub fn new() -> Self {
        CsvLoader
    }

    pub fn load_path(&self, path: &Path) -> ExplorerResult<Corpus> {
        let bytes = fs::read(path).map_err(|e| unreadable(Some(path), e))?;
        let mut corpus = self.load_bytes(&bytes).map_err(|e| match e {
            ExplorerError::UnreadableCorpus { reason, .. } => ExplorerError::UnreadableCorpus {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        corpus.source = Some(path.to_path_buf());
        Ok(corpus)
    }

    /// Reads the whole source first; the checksum covers every byte.
    pub fn load_reader<R: Read>(&self, mut reader: R) -> ExplorerResult<Corpus> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| unreadable(None, e))?;
        self.load_bytes(&bytes)
    }

    pub fn load_bytes(&self, bytes: &[u8]) -> ExplorerResult<Corpus> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| unreadable(None, e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(unreadable(None, "no header row"));
        }

        let mut cells: Vec<Vec<Option<String>>> = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| unreadable(None, e))?;
            let row = (0..headers.len())
                .map(|idx| {
                    record
                        .get(idx)
                        .filter(|cell| !is_missing(cell))
                        .map(|cell| cell.to_string())
                })
                .collect();
            cells.push(row);
        }

        let numeric_columns: Vec<bool> = (0..headers.len())
            .map(|col| Self::is_numeric_column(&cells, col))
            .collect();

        let rows = cells
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&numeric_columns)
                    .map(|(cell, &numeric)| match cell {
                        None => FieldValue::Missing,
                        Some(value) if numeric => value
                            .trim()
                            .parse::<f64>()
                            .map(FieldValue::Number)
                            .unwrap_or(FieldValue::Text(value)),
                        Some(value) => FieldValue::Text(value),
                    })
                    .collect()
            })
            .collect();

        Ok(Corpus {
            source: None,
            checksum: Self::checksum(bytes),
            headers,
            rows,
        })
    }

    fn is_numeric_column(cells: &[Vec<Option<String>>], col: usize) -> bool {
        let mut values = cells.iter().filter_map(|row| row[col].as_deref()).peekable();
        values.peek().is_some() && values.all(|v| v.trim().parse::<f64>().is_ok())
    }

    pub fn checksum(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }
}

fn unreadable(path: Option<&Path>, reason: impl ToString) -> ExplorerError {
    ExplorerError::UnreadableCorpus {
        path: path.map(Path::to_path_buf).unwrap_or_else(PathBuf::new),
        reason: reason.to_string(),
    }
}
