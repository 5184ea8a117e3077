use crate::column_mapping::ColumnMapping;
use crate::models::*;
use crate::text_normalizer::TextNormalizer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub statistics: CorpusStatistics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub message: String,
    pub column: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub total_records: usize,
    pub text_records: usize,
    pub non_text_records: usize,
    /// Text cells that normalize to nothing, e.g. `"!!!"`. Counted in
    /// `text_records` but can never match a phrase.
    pub empty_text_records: usize,
}

/// Checks a loaded corpus against a column mapping before preprocessing.
pub struct CorpusValidator {
    normalizer: TextNormalizer,
}

impl CorpusValidator {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(CorpusValidator {
            normalizer: TextNormalizer::new()?,
        })
    }

    pub fn validate(&self, corpus: &Corpus, mapping: &ColumnMapping) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let text_idx = corpus.column_index(&mapping.text);
        if text_idx.is_none() {
            errors.push(ValidationIssue {
                message: format!("Free-text column '{}' not found", mapping.text),
                column: Some(mapping.text.clone()),
            });
        }

        for (label, column) in mapping.optional_columns() {
            if let Some(column) = column {
                if corpus.column_index(column).is_none() {
                    warnings.push(ValidationIssue {
                        message: format!(
                            "Column '{}' mapped as {} not found; treating it as unavailable",
                            column, label
                        ),
                        column: Some(column.to_string()),
                    });
                }
            }
        }

        if corpus.is_empty() {
            warnings.push(ValidationIssue {
                message: "Corpus has no records".to_string(),
                column: None,
            });
        }

        let (mut text_records, mut empty_text_records) = (0, 0);
        if let Some(idx) = text_idx {
            for row in 0..corpus.len() {
                if let FieldValue::Text(text) = corpus.cell(row, idx) {
                    text_records += 1;
                    if self.normalizer.normalize_text(text).is_empty() {
                        empty_text_records += 1;
                    }
                }
            }
        }
        let statistics = CorpusStatistics {
            total_records: corpus.len(),
            text_records,
            non_text_records: corpus.len() - text_records,
            empty_text_records,
        };

        if empty_text_records > 0 {
            warnings.push(ValidationIssue {
                message: format!(
                    "{} response(s) in '{}' contain no words after normalization",
                    empty_text_records, mapping.text
                ),
                column: Some(mapping.text.clone()),
            });
        }

        if text_idx.is_some() && !corpus.is_empty() && text_records == 0 {
            warnings.push(ValidationIssue {
                message: format!("Column '{}' contains no text values", mapping.text),
                column: Some(mapping.text.clone()),
            });
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            statistics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::CsvLoader;

    fn load(csv: &str) -> Corpus {
        CsvLoader::new().load_bytes(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_valid_mapping() {
        let corpus = load("ID,Comments\n1,tired\n2,\n3,fine\n");
        let mut mapping = ColumnMapping::new("Comments");
        mapping.id = Some("ID".to_string());

        let report = CorpusValidator::new().unwrap().validate(&corpus, &mapping);
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.statistics,
            CorpusStatistics {
                total_records: 3,
                text_records: 2,
                non_text_records: 1,
                empty_text_records: 0,
            }
        );
    }

    #[test]
    fn test_missing_text_column_is_an_error() {
        let corpus = load("ID,Comments\n1,tired\n");
        let report = CorpusValidator::new().unwrap().validate(&corpus, &ColumnMapping::new("Response"));

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].column.as_deref(), Some("Response"));
        assert_eq!(report.statistics.text_records, 0);
    }

    #[test]
    fn test_missing_optional_column_is_a_warning() {
        let corpus = load("ID,Comments\n1,tired\n");
        let mut mapping = ColumnMapping::new("Comments");
        mapping.date_of_birth = Some("DOB".to_string());

        let report = CorpusValidator::new().unwrap().validate(&corpus, &mapping);
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("date_of_birth"));
    }

    #[test]
    fn test_numeric_text_column_warns() {
        let corpus = load("ID,Score\n1,4\n2,5\n");
        let report = CorpusValidator::new().unwrap().validate(&corpus, &ColumnMapping::new("Score"));

        assert!(report.is_valid);
        assert_eq!(report.statistics.non_text_records, 2);
        assert!(report.warnings.iter().any(|w| w.message.contains("no text values")));
    }

    #[test]
    fn test_punctuation_only_responses_are_counted() {
        let corpus = load("ID,Comments\n1,!!!\n2,\"...?\"\n3,tired\n4,\n");
        let report = CorpusValidator::new()
            .unwrap()
            .validate(&corpus, &ColumnMapping::new("Comments"));

        assert!(report.is_valid);
        assert_eq!(report.statistics.text_records, 3);
        assert_eq!(report.statistics.empty_text_records, 2);
        assert_eq!(report.statistics.non_text_records, 1);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.message.starts_with("2 response(s) in 'Comments'")));
    }
}
