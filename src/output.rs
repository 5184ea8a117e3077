use crate::models::*;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct RecordView<'a> {
    row: usize,
    #[serde(flatten)]
    metadata: &'a RecordMetadata,
    snippets: &'a [String],
}

#[derive(Debug, Serialize)]
struct SearchView<'a> {
    phrase: &'a str,
    window: String,
    records: Vec<RecordView<'a>>,
}

/// Header line for a record, e.g. `Row 4 | id: P-17 | condition_type: asthma`.
pub fn record_heading(record: &Record) -> String {
    let meta = &record.metadata;
    let fields = [
        ("id", &meta.id),
        ("date_of_birth", &meta.date_of_birth),
        ("completion_date", &meta.completion_date),
        ("condition_type", &meta.condition_type),
        ("condition_onset_year", &meta.condition_onset_year),
    ];

    let mut heading = format!("Row {}", record.index + 1);
    for (label, value) in fields {
        if let Some(value) = value {
            heading.push_str(&format!(" | {}: {}", label, value));
        }
    }
    heading
}

pub fn render_text(query: &Query, matches: &[RecordMatches<'_>]) -> String {
    if matches.is_empty() {
        return format!("No occurrences of '{}' found.\n", query.phrase);
    }

    let mut out = String::new();
    for record_matches in matches {
        out.push_str(&record_heading(record_matches.record));
        out.push('\n');
        for (i, snippet) in record_matches.snippets.iter().enumerate() {
            out.push_str(&format!("  [{}] {}\n", i + 1, snippet));
        }
        out.push('\n');
    }

    let total: usize = matches.iter().map(|m| m.snippets.len()).sum();
    out.push_str(&format!(
        "{} occurrence(s) of '{}' in {} record(s)\n",
        total,
        query.phrase,
        matches.len()
    ));
    out
}

pub fn render_json(query: &Query, matches: &[RecordMatches<'_>]) -> serde_json::Result<String> {
    let view = SearchView {
        phrase: &query.phrase,
        window: query.window.to_string(),
        records: matches
            .iter()
            .map(|m| RecordView {
                row: m.record.index + 1,
                metadata: &m.record.metadata,
                snippets: &m.snippets,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&view)
}
