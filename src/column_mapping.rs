use crate::error::{ExplorerError, ExplorerResult};
use crate::models::Window;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Which CSV header holds each logical field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    pub text: String,
    pub id: Option<String>,
    pub date_of_birth: Option<String>,
    pub completion_date: Option<String>,
    pub condition_type: Option<String>,
    pub condition_onset_year: Option<String>,
}

impl ColumnMapping {
    pub fn new(text: impl Into<String>) -> Self {
        ColumnMapping {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn from_file(path: &Path) -> ExplorerResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ExplorerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ExplorerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Replaces every field set in `overrides`.
    pub fn apply(&mut self, overrides: ColumnOverrides) {
        let ColumnOverrides {
            text,
            id,
            date_of_birth,
            completion_date,
            condition_type,
            condition_onset_year,
        } = overrides;
        if let Some(text) = text {
            self.text = text;
        }
        self.id = id.or(self.id.take());
        self.date_of_birth = date_of_birth.or(self.date_of_birth.take());
        self.completion_date = completion_date.or(self.completion_date.take());
        self.condition_type = condition_type.or(self.condition_type.take());
        self.condition_onset_year = condition_onset_year.or(self.condition_onset_year.take());
    }

    /// Pass-through columns as (label, header) pairs; unmapped ones are `None`.
    pub fn optional_columns(&self) -> [(&'static str, Option<&str>); 5] {
        [
            ("id", self.id.as_deref()),
            ("date_of_birth", self.date_of_birth.as_deref()),
            ("completion_date", self.completion_date.as_deref()),
            ("condition_type", self.condition_type.as_deref()),
            ("condition_onset_year", self.condition_onset_year.as_deref()),
        ]
    }
}

/// Mapping values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ColumnOverrides {
    pub text: Option<String>,
    pub id: Option<String>,
    pub date_of_birth: Option<String>,
    pub completion_date: Option<String>,
    pub condition_type: Option<String>,
    pub condition_onset_year: Option<String>,
}

/// Search settings that are not tied to the CSV layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub window: Window,
    pub keep_logs: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            window: Window::Bounded(10),
            keep_logs: 10,
        }
    }
}

impl SearchConfig {
    /// Defaults with any explicitly given value taking precedence.
    pub fn new(window: Option<Window>, keep_logs: Option<usize>) -> Self {
        let defaults = SearchConfig::default();
        SearchConfig {
            window: window.unwrap_or(defaults.window),
            keep_logs: keep_logs.unwrap_or(defaults.keep_logs),
        }
    }
}
