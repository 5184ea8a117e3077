use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SESSION_PREFIX: &str = "session-";
const SESSION_SUFFIX: &str = ".jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One line of a session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

/// What an explorer session did, reported when it ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub records: usize,
    pub searchable_records: usize,
    pub queries: usize,
    pub occurrences: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub log_file: PathBuf,
    pub finished_at: String,
    pub errors: usize,
    pub warnings: usize,
    pub stats: SessionStats,
}

/// JSONL diagnostics for one explorer session.
///
/// Entries go to `session-<id>.jsonl` under the log directory. A second run
/// within the same second appends to the same file.
pub struct DiagnosticLogger {
    log_dir: PathBuf,
    log_path: PathBuf,
    writer: BufWriter<File>,
    session_id: String,
    errors: usize,
    warnings: usize,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

impl DiagnosticLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let session_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let log_path = log_dir.join(format!("{}{}{}", SESSION_PREFIX, session_id, SESSION_SUFFIX));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open session log: {:?}", log_path))?;

        Ok(DiagnosticLogger {
            log_dir: log_dir.to_path_buf(),
            log_path,
            writer: BufWriter::new(file),
            session_id,
            errors: 0,
            warnings: 0,
        })
    }

    /// Logging never fails the session; a line that cannot be written is dropped.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>, context: Option<serde_json::Value>) {
        match level {
            LogLevel::Error => self.errors += 1,
            LogLevel::Warning => self.warnings += 1,
            LogLevel::Info => {}
        }

        let entry = LogEntry {
            timestamp: now(),
            level,
            message: message.into(),
            context,
        };
        if let Ok(json) = serde_json::to_string(&entry) {
            let _ = writeln!(self.writer, "{}", json);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn info_with(&mut self, message: impl Into<String>, context: serde_json::Value) {
        self.log(LogLevel::Info, message, Some(context));
    }

    pub fn warning(&mut self, message: impl Into<String>, context: Option<serde_json::Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&mut self, message: impl Into<String>, context: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, context);
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Writes the closing summary line and flushes the session log.
    pub fn finish(&mut self, stats: SessionStats) -> Result<SessionReport> {
        let report = SessionReport {
            session_id: self.session_id.clone(),
            log_file: self.log_path.clone(),
            finished_at: now(),
            errors: self.errors,
            warnings: self.warnings,
            stats,
        };

        let summary = serde_json::to_value(&report).context("Failed to serialize session report")?;
        self.info_with(
            format!(
                "Session finished: {} queries, {} occurrences",
                report.stats.queries, report.stats.occurrences
            ),
            summary,
        );
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush session log: {:?}", self.log_path))?;

        Ok(report)
    }

    /// Deletes the oldest session logs so that at most `keep` remain. The
    /// current session's log is never deleted. Returns how many were removed.
    pub fn rotate_logs(&self, keep: usize) -> Result<usize> {
        let mut previous: Vec<(PathBuf, DateTime<Utc>)> = WalkDir::new(&self.log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && e.path() != self.log_path)
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map_or(false, |name| name.starts_with(SESSION_PREFIX) && name.ends_with(SESSION_SUFFIX))
            })
            .filter_map(|e| {
                let modified = e.metadata().ok()?.modified().ok()?;
                Some((e.path().to_path_buf(), DateTime::<Utc>::from(modified)))
            })
            .collect();

        let keep_previous = keep.saturating_sub(1);
        if previous.len() <= keep_previous {
            return Ok(0);
        }

        previous.sort_by(|a, b| a.1.cmp(&b.1));
        let excess = previous.len() - keep_previous;
        for (path, _) in previous.iter().take(excess) {
            fs::remove_file(path)
                .with_context(|| format!("Failed to delete old session log: {:?}", path))?;
        }
        Ok(excess)
    }
}
