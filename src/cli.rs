use crate::column_mapping::{ColumnMapping, ColumnOverrides, SearchConfig};
use crate::models::Window;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "free-text-explorer")]
#[command(about = "Search patient free-text survey responses for a phrase", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Log directory")]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Number of session logs to keep [default: 10]")]
    pub keep_logs: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the column headers of a CSV file
    Columns {
        #[arg(help = "CSV file")]
        csv: PathBuf,
    },
    /// Print every occurrence of a phrase
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[arg(long, help = "Phrase to search for")]
        phrase: String,

        #[arg(long, value_parser = parse_window, help = "Words either side of the phrase (5, 10, 15, 20, 25, 30 or all) [default: 10]")]
        window: Option<Window>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text, help = "Output format")]
        format: OutputFormat,
    },
    /// Step through occurrences interactively
    Explore {
        #[command(flatten)]
        corpus: CorpusArgs,

        #[arg(long, value_parser = parse_window, help = "Words either side of the phrase (5, 10, 15, 20, 25, 30 or all) [default: 10]")]
        window: Option<Window>,
    },
}

#[derive(Args, Debug)]
pub struct CorpusArgs {
    #[arg(help = "CSV file of survey responses")]
    pub csv: PathBuf,

    #[arg(long, help = "JSON file with the column mapping")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Column holding the free-text response")]
    pub text_column: Option<String>,

    #[arg(long, help = "Column holding the patient ID")]
    pub id_column: Option<String>,

    #[arg(long, help = "Column holding the date of birth")]
    pub dob_column: Option<String>,

    #[arg(long, help = "Column holding the survey completion date")]
    pub completion_date_column: Option<String>,

    #[arg(long, help = "Column holding the condition type")]
    pub condition_column: Option<String>,

    #[arg(long, help = "Column holding the condition onset year")]
    pub onset_year_column: Option<String>,
}

impl CorpusArgs {
    /// Mapping from `--config`, with command-line columns taking precedence.
    pub fn mapping(&self) -> Result<ColumnMapping> {
        let mut mapping = match &self.config {
            Some(path) => ColumnMapping::from_file(path)
                .context("Failed to load column mapping")?,
            None => ColumnMapping::default(),
        };

        mapping.apply(ColumnOverrides {
            text: self.text_column.clone(),
            id: self.id_column.clone(),
            date_of_birth: self.dob_column.clone(),
            completion_date: self.completion_date_column.clone(),
            condition_type: self.condition_column.clone(),
            condition_onset_year: self.onset_year_column.clone(),
        });

        if mapping.text.is_empty() {
            return Err(anyhow::anyhow!(
                "No free-text column given. Use --text-column or --config."
            ));
        }

        Ok(mapping)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_window(s: &str) -> Result<Window, crate::error::ExplorerError> {
    s.parse()
}

impl Cli {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn search_config(&self) -> SearchConfig {
        let window = match &self.command {
            Command::Search { window, .. } | Command::Explore { window, .. } => *window,
            Command::Columns { .. } => None,
        };
        SearchConfig::new(window, self.keep_logs)
    }
}
