//! Phrase search over patient free-text survey responses.
//!
//! A CSV corpus is loaded once, its free-text column is normalized, and
//! phrases are then located with a window of context words on each side.

pub mod app;
pub mod cli;
pub mod column_mapping;
pub mod error;
pub mod explore;
pub mod loader;
pub mod logger;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod search;
#[cfg(test)]
mod search_tests;
pub mod session;
pub mod text_normalizer;
pub mod validation;

pub use error::{ExplorerError, ExplorerResult};
pub use models::{NormalizedCorpus, Query, SearchStep, Window};
pub use pipeline::{preprocess, ExplorerPipeline};
pub use search::{find_occurrence, search};
pub use session::SearchSession;
