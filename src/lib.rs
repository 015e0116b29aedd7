pub mod checker;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod stats;

pub use checker::SpellChecker;
pub use config::Config;
pub use error::{CheckError, ClipboardError, ValidationError};
pub use stats::TextStatistics;

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckResult {
    pub total_error_count: usize,
    pub errors: Vec<SpellError>,
    pub corrected_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellError {
    pub original_text: String,
    pub candidate_text: String,
    pub help_text: Option<String>,
    /// 1-based index of the chunk the error was reported in
    pub chunk_index: usize,
}
