//! Transcript Harvester - batch-download YouTube transcripts
//!
//! Each input line is resolved to a video id and handed to a chain of transcript
//! sources (the official timedtext endpoint, a transcript library, and yt-dlp).
//! The first source that produces text wins; otherwise a structured error record
//! is written next to the transcripts.

pub mod batch;
pub mod captions;
pub mod cli;
pub mod clients;
pub mod config;
pub mod output;
pub mod resolver;
pub mod sources;
pub mod utils;

pub use batch::{BatchRunner, BatchSummary};
pub use cli::{Cli, LogLevel};
pub use config::Config;
pub use resolver::VideoId;
pub use sources::{SourceChain, TranscriptSource};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Classified failure for a single video id
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotAvailable(String),

    #[error("{0}")]
    Download(String),
}

impl TranscriptError {
    /// Value written to the `error_type` field of failure records
    pub fn kind(&self) -> &'static str {
        match self {
            TranscriptError::InvalidInput(_) => "invalid_input",
            TranscriptError::NotAvailable(_) => "not_available",
            TranscriptError::Download(_) => "download_failed",
        }
    }

    pub fn is_not_available(&self) -> bool {
        matches!(self, TranscriptError::NotAvailable(_))
    }
}
