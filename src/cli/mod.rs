use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "transcript-harvester",
    about = "Transcript Harvester - Download YouTube transcripts for a list of videos",
    version,
    long_about = "Reads YouTube video URLs or ids from a file and stores each transcript as <id>.txt in the output directory. \
Transcripts are looked up through the official caption endpoint, a transcript library, and yt-dlp, in that order. \
Videos without a transcript get an <id>.error.json record instead."
)]
pub struct Cli {
    /// File containing YouTube video URLs/ids, one per line (`#` starts a comment)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory where the transcripts will be stored
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Configure the verbosity of log output
    #[arg(long, value_enum, default_value = "info", ignore_case = true)]
    pub log_level: LogLevel,

    /// Configuration file (defaults to ./config.yaml or the user config directory)
    #[arg(short, long, value_name = "FILE", env = "TRANSCRIPT_HARVESTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}
