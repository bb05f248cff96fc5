use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::utils::sanitize_filename;
use crate::TranscriptError;

/// Structured error artifact written when no transcript could be obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub video_id: String,
    pub error_type: String,
    pub message: String,
}

impl FailureRecord {
    pub fn new(video_id: impl Into<String>, error: &TranscriptError) -> Self {
        Self {
            video_id: video_id.into(),
            error_type: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

pub fn transcript_path(destination: &Path, video_id: &str) -> PathBuf {
    destination.join(format!("{}.txt", sanitize_filename(video_id)))
}

pub fn error_path(destination: &Path, video_id: &str) -> PathBuf {
    destination.join(format!("{}.error.json", sanitize_filename(video_id)))
}

/// Error artifact for a line that never resolved to an id.
///
/// Sanitized ids never contain `.`, so `invalid.<sha256>.error.json` cannot
/// collide with any `<id>.txt` or `<id>.error.json`.
pub fn invalid_input_path(destination: &Path, raw: &str) -> PathBuf {
    let digest = Sha256::digest(raw.trim().as_bytes());
    destination.join(format!("invalid.{:x}.error.json", digest))
}

/// Write `<id>.txt` and drop any error artifact left by an earlier run
pub fn save_transcript(destination: &Path, video_id: &str, transcript: &str) -> Result<PathBuf> {
    fs_err::create_dir_all(destination)?;

    let output_path = transcript_path(destination, video_id);
    fs_err::write(&output_path, transcript).context("Failed to write transcript")?;
    remove_stale(&error_path(destination, video_id))?;

    tracing::info!("Saved transcript for {} to {}", video_id, output_path.display());
    Ok(output_path)
}

/// Write `<id>.error.json` and drop any transcript left by an earlier run
pub fn save_failure(destination: &Path, record: &FailureRecord) -> Result<PathBuf> {
    fs_err::create_dir_all(destination)?;

    let output_path = error_path(destination, &record.video_id);
    write_record(&output_path, record)?;
    remove_stale(&transcript_path(destination, &record.video_id))?;

    tracing::error!("Failed to fetch transcript for {}: {}", record.video_id, record.message);
    Ok(output_path)
}

/// Write the error artifact for an unresolvable line; no id owns it, so
/// nothing else is removed
pub fn save_invalid_input(destination: &Path, record: &FailureRecord) -> Result<PathBuf> {
    fs_err::create_dir_all(destination)?;

    let output_path = invalid_input_path(destination, &record.video_id);
    write_record(&output_path, record)?;

    tracing::error!("Skipping input line: {}", record.message);
    Ok(output_path)
}

fn write_record(path: &Path, record: &FailureRecord) -> Result<()> {
    let mut content = serde_json::to_string_pretty(record)
        .context("Failed to serialize failure record")?;
    content.push('\n');

    fs_err::write(path, content).context("Failed to write error record")?;
    Ok(())
}

fn remove_stale(path: &Path) -> Result<()> {
    if path.exists() {
        tracing::debug!("Removing stale artifact {}", path.display());
        fs_err::remove_file(path)?;
    }
    Ok(())
}
