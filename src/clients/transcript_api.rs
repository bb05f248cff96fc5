use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use crate::Result;

/// One text fragment returned by a transcript library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSnippet {
    pub text: String,
}

impl TranscriptSnippet {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Conditions a transcript library reports back
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("No transcript found: {0}")]
    NoTranscriptFound(String),

    #[error("Transcripts are disabled: {0}")]
    TranscriptsDisabled(String),

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Transcript library error: {0}")]
    Other(String),
}

impl LibraryError {
    /// Sort a library failure message into one of the known conditions
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("disabled") {
            LibraryError::TranscriptsDisabled(message)
        } else if lower.contains("no transcript") || lower.contains("not found") {
            LibraryError::NoTranscriptFound(message)
        } else if lower.contains("unavailable") || lower.contains("no longer available") {
            LibraryError::VideoUnavailable(message)
        } else {
            LibraryError::Other(message)
        }
    }
}

/// Third-party transcript fetcher
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptLibrary: Send + Sync {
    /// Fetch the first transcript available in `languages`, in priority order
    async fn fetch_snippets(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> std::result::Result<Vec<TranscriptSnippet>, LibraryError>;
}

/// `yt-transcript-rs` adapter
pub struct YtTranscriptApiClient {
    api: YouTubeTranscriptApi,
    timeout: Duration,
}

impl YtTranscriptApiClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .context("Failed to create transcript API client")?;

        Ok(Self { api, timeout })
    }
}

#[async_trait]
impl TranscriptLibrary for YtTranscriptApiClient {
    async fn fetch_snippets(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> std::result::Result<Vec<TranscriptSnippet>, LibraryError> {
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

        let transcript = tokio::time::timeout(
            self.timeout,
            self.api.fetch_transcript(video_id, &languages, false),
        )
        .await
        .map_err(|_| {
            LibraryError::Other(format!(
                "timed out after {}s fetching transcript for {}",
                self.timeout.as_secs(),
                video_id
            ))
        })?
        .map_err(|e| LibraryError::classify(e.to_string()))?;

        Ok(transcript
            .snippets
            .into_iter()
            .map(|snippet| TranscriptSnippet { text: snippet.text })
            .collect())
    }
}
