use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::config::YtDlpConfig;
use crate::resolver::VideoId;
use crate::TranscriptError;

/// One caption track descriptor from `yt-dlp --dump-json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CaptionTrack {
    #[serde(default)]
    pub ext: String,

    // live_chat and some data-only entries have no URL
    #[serde(default)]
    pub url: Option<String>,
}

impl CaptionTrack {
    pub fn new(ext: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            ext: ext.into(),
            url: Some(url.into()),
        }
    }
}

/// The caption part of the yt-dlp info dict
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoCaptions {
    /// Human-authored tracks, keyed by language code
    #[serde(default)]
    pub subtitles: HashMap<String, Vec<CaptionTrack>>,

    /// Auto-generated tracks, keyed by language code
    #[serde(default)]
    pub automatic_captions: HashMap<String, Vec<CaptionTrack>>,
}

/// Media-metadata extractor that can enumerate caption tracks
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn caption_tracks(&self, video_id: &VideoId) -> Result<VideoCaptions, TranscriptError>;
}

/// Caption track discovery using yt-dlp
pub struct YtDlp {
    yt_dlp_path: String,
    timeout: Duration,
}

impl YtDlp {
    pub fn new(config: &YtDlpConfig) -> Self {
        Self {
            yt_dlp_path: config.path.clone(),
            timeout: config.timeout(),
        }
    }

    /// Parse the JSON printed by `--dump-json`
    pub fn parse_info(json: &[u8]) -> Result<VideoCaptions, TranscriptError> {
        serde_json::from_slice(json).map_err(|e| {
            TranscriptError::Download(format!("Failed to parse yt-dlp output: {}", e))
        })
    }
}

#[async_trait]
impl MetadataExtractor for YtDlp {
    async fn caption_tracks(&self, video_id: &VideoId) -> Result<VideoCaptions, TranscriptError> {
        tracing::debug!("Listing caption tracks with yt-dlp for: {}", video_id);

        let url = video_id.watch_url();
        let mut command = Command::new(&self.yt_dlp_path);
        command
            .args([
                "--dump-json",
                "--skip-download",
                "--no-playlist",
                "--no-warnings",
                url.as_str(),
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                TranscriptError::Download(format!(
                    "yt-dlp timed out after {}s for {}",
                    self.timeout.as_secs(),
                    video_id
                ))
            })?
            .map_err(|e| {
                TranscriptError::Download(format!("Failed to run {}: {}", self.yt_dlp_path, e))
            })?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptError::Download(format!(
                "yt-dlp failed: {}",
                error.trim()
            )));
        }

        Self::parse_info(&output.stdout)
    }
}
