use async_trait::async_trait;
use std::sync::Arc;

pub mod timedtext;
pub mod transcript_api;
pub mod ytdlp;

pub use timedtext::TimedTextSource;
pub use transcript_api::TranscriptApiSource;
pub use ytdlp::YtDlpSource;

use crate::clients::{HttpClient, ReqwestHttpClient, YtDlp, YtTranscriptApiClient};
use crate::config::Config;
use crate::resolver::VideoId;
use crate::{Result, TranscriptError};

/// One independent way of obtaining a transcript.
///
/// Sources return non-empty plain text, `TranscriptError::NotAvailable` when
/// they found nothing for the configured languages, or
/// `TranscriptError::Download` when something broke along the way.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn fetch(&self, video_id: &VideoId) -> std::result::Result<String, TranscriptError>;
}

/// Ordered fallback chain of transcript sources
pub struct SourceChain {
    sources: Vec<Box<dyn TranscriptSource>>,
    languages: Vec<String>,
}

impl SourceChain {
    pub fn new(languages: Vec<String>) -> Self {
        Self {
            sources: Vec::new(),
            languages,
        }
    }

    /// Build the default chain: timedtext, transcript library, yt-dlp
    pub fn from_config(config: &Config) -> Result<Self> {
        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new(&config.http)?);
        let library = Arc::new(YtTranscriptApiClient::new(config.http.timeout())?);
        let extractor = Arc::new(YtDlp::new(&config.ytdlp));
        let languages = config.languages.clone();

        let chain = Self::new(languages.clone())
            .with_source(Box::new(TimedTextSource::new(
                http.clone(),
                config.timedtext.endpoint.clone(),
                languages.clone(),
            )))
            .with_source(Box::new(TranscriptApiSource::new(library, languages.clone())))
            .with_source(Box::new(YtDlpSource::new(extractor, http, languages)));

        Ok(chain)
    }

    /// Append a source; sources run in registration order
    pub fn with_source(mut self, source: Box<dyn TranscriptSource>) -> Self {
        self.register(source);
        self
    }

    pub fn register(&mut self, source: Box<dyn TranscriptSource>) {
        self.sources.push(source);
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Try each source in turn and return the first non-empty transcript.
    ///
    /// When every source fails, any not-available report wins over download
    /// failures; otherwise the last download failure is returned.
    pub async fn fetch(&self, video_id: &VideoId) -> std::result::Result<String, TranscriptError> {
        let mut not_available = false;
        let mut last_error: Option<TranscriptError> = None;

        for source in &self.sources {
            match source.fetch(video_id).await {
                Ok(transcript) if !transcript.trim().is_empty() => {
                    tracing::info!("Transcript for {} found via {}", video_id, source.name());
                    return Ok(transcript);
                }
                Ok(_) => {
                    tracing::info!("{} returned an empty transcript for {}", source.name(), video_id);
                    not_available = true;
                }
                Err(err) if err.is_not_available() => {
                    tracing::info!("{}: {} ({})", source.name(), err, video_id);
                    not_available = true;
                }
                Err(err) => {
                    tracing::warn!("{} failed for {}: {}", source.name(), video_id, err);
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if !not_available => Err(err),
            _ => Err(TranscriptError::NotAvailable(format!(
                "Transcript not available in languages {:?}",
                self.languages
            ))),
        }
    }
}
