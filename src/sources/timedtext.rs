use async_trait::async_trait;
use std::sync::Arc;

use super::TranscriptSource;
use crate::captions::{self, CaptionFormat};
use crate::clients::HttpClient;
use crate::resolver::VideoId;
use crate::TranscriptError;

/// Official timedtext endpoint, queried once per language in json3 format
pub struct TimedTextSource {
    http: Arc<dyn HttpClient>,
    endpoint: String,
    languages: Vec<String>,
}

impl TimedTextSource {
    pub fn new(http: Arc<dyn HttpClient>, endpoint: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            languages,
        }
    }

    fn caption_url(&self, video_id: &VideoId, language: &str) -> String {
        format!(
            "{}?lang={}&v={}&fmt=json3",
            self.endpoint,
            urlencoding::encode(language),
            urlencoding::encode(video_id.as_str())
        )
    }

    /// Download one language; `Ok(None)` means this language has nothing
    async fn fetch_language(
        &self,
        video_id: &VideoId,
        language: &str,
    ) -> Result<Option<String>, TranscriptError> {
        let response = self.http.get(&self.caption_url(video_id, language)).await?;

        if response.is_unavailable() {
            tracing::debug!("No {} captions for {} (HTTP {})", language, video_id, response.status);
            return Ok(None);
        }

        if !response.is_success() {
            return Err(TranscriptError::Download(format!(
                "HTTP error {} while downloading transcript for {}",
                response.status, video_id
            )));
        }

        captions::normalize(&response.body, CaptionFormat::Json3)
    }
}

#[async_trait]
impl TranscriptSource for TimedTextSource {
    fn name(&self) -> &'static str {
        "timedtext"
    }

    async fn fetch(&self, video_id: &VideoId) -> Result<String, TranscriptError> {
        for language in &self.languages {
            if let Some(transcript) = self.fetch_language(video_id, language).await? {
                return Ok(transcript);
            }
        }

        Err(TranscriptError::NotAvailable(format!(
            "Transcript not available from timedtext in languages {:?}",
            self.languages
        )))
    }
}
