//! Narrow interfaces over the external collaborators the transcript sources
//! talk to, plus their production adapters.

use async_trait::async_trait;

pub mod http;
pub mod transcript_api;
pub mod ytdlp;

pub use http::ReqwestHttpClient;
pub use transcript_api::{LibraryError, TranscriptLibrary, TranscriptSnippet, YtTranscriptApiClient};
pub use ytdlp::{CaptionTrack, MetadataExtractor, VideoCaptions, YtDlp};

use crate::TranscriptError;

/// Status and body of a completed GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 403 and 404 mean "no captions here", not a broken request
    pub fn is_unavailable(&self) -> bool {
        matches!(self.status, 403 | 404)
    }
}

/// Plain HTTP GET used for caption payloads.
///
/// Implementations return any completed response regardless of status;
/// only transport failures (DNS, TLS, timeouts) become errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TranscriptError>;
}
