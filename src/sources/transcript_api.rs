use async_trait::async_trait;
use std::sync::Arc;

use super::TranscriptSource;
use crate::captions::{join_fragments, non_empty};
use crate::clients::{LibraryError, TranscriptLibrary};
use crate::resolver::VideoId;
use crate::TranscriptError;

/// Transcript library fallback
pub struct TranscriptApiSource {
    library: Arc<dyn TranscriptLibrary>,
    languages: Vec<String>,
}

impl TranscriptApiSource {
    pub fn new(library: Arc<dyn TranscriptLibrary>, languages: Vec<String>) -> Self {
        Self { library, languages }
    }
}

impl From<LibraryError> for TranscriptError {
    fn from(error: LibraryError) -> Self {
        match error {
            LibraryError::NoTranscriptFound(_) | LibraryError::TranscriptsDisabled(_) => {
                TranscriptError::NotAvailable(error.to_string())
            }
            LibraryError::VideoUnavailable(_) | LibraryError::Other(_) => {
                TranscriptError::Download(error.to_string())
            }
        }
    }
}

#[async_trait]
impl TranscriptSource for TranscriptApiSource {
    fn name(&self) -> &'static str {
        "transcript-api"
    }

    async fn fetch(&self, video_id: &VideoId) -> Result<String, TranscriptError> {
        let snippets = self
            .library
            .fetch_snippets(video_id.as_str(), &self.languages)
            .await?;

        let text = join_fragments(snippets.iter().map(|snippet| snippet.text.as_str()));

        non_empty(text).ok_or_else(|| {
            TranscriptError::NotAvailable(format!("Transcript library returned no text for {}", video_id))
        })
    }
}
