use async_trait::async_trait;
use std::sync::Arc;

use super::TranscriptSource;
use crate::captions::{self, CaptionFormat};
use crate::clients::{HttpClient, MetadataExtractor, VideoCaptions};
use crate::resolver::VideoId;
use crate::TranscriptError;

/// A downloadable caption track found through yt-dlp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionCandidate {
    pub url: String,
    pub ext: String,
}

/// Flatten the caption maps into download order: human tracks before automatic
/// ones, languages in priority order, tracks in the order yt-dlp lists them.
pub fn caption_candidates(captions: &VideoCaptions, languages: &[String]) -> Vec<CaptionCandidate> {
    [&captions.subtitles, &captions.automatic_captions]
        .into_iter()
        .flat_map(|category| {
            languages
                .iter()
                .filter_map(move |language| category.get(language))
                .flatten()
        })
        .filter_map(|track| {
            track.url.as_ref().map(|url| CaptionCandidate {
                url: url.clone(),
                ext: track.ext.clone(),
            })
        })
        .collect()
}

/// Last-resort source: enumerate tracks with yt-dlp and download them directly
pub struct YtDlpSource {
    extractor: Arc<dyn MetadataExtractor>,
    http: Arc<dyn HttpClient>,
    languages: Vec<String>,
}

impl YtDlpSource {
    pub fn new(
        extractor: Arc<dyn MetadataExtractor>,
        http: Arc<dyn HttpClient>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            extractor,
            http,
            languages,
        }
    }

    async fn download_candidate(
        &self,
        candidate: &CaptionCandidate,
        format: CaptionFormat,
    ) -> Result<Option<String>, TranscriptError> {
        let response = self.http.get(&candidate.url).await?;

        if response.is_unavailable() {
            tracing::debug!("Caption track unavailable (HTTP {}): {}", response.status, candidate.url);
            return Ok(None);
        }

        if !response.is_success() {
            return Err(TranscriptError::Download(format!(
                "HTTP error {} while downloading caption track {}",
                response.status, candidate.url
            )));
        }

        captions::normalize(&response.body, format)
    }
}

#[async_trait]
impl TranscriptSource for YtDlpSource {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, video_id: &VideoId) -> Result<String, TranscriptError> {
        let captions = self.extractor.caption_tracks(video_id).await?;
        let candidates = caption_candidates(&captions, &self.languages);
        tracing::debug!("yt-dlp found {} caption candidates for {}", candidates.len(), video_id);

        for candidate in &candidates {
            let Some(format) = CaptionFormat::from_extension(&candidate.ext) else {
                tracing::debug!("Skipping unsupported caption format: {}", candidate.ext);
                continue;
            };

            if let Some(transcript) = self.download_candidate(candidate, format).await? {
                return Ok(transcript);
            }
        }

        Err(TranscriptError::NotAvailable(format!(
            "yt-dlp found no usable captions for {} in languages {:?}",
            video_id, self.languages
        )))
    }
}
