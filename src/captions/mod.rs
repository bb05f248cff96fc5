use serde::{Deserialize, Serialize};

use crate::TranscriptError;

pub mod json3;
pub mod subtitle;

/// Caption payload formats the normalizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionFormat {
    Json3,
    Vtt,
    Srt,
}

impl CaptionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptionFormat::Json3 => "json3",
            CaptionFormat::Vtt => "vtt",
            CaptionFormat::Srt => "srt",
        }
    }

    /// Map a track extension reported by the downloader to a format.
    /// XML flavours (srv1-3, ttml) are not supported and return `None`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json3" => Some(CaptionFormat::Json3),
            "vtt" | "webvtt" => Some(CaptionFormat::Vtt),
            "srt" => Some(CaptionFormat::Srt),
            _ => None,
        }
    }
}

/// Convert a raw caption payload into plain newline-joined text.
///
/// Returns `Ok(None)` for blank payloads and for payloads that contain no text
/// once cleaned up.
///
/// # Errors
/// - `TranscriptError::Download` if a json3 payload is not valid JSON.
pub fn normalize(payload: &str, format: CaptionFormat) -> Result<Option<String>, TranscriptError> {
    if payload.trim().is_empty() {
        return Ok(None);
    }

    let text = match format {
        CaptionFormat::Json3 => json3::parse(payload)?,
        CaptionFormat::Vtt | CaptionFormat::Srt => subtitle::to_text(payload),
    };

    Ok(non_empty(text))
}

/// Collapse internal newlines and trim one caption fragment
pub fn clean_fragment(text: &str) -> String {
    text.replace(['\r', '\n'], " ").trim().to_string()
}

/// Join fragments line by line, dropping those that are empty after cleaning
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .map(clean_fragment)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Treat whitespace-only text as no transcript
pub fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
