use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::TranscriptError;

const SHORT_LINK_HOST: &str = "youtu.be";
const PLATFORM_DOMAIN: &str = "youtube";

/// Canonical YouTube video id, resolved from a bare id or a video URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    /// Resolve a raw input line into a video id.
    ///
    /// Accepted shapes:
    /// - a bare id (10-19 characters of `[A-Za-z0-9_-]`), returned unchanged
    /// - `https://youtu.be/<id>`
    /// - any `youtube` host carrying a `v` query parameter
    ///
    /// # Errors
    /// - `TranscriptError::InvalidInput` when none of the shapes match.
    pub fn parse(raw: &str) -> Result<Self, TranscriptError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TranscriptError::InvalidInput(
                "Empty video id/URL provided".to_string(),
            ));
        }

        if looks_like_id(raw) {
            return Ok(Self(raw.to_string()));
        }

        let parsed = Url::parse(raw)
            .map_err(|_| unrecognised(raw))?;

        match parsed.host_str() {
            Some(SHORT_LINK_HOST) => {
                let id = parsed.path().trim_start_matches('/');
                if id.is_empty() {
                    return Err(TranscriptError::InvalidInput(format!(
                        "Unable to determine video id from short URL: {}",
                        raw
                    )));
                }
                Ok(Self(id.to_string()))
            }
            Some(host) if host.contains(PLATFORM_DOMAIN) => parsed
                .query_pairs()
                .find(|(key, value)| key == "v" && !value.is_empty())
                .map(|(_, value)| Self(value.into_owned()))
                .ok_or_else(|| unrecognised(raw)),
            _ => Err(unrecognised(raw)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page URL, used when handing the id to yt-dlp
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

fn unrecognised(raw: &str) -> TranscriptError {
    TranscriptError::InvalidInput(format!("Unrecognised YouTube video URL or id: {}", raw))
}

fn looks_like_id(raw: &str) -> bool {
    (10..20).contains(&raw.len())
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl FromStr for VideoId {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keep only the lines that should reach the resolver: trimmed, non-empty,
/// and not starting with `#`.
pub fn input_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}
