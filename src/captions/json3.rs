use serde::Deserialize;

use super::join_fragments;
use crate::TranscriptError;

/// YouTube json3 caption document
#[derive(Debug, Deserialize)]
struct Json3Document {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    // Metadata events (window styles, positions) carry no segments
    #[serde(default)]
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: Option<String>,
}

/// Concatenate every non-empty segment in event order, one per line.
pub fn parse(payload: &str) -> Result<String, TranscriptError> {
    let document: Json3Document = serde_json::from_str(payload).map_err(|e| {
        TranscriptError::Download(format!("Failed to parse json3 caption payload: {}", e))
    })?;

    let segments = document
        .events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .flatten()
        .filter_map(|segment| segment.utf8.as_deref());

    Ok(join_fragments(segments))
}
