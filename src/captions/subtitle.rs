use regex::Regex;
use std::sync::OnceLock;

/// Inline cue markup: `<c>`, `</c>`, `<00:00:01.520>`, `<v Speaker>`, `<i>`
fn inline_tag_regex() -> &'static Regex {
    static INLINE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    INLINE_TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Failed to compile inline tag regex"))
}

fn is_time_range(line: &str) -> bool {
    line.contains("-->")
}

fn is_cue_index(line: &str) -> bool {
    line.chars().all(|c| c.is_ascii_digit())
}

fn is_header(line: &str) -> bool {
    line.starts_with("WEBVTT") || line.starts_with("Kind:") || line.starts_with("Language:")
}

/// WebVTT metadata blocks run until the next blank line
fn is_metadata_block_start(line: &str) -> bool {
    ["NOTE", "STYLE", "REGION"].iter().any(|keyword| {
        line.strip_prefix(keyword)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}

/// Strip SRT/WebVTT structure and keep only the spoken text, one cue line per
/// output line. Running it on its own output returns the same text.
pub fn to_text(payload: &str) -> String {
    let payload = payload.strip_prefix('\u{FEFF}').unwrap_or(payload);
    // Metadata blocks only exist in WebVTT; the text output never starts with the header
    let is_webvtt = payload.starts_with("WEBVTT");

    let mut lines = Vec::new();
    let mut at_block_start = true;
    let mut in_metadata_block = false;

    for raw_line in payload.lines() {
        if raw_line.trim().is_empty() {
            at_block_start = true;
            in_metadata_block = false;
            continue;
        }

        let stripped = inline_tag_regex().replace_all(raw_line, "");
        let line = stripped.trim();

        if is_webvtt && at_block_start && is_metadata_block_start(line) {
            in_metadata_block = true;
        }
        at_block_start = false;

        if line.is_empty()
            || in_metadata_block
            || is_cue_index(line)
            || is_time_range(line)
            || is_header(line)
        {
            continue;
        }
        lines.push(line.to_string());
    }

    lines.join("\n")
}
