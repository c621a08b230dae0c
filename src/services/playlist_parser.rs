//! M3U playlist parser
//!
//! Each line is classified as metadata (`#EXTINF:`), comment (any other `#`
//! line) or locator (anything else). A three-state machine pairs every
//! metadata line with the next locator line. Parsing never fails: lines that
//! do not fit the current state are skipped.

use crate::models::{Channel, PLACEHOLDER_LOGO};

const EXTINF_TAG: &str = "#EXTINF:";
const COMMENT_MARKER: char = '#';
const LOGO_ATTR: &str = "tvg-logo=\"";
const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Name used when an `#EXTINF` line carries no title
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Display data carried by an `#EXTINF` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMetadata {
    pub name: String,
    pub logo_url: String,
}

/// Classification of one trimmed, non-empty playlist line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Metadata(EntryMetadata),
    Comment,
    Locator(&'a str),
}

/// Parser state between lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserState {
    /// Start of document, nothing seen yet
    Idle,
    /// Metadata seen, waiting for its stream locator
    AwaitingUrl(EntryMetadata),
    /// Last entry completed, waiting for the next metadata line
    AwaitingMetadata,
}

/// Metadata paired with its stream locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedEntry {
    pub metadata: EntryMetadata,
    pub stream_url: String,
}

/// Classify a trimmed line
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with(EXTINF_TAG) {
        LineKind::Metadata(parse_extinf(line))
    } else if line.starts_with(COMMENT_MARKER) {
        LineKind::Comment
    } else {
        LineKind::Locator(line)
    }
}

/// Parse an EXTINF line
/// Format: #EXTINF:duration tvg-id="..." tvg-logo="..." group-title="...",Title
///
/// The title is everything after the first comma.
fn parse_extinf(line: &str) -> EntryMetadata {
    let name = line
        .find(',')
        .map(|idx| line[idx + 1..].trim())
        .filter(|title| !title.is_empty())
        .unwrap_or(UNKNOWN_CHANNEL)
        .to_string();

    let logo_url = extract_logo(line)
        .unwrap_or(PLACEHOLDER_LOGO)
        .to_string();

    EntryMetadata { name, logo_url }
}

/// First non-empty quoted `tvg-logo` value on the line
fn extract_logo(line: &str) -> Option<&str> {
    line.match_indices(LOGO_ATTR).find_map(|(idx, _)| {
        let rest = &line[idx + LOGO_ATTR.len()..];
        let end = rest.find('"')?;
        let value = &rest[..end];
        (!value.is_empty()).then_some(value)
    })
}

/// Advance the state machine by one line.
///
/// A metadata line always starts a fresh entry, discarding an unterminated
/// one. A locator only completes an entry when one is pending.
pub fn step(state: ParserState, line: &str) -> (ParserState, Option<CompletedEntry>) {
    match (classify_line(line), state) {
        (LineKind::Metadata(metadata), _) => (ParserState::AwaitingUrl(metadata), None),
        (LineKind::Locator(url), ParserState::AwaitingUrl(metadata)) => (
            ParserState::AwaitingMetadata,
            Some(CompletedEntry {
                metadata,
                stream_url: url.to_string(),
            }),
        ),
        (LineKind::Comment, state) | (LineKind::Locator(_), state) => (state, None),
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `_` and lower-case
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Deterministic playlist channel id: `{category}_{sanitized name}_{index}`
pub fn generate_channel_id(category_id: &str, name: &str, index: usize) -> String {
    format!("{}_{}_{}", category_id, sanitize_name(name), index)
}

/// Parse playlist text into channels owned by the given category.
///
/// Output preserves source order and every id is unique within the call.
pub fn parse(text: &str, category_id: &str, category_name: &str) -> Vec<Channel> {
    let mut channels = Vec::new();
    let mut state = ParserState::Idle;
    let mut dropped = 0usize;

    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let was_pending = matches!(state, ParserState::AwaitingUrl(_));
        let is_metadata = line.starts_with(EXTINF_TAG);
        if was_pending && is_metadata {
            dropped += 1;
        }

        let (next, completed) = step(state, line);
        state = next;

        if let Some(entry) = completed {
            channels.push(Channel {
                id: generate_channel_id(category_id, &entry.metadata.name, channels.len()),
                name: entry.metadata.name,
                logo_url: entry.metadata.logo_url,
                stream_url: entry.stream_url,
                category_id: category_id.to_string(),
                category_name: category_name.to_string(),
            });
        }
    }

    if matches!(state, ParserState::AwaitingUrl(_)) {
        dropped += 1;
    }

    tracing::debug!(
        category_id,
        parsed = channels.len(),
        dropped,
        "Playlist parsed"
    );

    channels
}
