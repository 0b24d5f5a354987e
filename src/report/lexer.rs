//! Splits template text into literal text and `{{ action }}` segments
//!
//! Handles `{{-` / `-}}` whitespace trimming and drops `{{/* comments */}}`.

/// A piece of template source
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    /// Action body with delimiters and trim markers removed
    Action(String),
}

/// Error during lexing
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub position: usize,
}

impl LexError {
    fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl std::error::Error for LexError {}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

pub fn lex(source: &str) -> Result<Vec<Segment>, LexError> {
    let mut segments = Vec::new();
    let mut rest = source;
    let mut offset = 0;
    let mut trim_next = false;

    while let Some(open) = rest.find(OPEN) {
        let mut text = &rest[..open];
        if trim_next {
            text = text.trim_start();
        }

        let after_open = &rest[open + OPEN.len()..];
        let (body, trim_left) = match strip_trim_marker_left(after_open) {
            Some(body) => (body, true),
            None => (after_open, false),
        };
        if trim_left {
            text = text.trim_end();
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text.to_string()));
        }

        let body_offset = offset + (rest.len() - body.len());

        // Comments may contain "}}" before their closing "*/"
        let search_from = if body.trim_start().starts_with("/*") {
            body.find("*/")
                .map(|i| i + 2)
                .ok_or_else(|| LexError::new("unclosed comment", body_offset))?
        } else {
            0
        };
        let close = body[search_from..]
            .find(CLOSE)
            .map(|i| i + search_from)
            .ok_or_else(|| LexError::new("unclosed action", offset + open))?;

        let mut content = &body[..close];
        trim_next = false;
        if let Some(stripped) = strip_trim_marker_right(content) {
            content = stripped;
            trim_next = true;
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(LexError::new("empty action", body_offset));
        }
        if !(content.starts_with("/*") && content.ends_with("*/")) {
            segments.push(Segment::Action(content.to_string()));
        }

        let consumed = rest.len() - body.len() + close + CLOSE.len();
        offset += consumed;
        rest = &rest[consumed..];
    }

    let tail = if trim_next { rest.trim_start() } else { rest };
    if !tail.is_empty() {
        segments.push(Segment::Text(tail.to_string()));
    }

    Ok(segments)
}

/// `{{- ` trims preceding whitespace; the dash must be followed by whitespace
fn strip_trim_marker_left(body: &str) -> Option<&str> {
    body.strip_prefix('-')
        .filter(|rest| rest.starts_with(char::is_whitespace))
}

/// ` -}}` trims following whitespace; the dash must be preceded by whitespace
fn strip_trim_marker_right(content: &str) -> Option<&str> {
    content
        .strip_suffix('-')
        .filter(|rest| rest.ends_with(char::is_whitespace))
}
