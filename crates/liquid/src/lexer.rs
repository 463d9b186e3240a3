//! Splits raw template source into text, output and tag tokens.
//!
//! The lexer understands whitespace-control markers (`{{-`, `-%}}`) and
//! treats `{% raw %}` bodies as literal text. Everything else is left for
//! the block parser.

use crate::error::LiquidError;

/// A raw token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawToken {
    Text(String),
    /// `{{ markup }}`
    Output { markup: String },
    /// `{% name markup %}`
    Tag { name: String, markup: String },
}

/// Tokenizes template source.
pub fn tokenize(source: &str) -> Result<Vec<RawToken>, LiquidError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    // Deferred trim applied to the start of the next text token.
    let mut trim_next = false;

    while !rest.is_empty() {
        let Some(open) = find_opening(rest) else {
            push_text(&mut tokens, rest, trim_next, false);
            break;
        };

        let (text, after_text) = rest.split_at(open.position);
        let trim_text_end = open.trim_left;
        push_text(&mut tokens, text, trim_next, trim_text_end);
        trim_next = false;

        let body_start = open.position + open.marker_len;
        let body = &rest[body_start..];
        let close = find_closing(body, open.kind).ok_or_else(|| {
            LiquidError::Parse(format!(
                "unterminated {} starting near '{}'",
                open.kind.describe(),
                snippet(after_text)
            ))
        })?;

        let mut markup = body[..close.position].trim();
        if let Some(stripped) = markup.strip_suffix('-') {
            // `-%}` / `-}}` whitespace control.
            markup = stripped.trim_end();
            trim_next = true;
        }

        match open.kind {
            DelimiterKind::Output => tokens.push(RawToken::Output {
                markup: markup.to_string(),
            }),
            DelimiterKind::Tag => {
                let (name, tag_markup) = split_tag(markup);
                if name == "raw" {
                    let after_close = &body[close.position + close.marker_len..];
                    let (raw_body, consumed) = take_raw_body(after_close)?;
                    tokens.push(RawToken::Text(raw_body.to_string()));
                    rest = &after_close[consumed..];
                    continue;
                }
                tokens.push(RawToken::Tag {
                    name: name.to_string(),
                    markup: tag_markup.to_string(),
                });
            }
        }

        rest = &body[close.position + close.marker_len..];
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DelimiterKind {
    Output,
    Tag,
}

impl DelimiterKind {
    fn describe(self) -> &'static str {
        match self {
            DelimiterKind::Output => "output markup '{{'",
            DelimiterKind::Tag => "tag markup '{%'",
        }
    }
}

struct Opening {
    position: usize,
    marker_len: usize,
    kind: DelimiterKind,
    trim_left: bool,
}

struct Closing {
    position: usize,
    marker_len: usize,
}

fn find_opening(input: &str) -> Option<Opening> {
    let output = input.find("{{");
    let tag = input.find("{%");
    let (position, kind) = match (output, tag) {
        (Some(o), Some(t)) if o < t => (o, DelimiterKind::Output),
        (Some(_), Some(t)) => (t, DelimiterKind::Tag),
        (Some(o), None) => (o, DelimiterKind::Output),
        (None, Some(t)) => (t, DelimiterKind::Tag),
        (None, None) => return None,
    };
    let trim_left = input[position + 2..].starts_with('-');
    Some(Opening {
        position,
        marker_len: if trim_left { 3 } else { 2 },
        kind,
        trim_left,
    })
}

/// Finds the matching closer, skipping over quoted strings so a `%}`
/// inside a string literal does not end the tag.
fn find_closing(body: &str, kind: DelimiterKind) -> Option<Closing> {
    let closer = match kind {
        DelimiterKind::Output => "}}",
        DelimiterKind::Tag => "%}",
    };
    // Byte-wise scan: markup may contain multi-byte characters inside
    // string literals, and the closers are pure ASCII.
    let bytes = body.as_bytes();
    let closer_bytes = closer.as_bytes();
    let mut i = 0;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => {
                if b == b'\'' || b == b'"' {
                    quote = Some(b);
                } else if bytes[i..].starts_with(closer_bytes) {
                    return Some(Closing {
                        position: i,
                        marker_len: closer.len(),
                    });
                }
            }
        }
        i += 1;
    }
    None
}

fn split_tag(markup: &str) -> (&str, &str) {
    let markup = markup.trim();
    match markup.find(char::is_whitespace) {
        Some(idx) => (&markup[..idx], markup[idx..].trim()),
        None => (markup, ""),
    }
}

/// Consumes everything up to (and including) `{% endraw %}`. Returns the
/// literal body and the number of bytes consumed.
fn take_raw_body(input: &str) -> Result<(&str, usize), LiquidError> {
    let mut search_from = 0;
    while let Some(offset) = input[search_from..].find("{%") {
        let start = search_from + offset;
        let rest = &input[start + 2..];
        let trimmed = rest.strip_prefix('-').unwrap_or(rest).trim_start();
        if trimmed.starts_with("endraw") {
            let close = rest
                .find("%}")
                .ok_or_else(|| LiquidError::Parse("unterminated {% endraw %}".to_string()))?;
            let consumed = start + 2 + close + 2;
            return Ok((&input[..start], consumed));
        }
        search_from = start + 2;
    }
    Err(LiquidError::UnclosedTag("raw".to_string()))
}

fn push_text(tokens: &mut Vec<RawToken>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start();
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        tokens.push(RawToken::Text(text.to_string()));
    }
}

fn snippet(input: &str) -> &str {
    &input[..input.len().min(24)]
}
