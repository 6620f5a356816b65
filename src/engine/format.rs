//! Display pattern substitution.
//!
//! A pattern is literal text with positional placeholders. `{}` takes the
//! next state value in emission order; `{N}` takes state value `N` directly,
//! for patterns that read values out of emission order. `{{` and `}}` are
//! literal braces.

use std::fmt::Write;

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Next,
    Index(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unclosed '{{' at byte {0}")]
    Unclosed(usize),
    #[error("unmatched '}}' at byte {0}")]
    Unmatched(usize),
    #[error("invalid placeholder {{{0}}}")]
    InvalidPlaceholder(String),
}

pub fn parse(pattern: &str) -> Result<Vec<Segment<'_>>, PatternError> {
    let bytes = pattern.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                segments.push(Segment::Literal(&pattern[literal_start..=i]));
                i += 2;
                literal_start = i;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                segments.push(Segment::Literal(&pattern[literal_start..=i]));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                if literal_start < i {
                    segments.push(Segment::Literal(&pattern[literal_start..i]));
                }
                let close = pattern[i + 1..]
                    .find('}')
                    .map(|offset| i + 1 + offset)
                    .ok_or(PatternError::Unclosed(i))?;
                let inner = &pattern[i + 1..close];
                let segment = if inner.is_empty() {
                    Segment::Next
                } else {
                    inner
                        .parse::<usize>()
                        .map(Segment::Index)
                        .map_err(|_| PatternError::InvalidPlaceholder(inner.to_string()))?
                };
                segments.push(segment);
                i = close + 1;
                literal_start = i;
            }
            b'}' => return Err(PatternError::Unmatched(i)),
            _ => i += 1,
        }
    }

    if literal_start < pattern.len() {
        segments.push(Segment::Literal(&pattern[literal_start..]));
    }
    Ok(segments)
}

/// The state index each placeholder resolves to, in pattern order.
pub fn placeholder_indices(segments: &[Segment<'_>]) -> Vec<usize> {
    let mut next = 0;
    segments
        .iter()
        .filter_map(|segment| match *segment {
            Segment::Literal(_) => None,
            Segment::Next => {
                next += 1;
                Some(next - 1)
            }
            Segment::Index(index) => Some(index),
        })
        .collect()
}

/// Substitute `state` into `pattern`. Total: a malformed pattern renders
/// verbatim and a placeholder with no matching value renders as `?`.
pub fn render(pattern: &str, state: &[i64]) -> String {
    let Ok(segments) = parse(pattern) else {
        return pattern.to_string();
    };

    let mut out = String::with_capacity(pattern.len() + state.len() * 4);
    let mut next = 0;
    for segment in segments {
        let value = match segment {
            Segment::Literal(text) => {
                out.push_str(text);
                continue;
            }
            Segment::Next => {
                next += 1;
                state.get(next - 1)
            }
            Segment::Index(index) => state.get(index),
        };
        match value {
            Some(v) => {
                let _ = write!(out, "{v}");
            }
            None => out.push('?'),
        }
    }
    out
}
