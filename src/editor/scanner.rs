//! Minimal scanner for list literals embedded in text
//!
//! Only the anchor and the bracketed span after it are ever looked at. The
//! scanner understands quoted strings, `#` comments and nested brackets,
//! which is enough for Python, TOML, JSON and YAML flow sequences.

use crate::changeset::QuoteStyle;

/// One top-level element of a list literal
#[derive(Debug, Clone)]
pub(crate) struct Element {
    /// Byte offset of the first character of the element
    pub start: usize,
    /// Byte offset one past the last character of the element
    pub end: usize,
    /// Unquoted value for string elements, raw text otherwise
    pub value: String,
    pub quote: Option<QuoteStyle>,
    /// Offset of the comma that follows the element, if any
    pub comma: Option<usize>,
}

/// Location of a list literal and its elements
#[derive(Debug, Clone)]
pub(crate) struct ListSpan {
    /// Offset of the opening `[`
    pub open: usize,
    /// Offset of the matching `]`
    pub close: usize,
    pub elements: Vec<Element>,
}

impl ListSpan {
    pub fn position(&self, value: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.value == value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.position(value).is_some()
    }

    pub fn quote_style(&self) -> QuoteStyle {
        self.elements
            .iter()
            .find_map(|e| e.quote)
            .unwrap_or_default()
    }
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

fn skip_ws(text: &str, mut i: usize) -> usize {
    let bytes = text.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// What `pos` sits in, judged from the start of its line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    Code,
    Comment,
    Quoted,
}

fn line_state(text: &str, pos: usize) -> LineState {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    for &b in &text.as_bytes()[line_start..pos] {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, b) {
            (Some(_), b'\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'#') => return LineState::Comment,
            _ => {}
        }
    }
    if quote.is_some() {
        LineState::Quoted
    } else {
        LineState::Code
    }
}

/// Find the `[` of the list assigned to `anchor`
///
/// Accepts `anchor = [`, `anchor: [`, `"anchor": [` and `'anchor' = [`.
pub(crate) fn find_anchor(text: &str, anchor: &str) -> Option<usize> {
    if anchor.is_empty() {
        return None;
    }
    let bytes = text.as_bytes();

    'candidates: for (pos, _) in text.match_indices(anchor) {
        let before = text[..pos].chars().next_back();
        let opening_quote = match before {
            Some(q @ ('"' | '\'')) => Some(q),
            Some(c) if is_ident(c) => continue,
            _ => None,
        };
        // A quoted key's opening quote must itself start in code
        let key_start = pos - opening_quote.map_or(0, char::len_utf8);
        if line_state(text, key_start) != LineState::Code {
            continue;
        }

        let mut i = pos + anchor.len();
        match opening_quote {
            Some(q) => {
                if !text[i..].starts_with(q) {
                    continue;
                }
                i += q.len_utf8();
            }
            None => {
                if text[i..].chars().next().is_some_and(is_ident) {
                    continue;
                }
            }
        }

        while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        match bytes.get(i) {
            Some(b'=') if bytes.get(i + 1) != Some(&b'=') => i += 1,
            Some(b':') => i += 1,
            _ => continue 'candidates,
        }
        i = skip_ws(text, i);
        if bytes.get(i) == Some(&b'[') {
            return Some(i);
        }
    }
    None
}

/// Offset one past the closing quote of the string starting at `start`
fn skip_string(bytes: &[u8], start: usize) -> Result<usize, String> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => break,
            b if b == quote => return Ok(i + 1),
            _ => i += 1,
        }
    }
    Err(format!("unterminated string starting at byte {start}"))
}

fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn make_element(text: &str, start: usize, end: usize, comma: Option<usize>) -> Element {
    let raw = &text[start..end];
    let bytes = text.as_bytes();
    let quote = match bytes[start] {
        b'"' => Some(QuoteStyle::Double),
        b'\'' => Some(QuoteStyle::Single),
        _ => None,
    };
    let single_literal = quote.is_some() && skip_string(bytes, start) == Ok(end);

    if single_literal {
        Element {
            start,
            end,
            value: unescape(&raw[1..raw.len() - 1]),
            quote,
            comma,
        }
    } else {
        Element {
            start,
            end,
            value: raw.to_string(),
            quote: None,
            comma,
        }
    }
}

/// Scan the list whose `[` is at `open`
///
/// Returns a human readable reason when the list is not terminated or not
/// well formed.
pub(crate) fn scan_list(text: &str, open: usize) -> Result<ListSpan, String> {
    let bytes = text.as_bytes();
    let mut elements = Vec::new();
    let mut current: Option<(usize, usize)> = None;
    let mut depth = 0usize;
    let mut i = open + 1;

    let extend = |current: &mut Option<(usize, usize)>, from: usize, to: usize| {
        *current = Some(match *current {
            Some((s, _)) => (s, to),
            None => (from, to),
        });
    };

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                let end = skip_string(bytes, i)?;
                extend(&mut current, i, end);
                i = end;
                continue;
            }
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'[' | b'(' | b'{' => {
                depth += 1;
                extend(&mut current, i, i + 1);
            }
            b']' if depth == 0 => {
                if let Some((s, e)) = current.take() {
                    elements.push(make_element(text, s, e, None));
                }
                return Ok(ListSpan {
                    open,
                    close: i,
                    elements,
                });
            }
            b')' | b'}' if depth == 0 => {
                return Err(format!("unbalanced '{}' at byte {i}", bytes[i] as char));
            }
            b']' | b')' | b'}' => {
                depth -= 1;
                extend(&mut current, i, i + 1);
            }
            b',' if depth == 0 => match current.take() {
                Some((s, e)) => elements.push(make_element(text, s, e, Some(i))),
                None => return Err(format!("empty list element before byte {i}")),
            },
            b if b.is_ascii_whitespace() => {}
            _ => extend(&mut current, i, i + 1),
        }
        i += 1;
    }

    Err("list is never closed".to_string())
}
