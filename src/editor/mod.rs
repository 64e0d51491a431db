//! Structured editing of list literals inside text artifacts
//!
//! The editor applies a [`ChangeSet`] to the one list assigned to an anchor
//! name (`stubs = [...]`, `"stubs": [...]`, `stubs: [...]`). Only the bytes
//! between the brackets ever change; everything before `[` and after `]` is
//! copied through untouched.
//!
//! Edits follow the style already present in the list:
//! - the quote character of the first string element
//! - one element per line when the closing bracket sits on its own line,
//!   indented like the last element
//! - the inline separator used between existing elements
//! - trailing commas, when the last element already has one
//!
//! Every edit re-scans the list, so a change set is applied as a sequence of
//! single-element edits. Presence checks make a second application a no-op.

mod scanner;

#[cfg(test)]
mod tests;

use std::path::Path;

use crate::changeset::{ChangeNode, ChangeSet};
use crate::common::fs::write_atomic;
use crate::error::{Result, StubError};

use scanner::{ListSpan, find_anchor, scan_list};

/// Indentation added inside an empty multi-line list
const DEFAULT_INDENT: &str = "    ";

/// Separator used after a comma when an inline list has nothing to copy
const DEFAULT_SEPARATOR: &str = " ";

/// A text artifact holding one list literal identified by `anchor`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListArtifact {
    text: String,
    anchor: String,
    /// Display name used in error messages
    origin: String,
}

impl ListArtifact {
    #[cfg(test)]
    pub fn new(text: impl Into<String>, anchor: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: anchor.into(),
            origin: "<memory>".to_string(),
        }
    }

    /// Read an artifact from disk
    pub fn load(path: &Path, anchor: impl Into<String>) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| StubError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            text,
            anchor: anchor.into(),
            origin: path.display().to_string(),
        })
    }

    /// Write the artifact as a complete replacement of `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.text.as_bytes())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Identifiers currently in the list, in order
    pub fn entries(&self) -> Result<Vec<String>> {
        let span = self.locate(&self.text)?;
        Ok(span.elements.into_iter().map(|e| e.value).collect())
    }

    fn locate(&self, text: &str) -> Result<ListSpan> {
        let open = find_anchor(text, &self.anchor).ok_or_else(|| StubError::AnchorNotFound {
            anchor: self.anchor.clone(),
            artifact: self.origin.clone(),
        })?;
        scan_list(text, open).map_err(|reason| StubError::MalformedArtifact {
            artifact: self.origin.clone(),
            reason,
        })
    }

    fn with_text(&self, text: String) -> Self {
        Self {
            text,
            anchor: self.anchor.clone(),
            origin: self.origin.clone(),
        }
    }
}

/// Apply `change` to the list in `artifact`
///
/// Removals run before additions. Identifiers already absent (for removals)
/// or present (for additions) are skipped.
pub fn apply(artifact: &ListArtifact, change: &ChangeSet) -> Result<ListArtifact> {
    change.validate()?;
    artifact.locate(&artifact.text)?;
    if change.is_empty() {
        return Ok(artifact.clone());
    }

    let mut text = artifact.text.clone();

    for node in &change.remove {
        let span = artifact.locate(&text)?;
        if let Some(index) = span.position(&node.value) {
            text = delete(&text, removal_cuts(&text, &span, index));
        }
    }

    for node in &change.add {
        let span = artifact.locate(&text)?;
        if !span.contains(&node.value) {
            text = insert(&text, insertion(&text, &span, node));
        }
    }

    Ok(artifact.with_text(text))
}

/// Delete the byte ranges in `cuts` from `text`
fn delete(text: &str, mut cuts: Vec<(usize, usize)>) -> String {
    cuts.sort_unstable();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in cuts {
        if start > cursor {
            out.push_str(&text[cursor..start]);
        }
        cursor = cursor.max(end);
    }
    out.push_str(&text[cursor..]);
    out
}

/// Insert `(offset, fragment)` pairs into `text`; equal offsets keep their order
fn insert(text: &str, mut inserts: Vec<(usize, String)>) -> String {
    inserts.sort_by_key(|(at, _)| *at);
    let mut out = String::with_capacity(text.len() + 64);
    let mut cursor = 0;
    for (at, fragment) in inserts {
        out.push_str(&text[cursor..at]);
        out.push_str(&fragment);
        cursor = at;
    }
    out.push_str(&text[cursor..]);
    out
}

fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t')
}

/// Leading whitespace of the line containing `pos`
fn line_indent(text: &str, pos: usize) -> &str {
    let start = line_start(text, pos);
    let line = &text[start..pos];
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Full line range (including its newline) when the element is alone on it
fn own_line(text: &str, span: &ListSpan, index: usize) -> Option<(usize, usize)> {
    let el = &span.elements[index];
    let start = line_start(text, el.start);
    if start <= span.open || !is_blank(&text[start..el.start]) {
        return None;
    }
    let after = match el.comma {
        Some(c) if text[el.end..c].contains('\n') => return None,
        Some(c) => c + 1,
        None => el.end,
    };
    let newline = after + text[after..span.close].find('\n')?;
    is_blank(&text[after..newline]).then_some((start, newline + 1))
}

/// Byte ranges to delete so that element `index` disappears cleanly
fn removal_cuts(text: &str, span: &ListSpan, index: usize) -> Vec<(usize, usize)> {
    let elements = &span.elements;
    let el = &elements[index];
    let prev = index.checked_sub(1).map(|i| &elements[i]);
    let next = elements.get(index + 1);

    // The previous element's comma dangles when the last element goes and
    // the list does not use trailing commas
    let dangling = match (prev, el.comma) {
        (Some(p), None) => p.comma.map(|c| (c, c + 1)),
        _ => None,
    };

    if let Some(line) = own_line(text, span, index) {
        return std::iter::once(line).chain(dangling).collect();
    }
    if let Some(n) = next {
        if !text[el.end..n.start].contains('\n') {
            return vec![(el.start, n.start)];
        }
    }
    if let Some(p) = prev {
        if next.is_none() && !text[p.end..el.start].contains('\n') {
            return vec![(p.end, el.end)];
        }
    }
    let end = el.comma.map_or(el.end, |c| c + 1);
    std::iter::once((el.start, end)).chain(dangling).collect()
}

/// Fragments to insert so that `node` becomes the new last element
fn insertion(text: &str, span: &ListSpan, node: &ChangeNode) -> Vec<(usize, String)> {
    let fragment = node.render(span.quote_style());

    let Some(last) = span.elements.last() else {
        let inner = &text[span.open + 1..span.close];
        if inner.contains('\n') {
            let indent = format!("{}{DEFAULT_INDENT}", line_indent(text, span.close));
            return vec![(span.open + 1, format!("\n{indent}{fragment},"))];
        }
        return vec![(span.open + 1, fragment)];
    };

    let after_last = last.comma.map_or(last.end, |c| c + 1);
    let newline = text[after_last..span.close]
        .find('\n')
        .map(|i| after_last + i);

    match newline {
        Some(newline) => {
            let start = line_start(text, last.start);
            let indent = if is_blank(&text[start..last.start]) {
                text[start..last.start].to_string()
            } else {
                format!("{}{DEFAULT_INDENT}", line_indent(text, last.start))
            };
            match last.comma {
                Some(_) => vec![(newline, format!("\n{indent}{fragment},"))],
                None => vec![
                    (last.end, ",".to_string()),
                    (newline, format!("\n{indent}{fragment}")),
                ],
            }
        }
        None => {
            let separator = span
                .elements
                .len()
                .checked_sub(2)
                .and_then(|i| span.elements[i].comma)
                .map(|c| &text[c + 1..last.start])
                .filter(|s| !s.contains('\n'))
                .unwrap_or(DEFAULT_SEPARATOR);
            vec![(last.end, format!(",{separator}{fragment}"))]
        }
    }
}
