//! Change sets: batches of add/remove edits against a named list
//!
//! A [`ChangeSet`] does not know where its list lives. The editor resolves
//! every node against the artifact at application time, which is also where
//! duplicates and already-present entries are filtered out.

use std::collections::HashSet;

use crate::error::{Result, StubError};

/// Quote character used when rendering a string element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

impl QuoteStyle {
    pub fn as_char(self) -> char {
        match self {
            QuoteStyle::Double => '"',
            QuoteStyle::Single => '\'',
        }
    }
}

/// One element to add to or remove from a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNode {
    /// Identifier the element is matched by (the unquoted stub name)
    pub value: String,
    /// Fragment spliced into the list when the node is added
    pub children: String,
}

impl ChangeNode {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let children = render(&value, QuoteStyle::Double);
        Self { value, children }
    }

    /// Render the node for a list that uses `quote`
    pub fn render(&self, quote: QuoteStyle) -> String {
        match quote {
            QuoteStyle::Double => self.children.clone(),
            QuoteStyle::Single => render(&self.value, quote),
        }
    }
}

fn render(value: &str, quote: QuoteStyle) -> String {
    let q = quote.as_char();
    let mut out = String::with_capacity(value.len() + 2);
    out.push(q);
    for ch in value.chars() {
        if ch == '\\' || ch == q {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push(q);
    out
}

/// Ordered add and remove edits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub add: Vec<ChangeNode>,
    pub remove: Vec<ChangeNode>,
}

impl ChangeSet {
    /// Build a change set with one node per string, keeping input order
    pub fn from_strings<A, R>(add: A, remove: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            add: add.into_iter().map(ChangeNode::new).collect(),
            remove: remove.into_iter().map(ChangeNode::new).collect(),
        }
    }

    /// Change set that only adds
    pub fn adding<A>(add: A) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self::from_strings(add, Vec::<String>::new())
    }

    /// Change set that only removes
    pub fn removing<R>(remove: R) -> Self
    where
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self::from_strings(Vec::<String>::new(), remove)
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Reject change sets that add and remove the same identifier
    pub fn validate(&self) -> Result<()> {
        let removed: HashSet<&str> = self.remove.iter().map(|n| n.value.as_str()).collect();
        if let Some(node) = self.add.iter().find(|n| removed.contains(n.value.as_str())) {
            return Err(StubError::ContradictoryChange {
                name: node.value.clone(),
            });
        }
        Ok(())
    }
}

/// Turn optional CLI values into a change set
///
/// `None` means "leave the list alone" and stays `None`; an empty vector is a
/// real (empty) change.
pub fn create_changeset(modules: Option<Vec<String>>) -> Option<ChangeSet> {
    modules.map(ChangeSet::adding)
}
