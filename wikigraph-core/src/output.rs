//! Output types: triple sets, ordered tables and the join convention
//!
//! Multi-valued cells are joined with `"; "` throughout, and a claim
//! that rendered to nothing appears as the literal `unknown value`.
//! Both conventions are part of the external contract.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Literal emitted for a claim value that rendered to nothing.
pub const UNKNOWN_VALUE: &str = "unknown value";

/// Separator for multi-valued cells and alias lists.
pub const JOIN_SEPARATOR: &str = "; ";

/// Join rendered values, substituting [`UNKNOWN_VALUE`] for `None`s.
pub fn join_rendered(values: &[Option<String>]) -> String {
    values
        .iter()
        .map(|v| v.as_deref().unwrap_or(UNKNOWN_VALUE))
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR)
}

/// Join plain strings with the standard separator.
pub fn join_strings<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR)
}

/// One (subject, predicate, object) triple; all terms are plain literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// An accumulating set of triples with N-Triples-style serialization.
///
/// Every term is emitted as a quoted literal with no datatype or
/// language tag, one `s p o .` statement per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleSet {
    triples: Vec<Triple>,
}

impl TripleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) {
        self.triples.push(Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        });
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Serialize to an N-Triples-style document.
    pub fn to_document(&self) -> String {
        let mut doc = String::new();
        for t in &self.triples {
            doc.push_str(&format!(
                "\"{}\" \"{}\" \"{}\" .\n",
                escape_literal(&t.subject),
                escape_literal(&t.predicate),
                escape_literal(&t.object)
            ));
        }
        doc
    }
}

/// Escape a literal per N-Triples rules (backslash, quote, control chars).
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// An insertion-ordered column map (column name → cell list).
///
/// Serializes as a JSON object whose keys keep insertion order, matching
/// the column order consumers see: the fixed base columns first, then
/// properties in record order. Re-inserting an existing column replaces
/// its cells in place without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<(String, Vec<String>)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, cells: Vec<String>) {
        let column = column.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = cells,
            None => self.columns.push((column, cells)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cells)| cells.as_slice())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.iter().any(|(name, _)| name == column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Vec<String>> {
        let idx = self.columns.iter().position(|(name, _)| name == column)?;
        Some(self.columns.remove(idx).1)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.columns
            .iter()
            .map(|(name, cells)| (name.as_str(), cells.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, cells) in &self.columns {
            map.serialize_entry(name, cells)?;
        }
        map.end()
    }
}
