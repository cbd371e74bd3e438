//! Edits and atomic transactions
//!
//! A [`Transaction`] is an ordered set of edits across one or more source
//! units, plus any units it creates, applied together or not at all. The
//! builder accumulates per-document edit lists keyed by document identity,
//! so multi-document fixes never alias each other's spans.

pub mod apply;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::{SourceId, Span};

pub use apply::{apply, apply_batch};

/// A span replacement inside one source unit
///
/// An empty span marks an insertion point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub unit: SourceId,
    pub span: Span,
    pub replacement: String,
}

/// A source unit created by a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnit {
    pub path: PathBuf,
    pub text: String,
}

/// An atomic, possibly multi-document, set of edits
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    edits: BTreeMap<SourceId, Vec<Edit>>,
    new_units: Vec<NewUnit>,
}

impl Transaction {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::default()
    }

    pub fn documents(&self) -> impl Iterator<Item = SourceId> + '_ {
        self.edits.keys().copied()
    }

    pub fn edits_for(&self, unit: SourceId) -> &[Edit] {
        self.edits.get(&unit).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_edits(&self) -> impl Iterator<Item = &Edit> {
        self.edits.values().flatten()
    }

    pub fn edit_count(&self) -> usize {
        self.edits.values().map(Vec::len).sum()
    }

    pub fn document_count(&self) -> usize {
        self.edits.len()
    }

    pub fn new_units(&self) -> &[NewUnit] {
        &self.new_units
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.new_units.is_empty()
    }

    /// The sole edit of a single-document, creation-free transaction
    ///
    /// Batch application accepts only such transactions; renames and
    /// multi-document fixes have unpredictable blast radius next to other
    /// pending transactions.
    pub fn single_edit(&self) -> Option<&Edit> {
        if !self.new_units.is_empty() || self.edit_count() != 1 {
            return None;
        }
        self.all_edits().next()
    }
}

/// Builder accumulating edits per document
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    edits: BTreeMap<SourceId, Vec<Edit>>,
    new_units: Vec<NewUnit>,
}

impl TransactionBuilder {
    pub fn replace(mut self, unit: SourceId, span: Span, replacement: impl Into<String>) -> Self {
        self.edits.entry(unit).or_default().push(Edit {
            unit,
            span,
            replacement: replacement.into(),
        });
        self
    }

    pub fn insert(self, unit: SourceId, at: usize, text: impl Into<String>) -> Self {
        self.replace(unit, Span::empty(at), text)
    }

    pub fn create_unit(mut self, path: PathBuf, text: impl Into<String>) -> Self {
        self.new_units.push(NewUnit {
            path,
            text: text.into(),
        });
        self
    }

    pub fn build(self) -> Transaction {
        Transaction {
            edits: self.edits,
            new_units: self.new_units,
        }
    }
}
