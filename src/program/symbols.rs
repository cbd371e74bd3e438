//! Cross-unit symbol indexing
//!
//! The symbol table is derived from the file models of one program snapshot
//! and rebuilt whenever the snapshot changes. It is the single source of
//! truth for "is this declared/referenced anywhere", keyed so that lookups
//! never rescan raw source.

use std::collections::HashMap;

use crate::core::{SourceId, Span};
use crate::program::model::Qualifier;
use crate::program::SourceUnit;

/// Identity of one type declaration inside a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId {
    pub unit: SourceId,
    pub index: usize,
}

/// One identifier occurrence somewhere in the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub unit: SourceId,
    pub span: Span,
    pub qualifier: Qualifier,
}

/// Index of declarations and references across the whole program
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Type declarations keyed by original definition (name, generic arity)
    types_by_original: HashMap<(String, usize), Vec<TypeId>>,
    /// Identifier occurrences keyed by name
    references: HashMap<String, Vec<Reference>>,
}

impl SymbolTable {
    pub fn build(units: &[SourceUnit]) -> Self {
        let mut table = SymbolTable::default();
        for unit in units {
            for (index, decl) in unit.model.types.iter().enumerate() {
                table
                    .types_by_original
                    .entry((decl.name.clone(), decl.generic_arity))
                    .or_default()
                    .push(TypeId {
                        unit: unit.id,
                        index,
                    });
            }
            for ident in &unit.model.identifiers {
                table
                    .references
                    .entry(ident.name.clone())
                    .or_default()
                    .push(Reference {
                        unit: unit.id,
                        span: ident.span,
                        qualifier: ident.qualifier,
                    });
            }
        }
        table
    }

    /// Declaration sites of the original definition `(name, arity)`
    pub fn lookup_type(&self, name: &str, arity: usize) -> &[TypeId] {
        self.types_by_original
            .get(&(name.to_string(), arity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every occurrence of an identifier name, declarations included
    pub fn references_to(&self, name: &str) -> &[Reference] {
        self.references
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a name occurs anywhere outside the given declaration span
    pub fn referenced_outside(&self, name: &str, declaration: (SourceId, Span)) -> bool {
        self.references_to(name)
            .iter()
            .any(|r| (r.unit, r.span) != declaration)
    }
}
