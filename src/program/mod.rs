//! Immutable indexed representation of the analyzed sources
//!
//! A [`Program`] is one analysis snapshot: every parsed source unit plus the
//! derived [`SymbolTable`]. Snapshots are never mutated in place; applying a
//! transaction produces a new snapshot and re-derives the index, so symbol
//! relationships can never go stale across an edit.

pub mod model;
pub mod parser;
pub mod symbols;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::{Result, SourceId, Span};
use crate::program::model::{FileModel, Qualifier, TypeDecl, TypeKind, TypeRef};
use crate::program::parser::CSharpParser;
use crate::program::symbols::{Reference, SymbolTable, TypeId};

/// One parsed file and its syntactic summary
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub id: SourceId,
    pub path: PathBuf,
    pub text: String,
    pub model: FileModel,
}

/// The full set of source units plus derived cross-unit symbol information
#[derive(Debug, Clone)]
pub struct Program {
    units: Vec<SourceUnit>,
    by_path: HashMap<PathBuf, SourceId>,
    symbols: SymbolTable,
}

impl Program {
    /// Build a snapshot from in-memory sources, parsing units in parallel
    pub fn from_sources(sources: Vec<(PathBuf, String)>) -> Result<Self> {
        let units: Vec<SourceUnit> = sources
            .into_par_iter()
            .enumerate()
            .map(|(index, (path, text))| {
                let model = parser::parse_unit(&path, &text)?;
                Ok(SourceUnit {
                    id: SourceId::new(index),
                    path,
                    text,
                    model,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::assemble(units))
    }

    /// Derive a new snapshot with some unit texts replaced and new units
    /// appended. Untouched units keep their models and their ids.
    pub fn rebuilt(
        &self,
        changed: &HashMap<SourceId, String>,
        new_units: &[(PathBuf, String)],
    ) -> Result<Self> {
        let mut parser = CSharpParser::new()?;
        let mut units = Vec::with_capacity(self.units.len() + new_units.len());
        for unit in &self.units {
            match changed.get(&unit.id) {
                Some(text) => {
                    let model = parser.parse(&unit.path, text)?;
                    units.push(SourceUnit {
                        id: unit.id,
                        path: unit.path.clone(),
                        text: text.clone(),
                        model,
                    });
                }
                None => units.push(unit.clone()),
            }
        }
        for (path, text) in new_units {
            let model = parser.parse(path, text)?;
            units.push(SourceUnit {
                id: SourceId::new(units.len()),
                path: path.clone(),
                text: text.clone(),
                model,
            });
        }
        Ok(Self::assemble(units))
    }

    fn assemble(units: Vec<SourceUnit>) -> Self {
        let by_path = units
            .iter()
            .map(|u| (u.path.clone(), u.id))
            .collect();
        let symbols = SymbolTable::build(&units);
        Self {
            units,
            by_path,
            symbols,
        }
    }

    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn unit(&self, id: SourceId) -> Option<&SourceUnit> {
        self.units.get(id.index())
    }

    pub fn unit_by_path(&self, path: &Path) -> Option<&SourceUnit> {
        self.by_path.get(path).and_then(|id| self.unit(*id))
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn type_decl(&self, id: TypeId) -> Option<&TypeDecl> {
        self.unit(id.unit).and_then(|u| u.model.types.get(id.index))
    }

    /// All type declarations in the snapshot
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.units.iter().flat_map(|u| {
            (0..u.model.types.len()).map(move |index| TypeId {
                unit: u.id,
                index,
            })
        })
    }

    /// First declaration matching the original definition `(name, arity)`
    pub fn find_type(&self, name: &str, arity: usize) -> Option<TypeId> {
        self.symbols.lookup_type(name, arity).first().copied()
    }

    /// Program-declared ancestors of a type, nearest first, cycles guarded
    pub fn base_chain(&self, id: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut pending = vec![id];
        let mut seen = vec![id];
        while let Some(current) = pending.pop() {
            let Some(decl) = self.type_decl(current) else {
                continue;
            };
            for base in &decl.bases {
                let (name, arity) = base.original_definition();
                for resolved in self.symbols.lookup_type(name, arity) {
                    if !seen.contains(resolved) {
                        seen.push(*resolved);
                        chain.push(*resolved);
                        pending.push(*resolved);
                    }
                }
            }
        }
        chain
    }

    /// Every base reference reachable from a type, resolved or not
    ///
    /// External framework bases never resolve to a declaration, so capability
    /// checks such as "derives from the component base" compare by name.
    pub fn transitive_base_refs(&self, id: TypeId) -> Vec<TypeRef> {
        let mut refs = Vec::new();
        let mut pending = vec![id];
        let mut seen_types = vec![id];
        while let Some(current) = pending.pop() {
            let Some(decl) = self.type_decl(current) else {
                continue;
            };
            for base in &decl.bases {
                if !refs.contains(base) {
                    refs.push(base.clone());
                }
                let (name, arity) = base.original_definition();
                for resolved in self.symbols.lookup_type(name, arity) {
                    if !seen_types.contains(resolved) {
                        seen_types.push(*resolved);
                        pending.push(*resolved);
                    }
                }
            }
        }
        refs
    }

    /// Program-declared interfaces a type implements, transitively
    pub fn interface_closure(&self, id: TypeId) -> Vec<TypeId> {
        self.base_chain(id)
            .into_iter()
            .filter(|t| {
                self.type_decl(*t)
                    .map(|d| d.kind == TypeKind::Interface)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// The type declaration whose span contains the given span
    pub fn containing_type(&self, unit: SourceId, span: Span) -> Option<TypeId> {
        let source = self.unit(unit)?;
        source
            .model
            .types
            .iter()
            .position(|t| t.span.contains_span(span))
            .map(|index| TypeId { unit, index })
    }

    /// Resolve a declaration name span to the symbol it declares
    pub fn declaration_at(&self, unit: SourceId, span: Span) -> Option<SymbolDecl> {
        let source = self.unit(unit)?;
        for decl in &source.model.types {
            for field in &decl.fields {
                if field.name_span == span {
                    return Some(SymbolDecl {
                        unit,
                        name: field.name.clone(),
                        name_span: span,
                        scope: SymbolScope::TypeBody(decl.body_span.unwrap_or(decl.span)),
                    });
                }
            }
            let method_scopes = decl
                .methods
                .iter()
                .map(|m| (m.span, &m.params, m.body.as_ref()))
                .chain(
                    decl.constructors
                        .iter()
                        .map(|c| (c.span, &c.params, c.body.as_ref())),
                );
            for (scope, params, body) in method_scopes {
                for param in params {
                    if param.name_span == span {
                        return Some(SymbolDecl {
                            unit,
                            name: param.name.clone(),
                            name_span: span,
                            scope: SymbolScope::Method(scope),
                        });
                    }
                }
                if let Some(body) = body {
                    for local in &body.locals {
                        if local.name_span == span {
                            return Some(SymbolDecl {
                                unit,
                                name: local.name.clone(),
                                name_span: span,
                                scope: SymbolScope::Method(scope),
                            });
                        }
                    }
                }
            }
        }
        None
    }

    /// All occurrences of a symbol within its scope, declaration included
    pub fn scoped_references(&self, symbol: &SymbolDecl) -> Vec<Reference> {
        let scope_span = match symbol.scope {
            SymbolScope::Method(span) | SymbolScope::TypeBody(span) => span,
        };
        self.symbols
            .references_to(&symbol.name)
            .iter()
            .filter(|r| r.unit == symbol.unit)
            .filter(|r| scope_span.contains_span(r.span))
            .filter(|r| r.qualifier != Qualifier::Member)
            .copied()
            .collect()
    }

    /// Whether any occurrence of `name` exists in the scope span
    pub fn name_bound_in_scope(&self, unit: SourceId, scope: Span, name: &str) -> bool {
        self.symbols
            .references_to(name)
            .iter()
            .any(|r| r.unit == unit && scope.contains_span(r.span))
    }
}

/// Scope a renameable symbol is visible in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolScope {
    /// Parameter or local: the whole method declaration span
    Method(Span),
    /// Private field: the declaring type's body span
    TypeBody(Span),
}

/// A resolved local, parameter, or private field declaration
#[derive(Debug, Clone)]
pub struct SymbolDecl {
    pub unit: SourceId,
    pub name: String,
    pub name_span: Span,
    pub scope: SymbolScope,
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn program(sources: &[(&str, &str)]) -> Program {
        Program::from_sources(
            sources
                .iter()
                .map(|(p, t)| (PathBuf::from(p), t.to_string()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_base_chain_across_files() {
        let program = program(&[
            ("A.cs", "public class A { public virtual void M() { } }"),
            ("B.cs", "public class B : A { public override void M() { } }"),
            ("C.cs", "public class C : B { }"),
        ]);

        let c = program.find_type("C", 0).unwrap();
        let chain: Vec<String> = program
            .base_chain(c)
            .into_iter()
            .map(|t| program.type_decl(t).unwrap().name.clone())
            .collect();
        assert!(chain.contains(&"A".to_string()));
        assert!(chain.contains(&"B".to_string()));
    }

    #[test]
    fn test_generic_base_resolves_to_original_definition() {
        let program = program(&[
            ("Base.cs", "public class Base<T> { public virtual void M() { } }"),
            ("Derived.cs", "public class Derived : Base<int> { public override void M() { } }"),
        ]);

        let derived = program.find_type("Derived", 0).unwrap();
        let base = program.find_type("Base", 1).unwrap();
        assert!(program.base_chain(derived).contains(&base));
    }

    #[test]
    fn test_transitive_base_refs_include_external() {
        let program = program(&[
            ("Mid.cs", "public class Mid : Component { }"),
            ("Leaf.cs", "public class Leaf : Mid { }"),
        ]);

        let leaf = program.find_type("Leaf", 0).unwrap();
        let names: Vec<String> = program
            .transitive_base_refs(leaf)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert!(names.contains(&"Mid".to_string()));
        assert!(names.contains(&"Component".to_string()));
    }

    #[test]
    fn test_declaration_at_and_scoped_references() {
        let source = indoc! {r#"
            class Roller {
                void Roll(int rng) {
                    int total = rng + rng;
                }
                void Other(Roller o) {
                    int rng = 9;
                }
            }
        "#};
        let program = program(&[("Roller.cs", source)]);
        let unit = program.units()[0].id;

        let decl = &program.units()[0].model.types[0].methods[0].params[0];
        let symbol = program.declaration_at(unit, decl.name_span).unwrap();
        assert_eq!(symbol.name, "rng");

        // Declaration plus the two uses inside Roll; the local in Other is
        // a different symbol and out of scope.
        let refs = program.scoped_references(&symbol);
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn test_interface_closure() {
        let program = program(&[
            ("IPool.cs", "public interface IPool { void Drain(); }"),
            ("IWarmPool.cs", "public interface IWarmPool : IPool { }"),
            ("Pool.cs", "public class Pool : IWarmPool { public void Drain() { } }"),
        ]);

        let pool = program.find_type("Pool", 0).unwrap();
        let names: Vec<String> = program
            .interface_closure(pool)
            .into_iter()
            .map(|t| program.type_decl(t).unwrap().name.clone())
            .collect();
        assert!(names.contains(&"IPool".to_string()));
        assert!(names.contains(&"IWarmPool".to_string()));
    }
}
