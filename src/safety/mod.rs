//! Whole-program safety queries gating destructive fixes
//!
//! Every query scans the current snapshot; nothing is cached, because an
//! edit anywhere can introduce a new override or reference. Cost is
//! O(types × members) per query.

use crate::program::model::{MethodDecl, TypeKind};
use crate::program::symbols::TypeId;
use crate::program::Program;

/// Location of an override of some virtual member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideSite {
    pub type_id: TypeId,
    pub method_index: usize,
}

/// Find every override of `method` declared on `declaring` anywhere in the
/// program. Base chains are walked with original-definition comparison, so
/// `Derived : Base<Concrete>` sees overrides of `Base<T>` members.
pub fn overrides_of(program: &Program, declaring: TypeId, method: &MethodDecl) -> Vec<OverrideSite> {
    let mut sites = Vec::new();
    for candidate in program.type_ids() {
        if candidate == declaring {
            continue;
        }
        let Some(decl) = program.type_decl(candidate) else {
            continue;
        };
        if decl.kind != TypeKind::Class && decl.kind != TypeKind::Struct {
            continue;
        }
        if !program.base_chain(candidate).contains(&declaring) {
            continue;
        }
        for (method_index, m) in decl.methods.iter().enumerate() {
            if m.name == method.name && m.has_modifier("override") {
                sites.push(OverrideSite {
                    type_id: candidate,
                    method_index,
                });
            }
        }
    }
    sites
}

/// Whether `method` on `type_id` satisfies an interface contract
///
/// Explicit implementations (`void IPool.Drain()`) always count. Implicit
/// ones match any same-named member with the same parameter count declared
/// on a program-declared interface in the type's transitive closure.
pub fn implements_interface_member(
    program: &Program,
    type_id: TypeId,
    method: &MethodDecl,
) -> bool {
    if method.explicit_interface.is_some() {
        return true;
    }
    for interface in program.interface_closure(type_id) {
        let Some(decl) = program.type_decl(interface) else {
            continue;
        };
        let matches = decl
            .methods
            .iter()
            .any(|m| m.name == method.name && m.params.len() == method.params.len());
        if matches {
            return true;
        }
    }
    false
}

/// Whether the method name occurs anywhere outside its own declaration
///
/// Conservative, by name: a same-named member elsewhere keeps the method
/// alive rather than risking a broken call site.
pub fn is_referenced(program: &Program, type_id: TypeId, method: &MethodDecl) -> bool {
    program
        .symbols()
        .referenced_outside(&method.name, (type_id.unit, method.name_span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn program(sources: &[(&str, &str)]) -> Program {
        Program::from_sources(
            sources
                .iter()
                .map(|(p, t)| (PathBuf::from(p), t.to_string()))
                .collect(),
        )
        .unwrap()
    }

    fn method<'a>(program: &'a Program, type_name: &str, name: &str) -> (TypeId, &'a MethodDecl) {
        let type_id = program.find_type(type_name, 0).unwrap();
        let decl = program.type_decl(type_id).unwrap();
        let method = decl.methods.iter().find(|m| m.name == name).unwrap();
        (type_id, method)
    }

    #[test]
    fn test_override_found_in_derived_type() {
        let program = program(&[
            ("A.cs", "public class A { public virtual void M() { } }"),
            ("B.cs", "public class B : A { public override void M() { } }"),
        ]);
        let (a, m) = method(&program, "A", "M");
        assert_eq!(overrides_of(&program, a, m).len(), 1);
    }

    #[test]
    fn test_no_override_when_unrelated() {
        let program = program(&[
            ("A.cs", "public class A { public virtual void M() { } }"),
            ("B.cs", "public class B { public void M() { } }"),
        ]);
        let (a, m) = method(&program, "A", "M");
        assert!(overrides_of(&program, a, m).is_empty());
    }

    #[test]
    fn test_override_through_generic_instantiation() {
        let program = program(&[
            ("Base.cs", "public class Base<T> { public virtual void M() { } }"),
            (
                "Derived.cs",
                "public class Derived : Base<int> { public override void M() { } }",
            ),
        ]);
        let base = program.find_type("Base", 1).unwrap();
        let m = program
            .type_decl(base)
            .unwrap()
            .methods
            .first()
            .unwrap()
            .clone();
        assert_eq!(overrides_of(&program, base, &m).len(), 1);
    }

    #[test]
    fn test_implicit_interface_implementation() {
        let program = program(&[
            ("IPool.cs", "public interface IPool { void Drain(); }"),
            ("Pool.cs", "public class Pool : IPool { public void Drain() { } }"),
        ]);
        let (pool, drain) = method(&program, "Pool", "Drain");
        assert!(implements_interface_member(&program, pool, drain));
    }

    #[test]
    fn test_explicit_interface_implementation() {
        let program = program(&[
            ("Pool.cs", "class Pool : IPool { void IPool.Drain() { } }"),
        ]);
        let (pool, drain) = method(&program, "Pool", "Drain");
        assert!(implements_interface_member(&program, pool, drain));
    }

    #[test]
    fn test_plain_method_implements_nothing() {
        let program = program(&[("Pool.cs", "class Pool { void Drain() { } }")]);
        let (pool, drain) = method(&program, "Pool", "Drain");
        assert!(!implements_interface_member(&program, pool, drain));
    }

    #[test]
    fn test_reference_detection() {
        let referenced = program(&[
            ("A.cs", "class A { public void Helper() { } }"),
            ("B.cs", "class B { void Run(A a) { a.Helper(); } }"),
        ]);
        let (a, helper) = method(&referenced, "A", "Helper");
        assert!(is_referenced(&referenced, a, helper));

        let lonely = program(&[("A.cs", "class A { void Helper() { } }")]);
        let (a, helper) = method(&lonely, "A", "Helper");
        assert!(!is_referenced(&lonely, a, helper));
    }
}
