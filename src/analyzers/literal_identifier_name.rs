//! String literals that restate the name of an in-scope identifier

use crate::analyzers::Rule;
use crate::config::SmelterConfig;
use crate::core::{Finding, RuleMeta, Severity};
use crate::program::model::{LiteralContext, MethodDecl, TypeDecl};
use crate::program::Program;

pub const META: RuleMeta = RuleMeta {
    id: "literal-identifier-name",
    category: "correctness",
    severity: Severity::Warning,
    template: "String literal \"{0}\" duplicates the identifier '{0}'; use nameof",
};

pub struct LiteralIdentifierName;

impl Rule for LiteralIdentifierName {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, program: &Program, _config: &SmelterConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for unit in program.units() {
            for decl in &unit.model.types {
                for method in &decl.methods {
                    let Some(body) = &method.body else { continue };
                    for literal in &body.string_literals {
                        if !matches!(literal.context, LiteralContext::Argument { .. }) {
                            continue;
                        }
                        if in_scope(decl, method, &literal.value) {
                            findings.push(Finding::new(
                                &META,
                                unit.id,
                                literal.span,
                                vec![literal.value.clone()],
                            ));
                        }
                    }
                }
            }
        }
        findings
    }
}

/// The literal names a parameter, local, or field of the containing type
fn in_scope(decl: &TypeDecl, method: &MethodDecl, value: &str) -> bool {
    if !is_identifier(value) {
        return false;
    }
    method.params.iter().any(|p| p.name == value)
        || method
            .body
            .as_ref()
            .map(|b| b.locals.iter().any(|l| l.name == value))
            .unwrap_or(false)
        || decl.fields.iter().any(|f| f.name == value)
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
