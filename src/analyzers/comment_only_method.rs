//! Methods whose body is nothing but comment trivia

use crate::analyzers::Rule;
use crate::config::SmelterConfig;
use crate::core::{Finding, RuleMeta, Severity};
use crate::program::model::{BodyModel, TypeKind};
use crate::program::Program;

pub const META: RuleMeta = RuleMeta {
    id: "comment-only-method",
    category: "dead-code",
    severity: Severity::Warning,
    template: "Method '{0}' contains no statements, only comments",
};

pub struct CommentOnlyMethod;

impl Rule for CommentOnlyMethod {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, program: &Program, _config: &SmelterConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for unit in program.units() {
            for decl in &unit.model.types {
                if decl.kind != TypeKind::Class && decl.kind != TypeKind::Struct {
                    continue;
                }
                for method in &decl.methods {
                    let Some(body) = &method.body else { continue };
                    if is_comment_only(body) {
                        findings.push(Finding::new(
                            &META,
                            unit.id,
                            method.name_span,
                            vec![method.name.clone()],
                        ));
                    }
                }
            }
        }
        findings
    }
}

fn is_comment_only(body: &BodyModel) -> bool {
    body.statement_count == 0 && !body.comment_spans.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::path::PathBuf;

    fn check(source: &str) -> Vec<Finding> {
        let program =
            Program::from_sources(vec![(PathBuf::from("Test.cs"), source.to_string())]).unwrap();
        CommentOnlyMethod.check(&program, &SmelterConfig::default())
    }

    #[test]
    fn test_flags_comment_only_body() {
        let findings = check(indoc! {r#"
            class Cleanup {
                void OnCleanup() {
                    // TODO
                }
            }
        "#});
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message_args, vec!["OnCleanup".to_string()]);
    }

    #[test]
    fn test_ignores_truly_empty_body() {
        assert!(check("class C { void M() { } }").is_empty());
    }

    #[test]
    fn test_ignores_body_with_statements() {
        let findings = check(indoc! {r#"
            class C {
                void M() {
                    // counter
                    int x = 1;
                }
            }
        "#});
        assert!(findings.is_empty());
    }

    #[test]
    fn test_ignores_interface_members() {
        assert!(check("interface I { void M(); }").is_empty());
    }
}
