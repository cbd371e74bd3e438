//! Rewrite identifier-naming string literals to `nameof`
//!
//! The representative simple fix: one span, one document, safe to batch.

use crate::analyzers::literal_identifier_name;
use crate::core::Finding;
use crate::edit::Transaction;
use crate::fixes::Transformer;
use crate::program::Program;

pub struct NameLiteral;

impl Transformer for NameLiteral {
    fn rule_id(&self) -> &'static str {
        literal_identifier_name::META.id
    }

    fn supports_batching(&self) -> bool {
        true
    }

    fn transform(&self, finding: &Finding, program: &Program) -> Option<Transaction> {
        let unit = program.unit(finding.unit)?;
        let name = finding.message_args.first()?;

        // The span must still hold the quoted literal; anything else means
        // the finding is stale and the fix abstains.
        let current = unit.text.get(finding.span.start..finding.span.end)?;
        if current != format!("\"{name}\"") {
            return None;
        }

        Some(
            Transaction::builder()
                .replace(finding.unit, finding.span, format!("nameof({name})"))
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::Rule;
    use crate::config::SmelterConfig;
    use crate::edit::apply;
    use indoc::indoc;
    use std::path::PathBuf;

    fn program(source: &str) -> Program {
        Program::from_sources(vec![(PathBuf::from("Guard.cs"), source.to_string())]).unwrap()
    }

    #[test]
    fn test_rewrites_literal_to_nameof() {
        let before = program(indoc! {r#"
            class Guard {
                void Check(int amount) {
                    Reject("amount");
                }
            }
        "#});

        let finding = literal_identifier_name::LiteralIdentifierName
            .check(&before, &SmelterConfig::default())
            .into_iter()
            .next()
            .unwrap();
        let tx = NameLiteral.transform(&finding, &before).unwrap();
        assert!(tx.single_edit().is_some());

        let after = apply(&before, &tx).unwrap();
        assert!(after.units()[0].text.contains("Reject(nameof(amount))"));
    }

    #[test]
    fn test_abstains_on_stale_span() {
        let before = program(indoc! {r#"
            class Guard {
                void Check(int amount) {
                    Reject("amount");
                }
            }
        "#});
        let mut finding = literal_identifier_name::LiteralIdentifierName
            .check(&before, &SmelterConfig::default())
            .into_iter()
            .next()
            .unwrap();
        finding.span.start += 1;
        assert!(NameLiteral.transform(&finding, &before).is_none());
    }
}
