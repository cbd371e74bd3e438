//! Detection engine and the built-in rule catalog
//!
//! Rules are stateless detectors over one program snapshot. They never see
//! each other's findings, never mutate the program, and run concurrently;
//! the engine simply concatenates their results. Overlapping findings from
//! different rules are all kept — choosing between them is the caller's
//! concern when applying fixes.

pub mod comment_only_method;
pub mod direct_instantiation;
pub mod hot_path_lookup;
pub mod literal_identifier_name;
pub mod magic_state_value;
pub mod terse_identifier;

use rayon::prelude::*;

use crate::config::SmelterConfig;
use crate::core::{Finding, RuleMeta};
use crate::program::Program;

/// Stateless detector producing findings from a program snapshot
pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;
    fn check(&self, program: &Program, config: &SmelterConfig) -> Vec<Finding>;
}

/// Every registered rule's metadata, for message formatting and reporting
pub fn rule_metas() -> &'static [&'static RuleMeta] {
    &[
        &comment_only_method::META,
        &hot_path_lookup::META,
        &direct_instantiation::META,
        &magic_state_value::META,
        &terse_identifier::META,
        &literal_identifier_name::META,
    ]
}

pub fn rule_meta(id: &str) -> Option<&'static RuleMeta> {
    rule_metas().iter().find(|m| m.id == id).copied()
}

/// The built-in rule set
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(comment_only_method::CommentOnlyMethod),
        Box::new(hot_path_lookup::HotPathLookup),
        Box::new(direct_instantiation::DirectInstantiation),
        Box::new(magic_state_value::MagicStateValue),
        Box::new(terse_identifier::TerseIdentifier),
        Box::new(literal_identifier_name::LiteralIdentifierName),
    ]
}

/// Runs the active rule set against a snapshot
pub struct DetectionEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl DetectionEngine {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn with_default_rules() -> Self {
        Self::new(all_rules())
    }

    /// Run every rule concurrently and collect findings in a stable order
    pub fn run(&self, program: &Program, config: &SmelterConfig) -> Vec<Finding> {
        let mut findings: Vec<Finding> = self
            .rules
            .par_iter()
            .flat_map(|rule| {
                let severity = config.severity_for(rule.meta());
                rule.check(program, config)
                    .into_iter()
                    .map(|mut finding| {
                        finding.severity = severity;
                        finding
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        findings.sort_by_key(|f| (f.unit, f.span, f.rule_id));
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use std::path::PathBuf;

    fn program(source: &str) -> Program {
        Program::from_sources(vec![(PathBuf::from("Test.cs"), source.to_string())]).unwrap()
    }

    #[test]
    fn test_detection_is_idempotent() {
        let program = program(
            "class Sim { void Simulate() { Time.Delta(); } void Gone() { /* later */ } }",
        );
        let engine = DetectionEngine::with_default_rules();
        let config = SmelterConfig::default();

        let first = engine.run(&program, &config);
        let second = engine.run(&program, &config);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_severity_override_applied() {
        let program = program("class Sim { void Gone() { /* later */ } }");
        let engine = DetectionEngine::with_default_rules();

        let mut config = SmelterConfig::default();
        config
            .severities
            .rules
            .insert("comment-only-method".to_string(), Severity::Critical);

        let findings = engine.run(&program, &config);
        let finding = findings
            .iter()
            .find(|f| f.rule_id == "comment-only-method")
            .unwrap();
        assert_eq!(finding.severity, Severity::Critical);
    }

    #[test]
    fn test_rule_meta_lookup() {
        assert!(rule_meta("comment-only-method").is_some());
        assert!(rule_meta("no-such-rule").is_none());
    }
}
