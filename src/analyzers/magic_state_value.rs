//! Bare integer literals standing in for state enum members

use crate::analyzers::Rule;
use crate::config::SmelterConfig;
use crate::core::{Finding, RuleMeta, Severity};
use crate::program::model::{IntLiteral, LiteralContext};
use crate::program::Program;

pub const META: RuleMeta = RuleMeta {
    id: "magic-state-value",
    category: "readability",
    severity: Severity::Warning,
    template: "Magic state value {0} in '{1}' should be a {1}State member",
};

pub struct MagicStateValue;

impl Rule for MagicStateValue {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, program: &Program, _config: &SmelterConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for unit in program.units() {
            for decl in &unit.model.types {
                for method in &decl.methods {
                    let Some(body) = &method.body else { continue };
                    for literal in &body.int_literals {
                        if is_state_value(literal) {
                            findings.push(Finding::new(
                                &META,
                                unit.id,
                                literal.span,
                                vec![literal.value.to_string(), decl.name.clone()],
                            ));
                        }
                    }
                }
            }
        }
        findings
    }
}

fn is_state_value(literal: &IntLiteral) -> bool {
    match &literal.context {
        LiteralContext::Argument { callee } => callee.contains("State"),
        LiteralContext::Comparison { other } => {
            other.to_ascii_lowercase().ends_with("state")
        }
    }
}
