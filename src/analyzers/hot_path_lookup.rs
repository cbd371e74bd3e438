//! Expensive lookups inside per-tick simulation methods
//!
//! There is deliberately no transformer for this rule: the right fix is
//! hoisting the lookup, which cannot be proven safe syntactically. The
//! finding is still reported.

use crate::analyzers::Rule;
use crate::config::SmelterConfig;
use crate::core::{Finding, RuleMeta, Severity};
use crate::program::model::Invocation;
use crate::program::Program;

pub const META: RuleMeta = RuleMeta {
    id: "hot-path-lookup",
    category: "performance",
    severity: Severity::Warning,
    template: "'{0}' resolved on every tick of '{1}'",
};

pub struct HotPathLookup;

impl Rule for HotPathLookup {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, program: &Program, config: &SmelterConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for unit in program.units() {
            for decl in &unit.model.types {
                for method in &decl.methods {
                    if !config.hot_path.methods.iter().any(|m| m == &method.name) {
                        continue;
                    }
                    let Some(body) = &method.body else { continue };
                    for invocation in &body.invocations {
                        if let Some(display) = flagged_lookup(invocation, config) {
                            findings.push(Finding::new(
                                &META,
                                unit.id,
                                invocation.span,
                                vec![display, method.name.clone()],
                            ));
                        }
                    }
                }
            }
        }
        findings
    }
}

fn flagged_lookup(invocation: &Invocation, config: &SmelterConfig) -> Option<String> {
    if let Some(receiver) = &invocation.receiver {
        if config.hot_path.receivers.iter().any(|r| r == receiver) {
            return Some(format!("{receiver}.{}", invocation.callee));
        }
    }
    if invocation.receiver.is_none()
        && invocation.callee.starts_with(&config.hot_path.finder_prefix)
    {
        return Some(invocation.callee.clone());
    }
    None
}
