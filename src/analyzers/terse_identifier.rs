//! Abbreviated identifiers with a known expansion

use crate::analyzers::Rule;
use crate::config::SmelterConfig;
use crate::core::{Finding, RuleMeta, Severity, SourceId, Span};
use crate::program::Program;

pub const META: RuleMeta = RuleMeta {
    id: "terse-identifier",
    category: "naming",
    severity: Severity::Info,
    template: "Identifier '{0}' should be spelled out as '{1}'",
};

pub struct TerseIdentifier;

impl Rule for TerseIdentifier {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, program: &Program, config: &SmelterConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut flag = |unit: SourceId, name: &str, span: Span| {
            if let Some(expansion) = config.naming.abbreviations.get(name) {
                findings.push(Finding::new(
                    &META,
                    unit,
                    span,
                    vec![name.to_string(), expansion.clone()],
                ));
            }
        };

        for unit in program.units() {
            for decl in &unit.model.types {
                for field in &decl.fields {
                    if field.is_private() {
                        flag(unit.id, &field.name, field.name_span);
                    }
                }
                let signatures = decl
                    .methods
                    .iter()
                    .map(|m| (&m.params, m.body.as_ref()))
                    .chain(decl.constructors.iter().map(|c| (&c.params, c.body.as_ref())));
                for (params, body) in signatures {
                    for param in params {
                        flag(unit.id, &param.name, param.name_span);
                    }
                    if let Some(body) = body {
                        for local in &body.locals {
                            flag(unit.id, &local.name, local.name_span);
                        }
                    }
                }
            }
        }
        findings
    }
}
