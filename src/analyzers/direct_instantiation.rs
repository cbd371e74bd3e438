//! Direct construction of service types that should come from the resolver

use crate::analyzers::Rule;
use crate::config::SmelterConfig;
use crate::core::{Finding, RuleMeta, Severity};
use crate::program::model::TypeKind;
use crate::program::Program;

pub const META: RuleMeta = RuleMeta {
    id: "direct-instantiation",
    category: "architecture",
    severity: Severity::Warning,
    template: "Service '{0}' constructed directly instead of resolved",
};

pub struct DirectInstantiation;

impl Rule for DirectInstantiation {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, program: &Program, config: &SmelterConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        for unit in program.units() {
            for decl in &unit.model.types {
                let bodies = decl
                    .methods
                    .iter()
                    .filter_map(|m| m.body.as_ref())
                    .chain(decl.constructors.iter().filter_map(|c| c.body.as_ref()));
                for body in bodies {
                    for creation in &body.creations {
                        if !is_service(program, config, &creation.type_name, creation.generic_arity)
                        {
                            continue;
                        }
                        findings.push(Finding::new(
                            &META,
                            unit.id,
                            creation.span,
                            vec![creation.type_name.clone()],
                        ));
                    }
                }
            }
        }
        findings
    }
}

/// A service is a program-declared class carrying a configured suffix
fn is_service(program: &Program, config: &SmelterConfig, name: &str, arity: usize) -> bool {
    if !config
        .injection
        .service_suffixes
        .iter()
        .any(|suffix| name.ends_with(suffix.as_str()) && name.len() > suffix.len())
    {
        return false;
    }
    program
        .find_type(name, arity)
        .and_then(|id| program.type_decl(id))
        .map(|decl| decl.kind == TypeKind::Class)
        .unwrap_or(false)
}
