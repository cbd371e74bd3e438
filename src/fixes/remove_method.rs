//! Safe removal of comment-only methods

use crate::analyzers::comment_only_method;
use crate::core::Finding;
use crate::edit::Transaction;
use crate::fixes::{whole_line_span, Transformer};
use crate::program::Program;
use crate::safety;

pub struct RemoveMethod;

impl Transformer for RemoveMethod {
    fn rule_id(&self) -> &'static str {
        comment_only_method::META.id
    }

    fn transform(&self, finding: &Finding, program: &Program) -> Option<Transaction> {
        let unit = program.unit(finding.unit)?;
        let type_id = program.containing_type(finding.unit, finding.span)?;
        let decl = program.type_decl(type_id)?;
        let method = decl
            .methods
            .iter()
            .find(|m| m.name_span == finding.span)?;

        // Removal must not break a contract: overrides, interface members,
        // overridden virtuals, and referenced methods all stay.
        if method.has_modifier("override") {
            return None;
        }
        if safety::implements_interface_member(program, type_id, method) {
            return None;
        }
        if method.is_overridable() && !safety::overrides_of(program, type_id, method).is_empty() {
            return None;
        }
        if safety::is_referenced(program, type_id, method) {
            return None;
        }

        let span = whole_line_span(&unit.text, method.span);
        Some(
            Transaction::builder()
                .replace(finding.unit, span, "")
                .build(),
        )
    }
}
