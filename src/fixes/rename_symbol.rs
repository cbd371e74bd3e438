//! Whole-scope rename of abbreviated identifiers
//!
//! Every occurrence of the symbol, declaration included, is rewritten in one
//! transaction; a partial rename would not compile, so batching is refused.

use std::collections::HashMap;

use crate::analyzers::terse_identifier;
use crate::core::Finding;
use crate::edit::Transaction;
use crate::fixes::Transformer;
use crate::program::{Program, SymbolScope};

pub struct RenameSymbol {
    abbreviations: HashMap<String, String>,
}

impl RenameSymbol {
    pub fn new(abbreviations: HashMap<String, String>) -> Self {
        Self { abbreviations }
    }
}

impl Transformer for RenameSymbol {
    fn rule_id(&self) -> &'static str {
        terse_identifier::META.id
    }

    fn transform(&self, finding: &Finding, program: &Program) -> Option<Transaction> {
        let symbol = program.declaration_at(finding.unit, finding.span)?;
        let new_name = self.abbreviations.get(&symbol.name)?;

        // Never shadow: abstain when the replacement is already bound
        let scope_span = match symbol.scope {
            SymbolScope::Method(span) | SymbolScope::TypeBody(span) => span,
        };
        if program.name_bound_in_scope(symbol.unit, scope_span, new_name) {
            return None;
        }

        // A field whose name is shadowed by a parameter or local anywhere in
        // the type cannot be renamed by scope filtering alone
        if matches!(symbol.scope, SymbolScope::TypeBody(_)) {
            let type_id = program.containing_type(finding.unit, finding.span)?;
            let decl = program.type_decl(type_id)?;
            let shadowed = decl
                .methods
                .iter()
                .map(|m| (&m.params, m.body.as_ref()))
                .chain(decl.constructors.iter().map(|c| (&c.params, c.body.as_ref())))
                .any(|(params, body)| {
                    params.iter().any(|p| p.name == symbol.name)
                        || body.is_some_and(|b| b.locals.iter().any(|l| l.name == symbol.name))
                });
            if shadowed {
                return None;
            }
        }

        let references = program.scoped_references(&symbol);
        if references.is_empty() {
            return None;
        }

        let mut builder = Transaction::builder();
        for reference in references {
            builder = builder.replace(reference.unit, reference.span, new_name.clone());
        }
        Some(builder.build())
    }
}
