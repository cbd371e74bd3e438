//! Fix engine mapping findings to transactions
//!
//! Each transformer owns one diagnostic id and turns a finding into at most
//! one transaction. A transformer that cannot prove its edit safe returns
//! nothing; the caller sees "no fix available", never a guess. Findings and
//! transactions are only meaningful against the snapshot they were computed
//! from, so the sequential driver re-runs detection after every application.

pub mod inject_dependency;
pub mod name_literal;
pub mod remove_method;
pub mod rename_symbol;
pub mod state_enum;

use crate::analyzers::DetectionEngine;
use crate::config::SmelterConfig;
use crate::core::{Finding, Result, Span};
use crate::edit::{apply, apply_batch, Transaction};
use crate::program::Program;

/// Maps one finding to one transaction, or abstains
pub trait Transformer: Send + Sync {
    /// Diagnostic identifier this transformer fixes
    fn rule_id(&self) -> &'static str;

    /// Whether same-rule findings may be fixed in one batch pass
    ///
    /// Renames and multi-document fixes must not be batched: their blast
    /// radius is unpredictable next to other pending transactions.
    fn supports_batching(&self) -> bool {
        false
    }

    fn transform(&self, finding: &Finding, program: &Program) -> Option<Transaction>;
}

/// Registry of transformers keyed by the rule they fix
pub struct FixEngine {
    transformers: Vec<Box<dyn Transformer>>,
}

impl FixEngine {
    pub fn new(transformers: Vec<Box<dyn Transformer>>) -> Self {
        Self { transformers }
    }

    pub fn with_default_transformers(config: &SmelterConfig) -> Self {
        Self::new(vec![
            Box::new(remove_method::RemoveMethod),
            Box::new(inject_dependency::InjectDependency::new(
                config.injection.clone(),
            )),
            Box::new(state_enum::StateEnum::new(config.states.folder.clone())),
            Box::new(rename_symbol::RenameSymbol::new(
                config.naming.abbreviations.clone(),
            )),
            Box::new(name_literal::NameLiteral),
        ])
    }

    pub fn transformer_for(&self, rule_id: &str) -> Option<&dyn Transformer> {
        self.transformers
            .iter()
            .find(|t| t.rule_id() == rule_id)
            .map(Box::as_ref)
    }

    /// Propose a transaction for one finding, abstaining when its rule has
    /// no transformer or the transformer's preconditions fail
    pub fn propose(&self, finding: &Finding, program: &Program) -> Option<Transaction> {
        self.transformer_for(finding.rule_id)?
            .transform(finding, program)
    }

    pub fn batchable_rules(&self) -> Vec<&'static str> {
        self.transformers
            .iter()
            .filter(|t| t.supports_batching())
            .map(|t| t.rule_id())
            .collect()
    }
}

/// Result of a fix run over one program
pub struct FixOutcome {
    pub program: Program,
    /// Transactions applied one at a time
    pub applied: usize,
    /// Edits applied through batch passes
    pub batched: usize,
}

/// Fix everything fixable, one transaction per snapshot
///
/// Batchable rules are handled first in one pass each; the rest are fixed
/// finding-by-finding, re-running detection after every transaction so no
/// stale finding is ever acted on.
pub fn run_fixes(
    program: Program,
    detection: &DetectionEngine,
    fixes: &FixEngine,
    config: &SmelterConfig,
    rule: Option<&str>,
    batch: bool,
) -> Result<FixOutcome> {
    let mut program = program;
    let mut applied = 0;
    let mut batched = 0;

    if batch {
        for rule_id in fixes.batchable_rules() {
            if rule.is_some_and(|r| r != rule_id) {
                continue;
            }
            let transactions: Vec<Transaction> = detection
                .run(&program, config)
                .iter()
                .filter(|f| f.rule_id == rule_id)
                .filter_map(|f| fixes.propose(f, &program))
                .collect();
            if transactions.is_empty() {
                continue;
            }
            let (next, count) = apply_batch(&program, &transactions)?;
            program = next;
            batched += count;
        }
    }

    // Every fix removes its own finding, so this converges; the guard only
    // catches a transformer that breaks that contract.
    let mut guard = detection.run(&program, config).len() * 2 + 16;
    loop {
        let findings = detection.run(&program, config);
        let candidate = findings
            .iter()
            .filter(|f| rule.is_none_or(|r| f.rule_id == r))
            .find_map(|f| fixes.propose(f, &program));
        let Some(tx) = candidate else { break };
        program = apply(&program, &tx)?;
        applied += 1;
        guard -= 1;
        if guard == 0 {
            log::warn!("fix loop did not converge, stopping");
            break;
        }
    }

    Ok(FixOutcome {
        program,
        applied,
        batched,
    })
}

/// Byte offset of the start of the line containing `offset`
pub(crate) fn line_start(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0)
}

/// Leading whitespace of the line containing `offset`
pub(crate) fn line_indent(text: &str, offset: usize) -> String {
    let start = line_start(text, offset);
    text[start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect()
}

/// Extend a member span to cover whole lines, trailing newline included
pub(crate) fn whole_line_span(text: &str, span: Span) -> Span {
    let start = line_start(text, span.start);
    let start = if text[start..span.start].trim().is_empty() {
        start
    } else {
        span.start
    };
    let end = text[span.end..]
        .find('\n')
        .map(|i| span.end + i + 1)
        .unwrap_or(text.len());
    let end = if text[span.end..end].trim().is_empty() {
        end
    } else {
        span.end
    };
    Span::new(start, end)
}
