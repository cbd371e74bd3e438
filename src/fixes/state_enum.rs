//! Replace magic state values with companion enum members
//!
//! The companion unit is found by naming convention: `{TypeName}State` in
//! the conventional states folder next to the flagged unit. A missing
//! companion is synthesized with a minimal enum declaration. The enum edit
//! and the call-site rewrite land in different documents, held together by
//! one transaction; spans never shift across documents, so each document's
//! edits are computed independently and merged at commit.

use std::ffi::OsStr;
use std::path::PathBuf;

use crate::analyzers::magic_state_value;
use crate::core::Finding;
use crate::edit::Transaction;
use crate::fixes::{line_indent, line_start, Transformer};
use crate::program::model::{TypeDecl, TypeKind};
use crate::program::{Program, SourceUnit};

pub struct StateEnum {
    folder: String,
}

impl StateEnum {
    pub fn new(folder: String) -> Self {
        Self { folder }
    }

    fn companion_unit<'a>(&self, program: &'a Program, enum_name: &str) -> Option<&'a SourceUnit> {
        let mut fallback = None;
        for unit in program.units() {
            if unit.path.file_stem() != Some(OsStr::new(enum_name)) {
                continue;
            }
            let in_folder = unit
                .path
                .parent()
                .and_then(|p| p.file_name())
                .is_some_and(|f| f == OsStr::new(&self.folder));
            if in_folder {
                return Some(unit);
            }
            fallback.get_or_insert(unit);
        }
        fallback
    }
}

impl Transformer for StateEnum {
    fn rule_id(&self) -> &'static str {
        magic_state_value::META.id
    }

    fn transform(&self, finding: &Finding, program: &Program) -> Option<Transaction> {
        let unit = program.unit(finding.unit)?;
        let type_id = program.containing_type(finding.unit, finding.span)?;
        let decl = program.type_decl(type_id)?;
        let literal = decl
            .methods
            .iter()
            .filter_map(|m| m.body.as_ref())
            .flat_map(|b| &b.int_literals)
            .find(|l| l.span == finding.span)?;
        let value = literal.value;
        let enum_name = format!("{}State", decl.name);

        let mut builder = Transaction::builder();
        let member_name = match self.companion_unit(program, &enum_name) {
            Some(companion) => {
                let enum_decl = companion
                    .model
                    .types
                    .iter()
                    .find(|t| t.kind == TypeKind::Enum && t.name == enum_name)?;
                match enum_decl.enum_members.iter().find(|m| m.value == Some(value)) {
                    // The value already has a member; only the call site moves
                    Some(existing) => existing.name.clone(),
                    None => {
                        let member_name = format!("State{value}");
                        if enum_decl.enum_members.iter().any(|m| m.name == member_name) {
                            return None;
                        }
                        let (at, text) =
                            member_insertion(companion, enum_decl, &member_name, value)?;
                        builder = builder.insert(companion.id, at, text);
                        member_name
                    }
                }
            }
            None => {
                let member_name = format!("State{value}");
                let parent = unit.path.parent().map(PathBuf::from).unwrap_or_default();
                let path = parent
                    .join(&self.folder)
                    .join(format!("{enum_name}.cs"));
                builder = builder.create_unit(
                    path,
                    render_companion(&enum_name, decl.namespace.as_deref(), &member_name, value),
                );
                member_name
            }
        };

        builder = builder.replace(
            finding.unit,
            finding.span,
            format!("(int){enum_name}.{member_name}"),
        );
        Some(builder.build())
    }
}

/// Insertion point and text for a new member inside an existing enum body
fn member_insertion(
    unit: &SourceUnit,
    enum_decl: &TypeDecl,
    member_name: &str,
    value: i64,
) -> Option<(usize, String)> {
    let body = enum_decl.body_span?;
    match enum_decl.enum_members.last() {
        Some(last) => {
            let indent = line_indent(&unit.text, last.span.start);
            let between = unit.text.get(last.span.end..body.end)?;
            if between.contains(',') {
                // Trailing comma present: add a whole line before the brace
                let at = line_start(&unit.text, body.end.saturating_sub(1));
                Some((at, format!("{indent}{member_name} = {value},\n")))
            } else {
                Some((last.span.end, format!(",\n{indent}{member_name} = {value}")))
            }
        }
        None => {
            let indent = format!("{}    ", line_indent(&unit.text, enum_decl.span.start));
            let at = line_start(&unit.text, body.end.saturating_sub(1));
            Some((at, format!("{indent}{member_name} = {value},\n")))
        }
    }
}

fn render_companion(
    enum_name: &str,
    namespace: Option<&str>,
    member_name: &str,
    value: i64,
) -> String {
    match namespace {
        Some(ns) => format!(
            "namespace {ns} {{\n    public enum {enum_name} {{\n        {member_name} = {value},\n    }}\n}}\n"
        ),
        None => format!(
            "public enum {enum_name} {{\n    {member_name} = {value},\n}}\n"
        ),
    }
}
