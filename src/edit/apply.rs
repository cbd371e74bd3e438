//! Transaction application
//!
//! Application is all-or-nothing: every edit of a transaction is validated
//! against the snapshot before any text is rewritten, and the outcome is a
//! brand new [`Program`] with its symbol table re-derived. Findings and
//! transactions computed against the old snapshot are stale afterwards.

use std::collections::{BTreeMap, HashMap};

use crate::core::{Result, SmelterError, SourceId};
use crate::edit::{Edit, Transaction};
use crate::program::{Program, SourceUnit};

/// Apply one transaction, producing the next snapshot
pub fn apply(program: &Program, tx: &Transaction) -> Result<Program> {
    let mut changed: HashMap<SourceId, String> = HashMap::new();

    for unit_id in tx.documents() {
        let unit = program
            .unit(unit_id)
            .ok_or(SmelterError::UnknownUnit {
                index: unit_id.index(),
            })?;
        let mut edits: Vec<&Edit> = tx.edits_for(unit_id).iter().collect();
        edits.sort_by_key(|e| (e.span.start, e.span.end));
        validate_edits(unit, &edits)?;
        changed.insert(unit_id, rewrite(&unit.text, &edits));
    }

    let mut created = Vec::with_capacity(tx.new_units().len());
    for new_unit in tx.new_units() {
        let exists = program.unit_by_path(&new_unit.path).is_some()
            || created.iter().any(|(p, _)| p == &new_unit.path);
        if exists {
            return Err(SmelterError::DuplicateUnit {
                path: new_unit.path.clone(),
            });
        }
        created.push((new_unit.path.clone(), new_unit.text.clone()));
    }

    program.rebuilt(&changed, &created)
}

/// Apply many same-rule transactions in one pass
///
/// Only single-edit, single-document, creation-free transactions are
/// accepted; anything else is skipped with a warning. Edits are sorted per
/// document and overlapping ones dropped, which is equivalent to applying
/// one transaction at a time and reconciling span shifts before the next:
/// every substitution uses the snapshot's own coordinates, so earlier edits
/// never invalidate the text a later edit replaces.
///
/// Returns the new snapshot and the number of edits applied.
pub fn apply_batch(
    program: &Program,
    transactions: &[Transaction],
) -> Result<(Program, usize)> {
    let mut per_unit: BTreeMap<SourceId, Vec<&Edit>> = BTreeMap::new();
    for tx in transactions {
        match tx.single_edit() {
            Some(edit) => per_unit.entry(edit.unit).or_default().push(edit),
            None => {
                log::warn!(
                    "skipping non-batchable transaction ({} edits, {} new units)",
                    tx.edit_count(),
                    tx.new_units().len()
                );
            }
        }
    }

    let mut changed: HashMap<SourceId, String> = HashMap::new();
    let mut applied = 0;

    for (unit_id, mut edits) in per_unit {
        let unit = program
            .unit(unit_id)
            .ok_or(SmelterError::UnknownUnit {
                index: unit_id.index(),
            })?;
        edits.sort_by_key(|e| (e.span.start, e.span.end));

        let mut kept: Vec<&Edit> = Vec::new();
        for edit in edits {
            if !span_fits(unit, edit) {
                log::warn!(
                    "skipping batch edit with stale span {}..{} in {}",
                    edit.span.start,
                    edit.span.end,
                    unit.path.display()
                );
                continue;
            }
            if let Some(last) = kept.last() {
                if last.span.end > edit.span.start {
                    log::warn!(
                        "skipping batch edit overlapping a previous one in {}",
                        unit.path.display()
                    );
                    continue;
                }
            }
            kept.push(edit);
        }

        if kept.is_empty() {
            continue;
        }
        applied += kept.len();
        changed.insert(unit_id, rewrite(&unit.text, &kept));
    }

    let next = program.rebuilt(&changed, &[])?;
    Ok((next, applied))
}

fn span_fits(unit: &SourceUnit, edit: &Edit) -> bool {
    edit.span.start <= edit.span.end
        && edit.span.end <= unit.text.len()
        && unit.text.is_char_boundary(edit.span.start)
        && unit.text.is_char_boundary(edit.span.end)
}

fn validate_edits(unit: &SourceUnit, sorted: &[&Edit]) -> Result<()> {
    for (i, edit) in sorted.iter().enumerate() {
        if !span_fits(unit, edit) {
            return Err(SmelterError::InvalidSpan {
                path: unit.path.clone(),
                start: edit.span.start,
                end: edit.span.end,
            });
        }
        if i > 0 && sorted[i - 1].span.end > edit.span.start {
            return Err(SmelterError::OverlappingEdits {
                path: unit.path.clone(),
            });
        }
    }
    Ok(())
}

/// Substitute sorted, non-overlapping edits back to front
fn rewrite(text: &str, sorted: &[&Edit]) -> String {
    let mut out = text.to_string();
    for edit in sorted.iter().rev() {
        out.replace_range(edit.span.start..edit.span.end, &edit.replacement);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Span;
    use std::path::PathBuf;

    fn program(sources: &[(&str, &str)]) -> Program {
        Program::from_sources(
            sources
                .iter()
                .map(|(p, t)| (PathBuf::from(p), t.to_string()))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_apply_rewrites_text() {
        let before = program(&[("A.cs", "class A { void M() { } }")]);
        let unit = before.units()[0].id;
        let at = before.units()[0].text.find("M").unwrap();

        let tx = Transaction::builder()
            .replace(unit, Span::new(at, at + 1), "Renamed")
            .build();
        let after = apply(&before, &tx).unwrap();

        assert!(after.units()[0].text.contains("void Renamed()"));
        // The old snapshot is untouched
        assert!(before.units()[0].text.contains("void M()"));
    }

    #[test]
    fn test_apply_multi_document() {
        let before = program(&[
            ("A.cs", "class A { }"),
            ("B.cs", "class B { }"),
        ]);
        let a = before.units()[0].id;
        let b = before.units()[1].id;

        let tx = Transaction::builder()
            .replace(a, Span::new(6, 7), "X")
            .replace(b, Span::new(6, 7), "Y")
            .build();
        let after = apply(&before, &tx).unwrap();

        assert!(after.units()[0].text.contains("class X"));
        assert!(after.units()[1].text.contains("class Y"));
    }

    #[test]
    fn test_apply_creates_units() {
        let before = program(&[("A.cs", "class A { }")]);
        let tx = Transaction::builder()
            .create_unit(PathBuf::from("States/AState.cs"), "public enum AState { }")
            .build();
        let after = apply(&before, &tx).unwrap();

        assert_eq!(after.units().len(), 2);
        let created = after.unit_by_path(&PathBuf::from("States/AState.cs")).unwrap();
        assert_eq!(created.model.types.len(), 1);
    }

    #[test]
    fn test_atomicity_on_invalid_span() {
        let before = program(&[("A.cs", "class A { void M() { } }")]);
        let unit = before.units()[0].id;

        // One valid edit plus one that cannot be located
        let tx = Transaction::builder()
            .replace(unit, Span::new(6, 7), "X")
            .replace(unit, Span::new(9_999, 10_000), "boom")
            .build();

        assert!(apply(&before, &tx).is_err());
        assert!(before.units()[0].text.contains("class A"));
    }

    #[test]
    fn test_overlapping_edits_rejected() {
        let before = program(&[("A.cs", "class A { void M() { } }")]);
        let unit = before.units()[0].id;

        let tx = Transaction::builder()
            .replace(unit, Span::new(0, 7), "x")
            .replace(unit, Span::new(5, 9), "y")
            .build();
        assert!(matches!(
            apply(&before, &tx),
            Err(SmelterError::OverlappingEdits { .. })
        ));
    }

    #[test]
    fn test_duplicate_unit_rejected() {
        let before = program(&[("A.cs", "class A { }")]);
        let tx = Transaction::builder()
            .create_unit(PathBuf::from("A.cs"), "class Clash { }")
            .build();
        assert!(matches!(
            apply(&before, &tx),
            Err(SmelterError::DuplicateUnit { .. })
        ));
    }

    #[test]
    fn test_batch_applies_sorted_and_skips_overlaps() {
        let before = program(&[("A.cs", "class A { void M() { Log(\"a\"); Log(\"b\"); } }")]);
        let unit = before.units()[0].id;
        let text = &before.units()[0].text;
        let first = text.find("\"a\"").unwrap();
        let second = text.find("\"b\"").unwrap();

        let txs = vec![
            Transaction::builder()
                .replace(unit, Span::new(second, second + 3), "nameof(b)")
                .build(),
            Transaction::builder()
                .replace(unit, Span::new(first, first + 3), "nameof(a)")
                .build(),
            // Overlaps the first literal; must be dropped
            Transaction::builder()
                .replace(unit, Span::new(first + 1, first + 2), "clash")
                .build(),
        ];

        let (after, applied) = apply_batch(&before, &txs).unwrap();
        assert_eq!(applied, 2);
        assert!(after.units()[0].text.contains("nameof(a)"));
        assert!(after.units()[0].text.contains("nameof(b)"));
        assert!(!after.units()[0].text.contains("clash"));
    }

    #[test]
    fn test_batch_excludes_multi_edit_transactions() {
        let before = program(&[("A.cs", "class A { }")]);
        let unit = before.units()[0].id;

        let multi = Transaction::builder()
            .replace(unit, Span::new(0, 5), "struct")
            .replace(unit, Span::new(6, 7), "B")
            .build();
        let (after, applied) = apply_batch(&before, &[multi]).unwrap();

        assert_eq!(applied, 0);
        assert_eq!(after.units()[0].text, before.units()[0].text);
    }
}
