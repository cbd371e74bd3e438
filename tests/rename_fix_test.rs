use std::path::PathBuf;

use indoc::indoc;
use pretty_assertions::assert_eq;
use smelter::{run_fixes, DetectionEngine, FixEngine, Program, SmelterConfig};

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
fn rename_rewrites_every_occurrence_atomically() {
    let before = program(&[(
        "Roller.cs",
        indoc! {r#"
            class Roller {
                int rng;
                void Roll() {
                    this.rng = Seed();
                    int doubled = rng + rng;
                    Use(rng);
                }
            }
        "#},
    )]);
    let config = SmelterConfig::default();
    let detection = DetectionEngine::with_default_rules();
    let fixes = FixEngine::with_default_transformers(&config);

    // One transaction with one edit per occurrence, declaration included
    let finding = detection
        .run(&before, &config)
        .into_iter()
        .find(|f| f.rule_id == "terse-identifier")
        .unwrap();
    let tx = fixes.propose(&finding, &before).unwrap();
    assert_eq!(tx.edit_count(), 5);

    let outcome = run_fixes(
        before,
        &detection,
        &fixes,
        &config,
        Some("terse-identifier"),
        false,
    )
    .unwrap();

    let text = &outcome.program.units()[0].text;
    assert!(!text.contains("rng"));
    assert_eq!(text.matches("randomGenerator").count(), 5);

    // No occurrence of the old name remains bound anywhere
    let remaining = detection.run(&outcome.program, &config);
    assert!(remaining.iter().all(|f| f.rule_id != "terse-identifier"));
}

#[test]
fn rename_abstains_instead_of_shadowing() {
    let before = program(&[(
        "Roller.cs",
        indoc! {r#"
            class Roller {
                void Roll(int idx) {
                    int index = idx + 1;
                }
            }
        "#},
    )]);
    let config = SmelterConfig::default();
    let detection = DetectionEngine::with_default_rules();
    let fixes = FixEngine::with_default_transformers(&config);

    let original = before.units()[0].text.clone();
    let outcome = run_fixes(
        before,
        &detection,
        &fixes,
        &config,
        Some("terse-identifier"),
        false,
    )
    .unwrap();

    assert_eq!(outcome.applied, 0);
    assert_eq!(outcome.program.units()[0].text, original);
}

#[test]
fn independent_symbols_are_renamed_independently() {
    let before = program(&[(
        "Grid.cs",
        indoc! {r#"
            class Grid {
                void Fill(int idx) {
                    Mark(idx);
                }
                void Clear() {
                    int cnt = 0;
                    Wipe(cnt);
                }
            }
        "#},
    )]);
    let config = SmelterConfig::default();
    let detection = DetectionEngine::with_default_rules();
    let fixes = FixEngine::with_default_transformers(&config);

    let outcome = run_fixes(
        before,
        &detection,
        &fixes,
        &config,
        Some("terse-identifier"),
        false,
    )
    .unwrap();

    assert_eq!(outcome.applied, 2);
    let text = &outcome.program.units()[0].text;
    assert!(text.contains("void Fill(int index)"));
    assert!(text.contains("Mark(index);"));
    assert!(text.contains("int count = 0;"));
    assert!(text.contains("Wipe(count);"));
}
