use std::path::PathBuf;

use indoc::indoc;
use smelter::{DetectionEngine, FixEngine, Program, SmelterConfig};

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
fn detection_is_idempotent_on_one_snapshot() {
    let program = program(&[(
        "Sim.cs",
        indoc! {r#"
            class Sim {
                void Simulate() {
                    var dt = Time.Delta();
                }
                void Gone() {
                    // pending
                }
            }
        "#},
    )]);
    let engine = DetectionEngine::with_default_rules();
    let config = SmelterConfig::default();

    let first = engine.run(&program, &config);
    let second = engine.run(&program, &config);
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn finding_without_a_fix_is_still_reported() {
    let program = program(&[(
        "Sim.cs",
        "class Sim { void Simulate() { var dt = Time.Delta(); } }",
    )]);
    let config = SmelterConfig::default();
    let findings = DetectionEngine::with_default_rules().run(&program, &config);

    let hot_path = findings
        .iter()
        .find(|f| f.rule_id == "hot-path-lookup")
        .expect("detection and fixing are decoupled");

    let fixes = FixEngine::with_default_transformers(&config);
    assert!(fixes.propose(hot_path, &program).is_none());
}

#[test]
fn overlapping_findings_from_different_rules_are_all_kept() {
    let program = program(&[(
        "Sim.cs",
        indoc! {r#"
            class Sim {
                void Simulate(int amount) {
                    FindNearest("amount");
                }
            }
        "#},
    )]);
    let findings =
        DetectionEngine::with_default_rules().run(&program, &SmelterConfig::default());

    let hot = findings
        .iter()
        .find(|f| f.rule_id == "hot-path-lookup")
        .unwrap();
    let literal = findings
        .iter()
        .find(|f| f.rule_id == "literal-identifier-name")
        .unwrap();
    assert!(hot.span.overlaps(literal.span));
}

#[test]
fn findings_are_ordered_by_unit_and_offset() {
    let program = program(&[
        ("A.cs", "class A { void GoneA() { /* a */ } }"),
        ("B.cs", "class B { void GoneB() { /* b */ } }"),
    ]);
    let findings =
        DetectionEngine::with_default_rules().run(&program, &SmelterConfig::default());
    assert_eq!(findings.len(), 2);
    assert!(findings[0].unit < findings[1].unit);
}
