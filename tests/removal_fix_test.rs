use std::path::PathBuf;

use indoc::indoc;
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
fn comment_only_method_is_detected_and_removed_end_to_end() {
    let before = program(&[(
        "Session.cs",
        indoc! {r#"
            class Session {
                void OnCleanup() {
                    /* TODO */
                }
                void Close() {
                    Flush();
                }
            }
        "#},
    )]);

    let config = SmelterConfig::default();
    let detection = DetectionEngine::with_default_rules();

    // The finding points at the method identifier
    let findings = detection.run(&before, &config);
    let finding = findings
        .iter()
        .find(|f| f.rule_id == "comment-only-method")
        .unwrap();
    let text = &before.units()[0].text;
    assert_eq!(&text[finding.span.start..finding.span.end], "OnCleanup");

    let fixes = FixEngine::with_default_transformers(&config);
    let outcome = run_fixes(
        before,
        &detection,
        &fixes,
        &config,
        Some("comment-only-method"),
        false,
    )
    .unwrap();

    assert_eq!(outcome.applied, 1);
    let after_text = &outcome.program.units()[0].text;
    assert!(!after_text.contains("OnCleanup"));
    assert!(after_text.contains("void Close()"));

    let remaining = detection.run(&outcome.program, &config);
    assert!(remaining.iter().all(|f| f.rule_id != "comment-only-method"));
}

#[test]
fn overridden_virtual_is_reported_but_never_removed() {
    let before = program(&[
        ("A.cs", "class A { public virtual void M() { /* stub */ } }"),
        ("B.cs", "class B : A { public override void M() { Work(); } }"),
    ]);
    let config = SmelterConfig::default();
    let detection = DetectionEngine::with_default_rules();

    let findings = detection.run(&before, &config);
    assert!(findings.iter().any(|f| f.rule_id == "comment-only-method"));

    let fixes = FixEngine::with_default_transformers(&config);
    let original = before.units()[0].text.clone();
    let outcome = run_fixes(
        before,
        &detection,
        &fixes,
        &config,
        Some("comment-only-method"),
        false,
    )
    .unwrap();

    assert_eq!(outcome.applied, 0);
    assert_eq!(outcome.program.units()[0].text, original);
}

#[test]
fn override_through_generic_base_blocks_removal() {
    let before = program(&[
        (
            "Base.cs",
            "class Base<T> { public virtual void M() { /* stub */ } }",
        ),
        (
            "Derived.cs",
            "class Derived : Base<Concrete> { public override void M() { Work(); } }",
        ),
    ]);
    let config = SmelterConfig::default();
    let detection = DetectionEngine::with_default_rules();
    let fixes = FixEngine::with_default_transformers(&config);

    let outcome = run_fixes(
        before,
        &detection,
        &fixes,
        &config,
        Some("comment-only-method"),
        false,
    )
    .unwrap();
    assert_eq!(outcome.applied, 0);
    assert!(outcome.program.units()[0].text.contains("void M()"));
}
