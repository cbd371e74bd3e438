//! Finding reports toward build tooling
//!
//! The reporting contract is rule id, severity, unit identity, byte and
//! line/column span, and the formatted message. Detection and fixing are
//! decoupled: findings without an available fix are reported all the same.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::analyzers::rule_meta;
use crate::core::{format_message, line_col, Finding, Severity};
use crate::program::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// One finding resolved against its snapshot for reporting
#[derive(Debug, Clone, Serialize)]
pub struct FindingReport {
    pub rule_id: String,
    pub severity: Severity,
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
    pub span_start: usize,
    pub span_end: usize,
    pub message: String,
}

pub fn build_reports(program: &Program, findings: &[Finding]) -> Vec<FindingReport> {
    findings
        .iter()
        .filter_map(|finding| {
            let unit = program.unit(finding.unit)?;
            let (line, column) = line_col(&unit.text, finding.span.start);
            let message = rule_meta(finding.rule_id)
                .map(|meta| format_message(meta.template, &finding.message_args))
                .unwrap_or_else(|| finding.message_args.join(", "));
            Some(FindingReport {
                rule_id: finding.rule_id.to_string(),
                severity: finding.severity,
                path: unit.path.clone(),
                line,
                column,
                span_start: finding.span.start,
                span_end: finding.span.end,
                message,
            })
        })
        .collect()
}

pub fn write_findings(
    writer: &mut dyn Write,
    format: OutputFormat,
    reports: &[FindingReport],
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(writer, reports),
        OutputFormat::Terminal => write_terminal(writer, reports),
    }
}

fn write_json(writer: &mut dyn Write, reports: &[FindingReport]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, reports)?;
    writeln!(writer)?;
    Ok(())
}

fn write_terminal(writer: &mut dyn Write, reports: &[FindingReport]) -> Result<()> {
    if reports.is_empty() {
        writeln!(writer, "{}", "No findings.".green())?;
        return Ok(());
    }

    let mut current: Option<&PathBuf> = None;
    for report in reports {
        if current != Some(&report.path) {
            if current.is_some() {
                writeln!(writer)?;
            }
            writeln!(writer, "{}", report.path.display().to_string().bold())?;
            current = Some(&report.path);
        }
        writeln!(
            writer,
            "  {}:{} {} {} {}",
            report.line,
            report.column,
            severity_label(report.severity),
            report.rule_id.dimmed(),
            report.message,
        )?;
    }
    writeln!(writer)?;
    writeln!(writer, "{} finding(s)", reports.len())?;
    Ok(())
}

fn severity_label(severity: Severity) -> String {
    let name = severity.display_name();
    match severity {
        Severity::Info => name.blue().to_string(),
        Severity::Warning => name.yellow().to_string(),
        Severity::Major => name.red().to_string(),
        Severity::Critical => name.red().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::DetectionEngine;
    use crate::config::SmelterConfig;

    fn reports() -> Vec<FindingReport> {
        let program = Program::from_sources(vec![(
            PathBuf::from("Sim.cs"),
            "class Sim { void Gone() { /* later */ } }".to_string(),
        )])
        .unwrap();
        let findings = DetectionEngine::with_default_rules().run(&program, &SmelterConfig::default());
        build_reports(&program, &findings)
    }

    #[test]
    fn test_reports_carry_location_and_message() {
        let reports = reports();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.rule_id, "comment-only-method");
        assert_eq!(report.line, 1);
        assert!(report.message.contains("'Gone'"));
    }

    #[test]
    fn test_json_output_is_valid() {
        let mut buffer = Vec::new();
        write_findings(&mut buffer, OutputFormat::Json, &reports()).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_terminal_output_groups_by_file() {
        let mut buffer = Vec::new();
        write_findings(&mut buffer, OutputFormat::Terminal, &reports()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Sim.cs"));
        assert!(text.contains("1 finding(s)"));
    }
}
