use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;

use crate::analyzers::DetectionEngine;
use crate::commands::load_program;
use crate::config::SmelterConfig;
use crate::core::Severity;
use crate::io::output::{build_reports, write_findings, OutputFormat};

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub fail_on: Option<Severity>,
}

/// Run detection and report findings
///
/// Returns whether the quality gate passed: no finding at or above the
/// configured severity threshold.
pub fn run(config: AnalyzeConfig) -> Result<bool> {
    let settings = SmelterConfig::load_or_default(&config.path)?;
    let program = load_program(&config.path)?;

    let engine = DetectionEngine::with_default_rules();
    let findings = engine.run(&program, &settings);
    let reports = build_reports(&program, &findings);

    let mut writer: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    write_findings(&mut writer, config.format, &reports)?;

    let threshold = config.fail_on.unwrap_or(settings.gate.fail_on);
    Ok(!findings.iter().any(|f| f.severity >= threshold))
}
