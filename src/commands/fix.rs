use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analyzers::DetectionEngine;
use crate::commands::load_program;
use crate::config::SmelterConfig;
use crate::fixes::{run_fixes, FixEngine};

pub struct FixConfig {
    pub path: PathBuf,
    pub rule: Option<String>,
    pub batch: bool,
    pub dry_run: bool,
}

/// Propose and apply every provable fix, then write changed units to disk
pub fn run(config: FixConfig) -> Result<()> {
    let settings = SmelterConfig::load_or_default(&config.path)?;
    let program = load_program(&config.path)?;

    let original: HashMap<PathBuf, String> = program
        .units()
        .iter()
        .map(|u| (u.path.clone(), u.text.clone()))
        .collect();

    let detection = DetectionEngine::with_default_rules();
    let fixes = FixEngine::with_default_transformers(&settings);
    let outcome = run_fixes(
        program,
        &detection,
        &fixes,
        &settings,
        config.rule.as_deref(),
        config.batch,
    )?;

    let mut written = 0;
    for unit in outcome.program.units() {
        let unchanged = original
            .get(&unit.path)
            .is_some_and(|text| *text == unit.text);
        if unchanged {
            continue;
        }
        written += 1;
        if config.dry_run {
            println!("would update {}", unit.path.display());
            continue;
        }
        if let Some(parent) = unit.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&unit.path, &unit.text)
            .with_context(|| format!("writing {}", unit.path.display()))?;
    }

    println!(
        "{} fix(es) applied, {} batched edit(s), {} unit(s) {}",
        outcome.applied,
        outcome.batched,
        written,
        if config.dry_run { "would change" } else { "written" },
    );
    Ok(())
}
