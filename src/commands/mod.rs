pub mod analyze;
pub mod fix;
pub mod init;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::io::FileWalker;
use crate::program::Program;

/// Walk a project root and parse every discovered unit into a snapshot
pub fn load_program(root: &Path) -> Result<Program> {
    let files = FileWalker::new(root.to_path_buf()).walk()?;
    log::debug!("discovered {} source units under {}", files.len(), root.display());

    let mut sources = Vec::with_capacity(files.len());
    for path in files {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        sources.push((path, text));
    }
    Ok(Program::from_sources(sources)?)
}
