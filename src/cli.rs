use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::Severity;
use crate::io::output;

#[derive(Parser, Debug)]
#[command(name = "smelter")]
#[command(about = "Pattern-based code smell detector and automatic refactoring engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect code smells and report findings
    Analyze {
        /// Project root to analyze
        path: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exit nonzero when a finding at or above this severity remains
        #[arg(long, value_enum)]
        fail_on: Option<SeverityArg>,
    },

    /// Apply every fix that can be proven safe
    Fix {
        /// Project root to fix
        path: PathBuf,

        /// Only fix findings of this rule
        #[arg(long)]
        rule: Option<String>,

        /// Batch simple same-rule fixes into one pass
        #[arg(long)]
        batch: bool,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a default smelter.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => output::OutputFormat::Terminal,
            OutputFormat::Json => output::OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Info,
    Warning,
    Major,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(severity: SeverityArg) -> Self {
        match severity {
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Major => Severity::Major,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}
