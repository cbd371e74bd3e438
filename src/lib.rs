// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod edit;
pub mod fixes;
pub mod io;
pub mod program;
pub mod safety;

// Re-export commonly used types
pub use crate::core::{Finding, Result, RuleMeta, Severity, SmelterError, SourceId, Span};

pub use crate::analyzers::{all_rules, rule_meta, rule_metas, DetectionEngine, Rule};

pub use crate::config::SmelterConfig;

pub use crate::edit::{apply, apply_batch, Edit, NewUnit, Transaction, TransactionBuilder};

pub use crate::fixes::{run_fixes, FixEngine, FixOutcome, Transformer};

pub use crate::program::{Program, SourceUnit};

pub use crate::io::output::{build_reports, write_findings, FindingReport, OutputFormat};
