pub mod errors;
pub mod types;

pub use errors::{Result, SmelterError};
pub use types::{
    format_message, line_col, Finding, RuleMeta, Severity, SourceId, Span,
};
