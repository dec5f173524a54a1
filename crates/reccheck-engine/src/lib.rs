//! Rule engine and report pipeline for reccheck
//!
//! - `rules`: the ordered rule set and its gating
//! - `engine`: per-record evaluation, parallel across records
//! - `assembler`: flattening findings into a report
//! - `render`: Markdown and JSON output
//! - `checker`: the whole pipeline from document to report

pub mod assembler;
pub mod checker;
pub mod engine;
pub mod render;
pub mod rules;

pub use assembler::ReportAssembler;
pub use checker::Checker;
pub use engine::{RecordEvaluation, RuleEngine};
pub use render::{MarkdownFormatter, ReportFormat, render, render_json};
pub use rules::{Flow, Gate, Rule, RuleOutcome};
