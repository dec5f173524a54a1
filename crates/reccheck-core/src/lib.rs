//! Core domain models for reccheck
//!
//! This crate contains:
//! - Student record model (attendance counts, sections, free text)
//! - Findings and the area/rule taxonomy
//! - Report model and the run-level error type

pub mod error;
pub mod finding;
pub mod record;
pub mod report;

pub use error::{Error, Result};
pub use finding::{Area, Finding, ParseFailure, RuleId};
pub use record::{
    Attendance, AttendanceCategory, CategoryEntry, CategoryGroup, Count, ParseConfidence, Section,
    StudentRecord,
};
pub use report::Report;
