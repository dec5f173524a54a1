//! Record rules, evaluated in priority order
//!
//! Each rule is a pure function of one [`StudentRecord`] returning its
//! findings plus the gates it closes for the rules after it. A rule bound
//! to a closed gate is skipped for that record.

pub mod activities;
pub mod justification;
pub mod perfect_attendance;
pub mod prohibited_terms;
pub mod scheduled_days;
pub mod subjects;
pub mod typography;

use std::collections::BTreeSet;

use reccheck_config::Config;
use reccheck_core::{Area, Finding, RuleId, StudentRecord};

pub use activities::ActivityProgramRule;
pub use justification::JustificationRule;
pub use perfect_attendance::PerfectAttendanceRule;
pub use prohibited_terms::ProhibitedTermRule;
pub use scheduled_days::ScheduledDaysRule;
pub use subjects::SubjectCompletenessRule;
pub use typography::TypographyRule;

/// A condition later rules may depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Gate {
    /// Attendance totals are trustworthy enough to judge the marker
    PerfectAttendance,
    /// Attendance counts exist at all
    Justification,
}

/// Gates closed so far while evaluating one record
#[derive(Debug, Clone, Default)]
pub struct Flow {
    closed: BTreeSet<Gate>,
}

impl Flow {
    pub fn is_open(&self, gate: Gate) -> bool {
        !self.closed.contains(&gate)
    }

    pub fn close(&mut self, gate: Gate) {
        self.closed.insert(gate);
    }
}

/// Findings of one rule plus the gates it closes
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    pub findings: Vec<Finding>,
    pub closes: Vec<Gate>,
}

impl RuleOutcome {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn close(mut self, gate: Gate) -> Self {
        self.closes.push(gate);
        self
    }
}

impl From<Vec<Finding>> for RuleOutcome {
    fn from(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            closes: Vec::new(),
        }
    }
}

/// A single check over one student record
pub trait Rule: Send + Sync {
    /// Name of the rule, for logs
    fn name(&self) -> &'static str;

    /// Gate that must still be open for this rule to run
    fn gate(&self) -> Option<Gate> {
        None
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome;
}

/// The rule set in priority order
pub fn default_rules(config: &Config) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = vec![
        Box::new(ScheduledDaysRule::new(config.attendance.required_scheduled_days)),
        Box::new(PerfectAttendanceRule::new(
            config.attendance.perfect_attendance_marker.clone(),
        )),
        Box::new(JustificationRule::from_config(&config.attendance)),
        Box::new(SubjectCompletenessRule::new(
            config.subjects.required_subjects.clone(),
        )),
        Box::new(ActivityProgramRule::new(
            config.activities.required_program_keywords.clone(),
        )),
        Box::new(ProhibitedTermRule::new(
            config.terms.prohibited_terms.clone(),
            config.terms.allow_listed_institutions.clone(),
        )),
    ];
    if config.typography.enabled {
        rules.push(Box::new(TypographyRule));
    }
    rules
}

/// Finding for a field the parser could not read
pub(crate) fn parse_ambiguous(
    record: &StudentRecord,
    area: Area,
    field: &str,
    detail: &str,
) -> Finding {
    Finding::new(
        record,
        area,
        RuleId::ParseAmbiguous,
        format!("Could not read {}: {}", field, detail),
        format!("Check the {} entry in the source document", field),
    )
}

/// Quoted source line for a field, if the parser kept one
pub(crate) fn evidence(record: &StudentRecord, key: &str) -> String {
    match record.raw_excerpts.get(key) {
        Some(excerpt) => format!(" (source: \"{}\")", excerpt.replace('\n', " / ")),
        None => String::new(),
    }
}

fn is_sentence_end(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

/// The sentence of `text` containing the byte range `start..end`
pub(crate) fn sentence_around(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .find(|(_, c)| is_sentence_end(*c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .find(|(_, c)| is_sentence_end(*c))
        .map(|(i, c)| end + i + if c == '\n' { 0 } else { c.len_utf8() })
        .unwrap_or(text.len());
    text[from..to].trim()
}
