//! Record parser for redacted school record text
//!
//! Splits a document into student blocks, then reads the attendance
//! counts, subject entries and free-text sections of each block into a
//! [`StudentRecord`]. Fields that cannot be read stay `Count::Unknown` or
//! are listed in `missing_sections`; they are never defaulted to zero.

pub mod attendance;
pub mod segment;
pub mod subjects;

use reccheck_config::Config;
use reccheck_core::{ParseFailure, Result, Section, StudentRecord};

pub use attendance::{AttendanceSection, parse_attendance};
pub use segment::{Block, Line, section_header, split_blocks};
pub use subjects::{SubjectMatcher, SubjectSection};

/// Records and failures from one document
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<StudentRecord>,
    pub failures: Vec<ParseFailure>,
}

pub struct RecordParser {
    subjects: SubjectMatcher,
}

impl RecordParser {
    pub fn new(required_subjects: &[String]) -> Result<Self> {
        Ok(Self {
            subjects: SubjectMatcher::new(required_subjects)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.subjects.required_subjects)
    }

    /// Parse every student block in document order
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();

        for block in split_blocks(text) {
            if block.sections.is_empty() {
                tracing::warn!(
                    "Block {} at line {} has no section headers, skipping",
                    block.index,
                    block.start_line
                );
                outcome.failures.push(ParseFailure {
                    block_index: block.index,
                    line: block.start_line,
                    excerpt: block.excerpt(),
                    reason: "no recognizable section headers".to_string(),
                });
                continue;
            }

            let record = self.parse_block(&block);
            tracing::debug!(
                "Parsed block {} as student {} ({:?})",
                block.index,
                record.student_id,
                record.confidence()
            );
            outcome.records.push(record);
        }

        outcome
    }

    fn parse_block(&self, block: &Block<'_>) -> StudentRecord {
        let student_id = block
            .roster_number
            .clone()
            .unwrap_or_else(|| StudentRecord::UNRESOLVED_ID.to_string());
        let display_name = block.display_name.clone().unwrap_or_default();
        let mut record = StudentRecord::new(student_id, display_name);

        for section in Section::ALL {
            if block.section(section).is_none() {
                record.missing_sections.insert(section);
            }
        }

        if let Some(lines) = block.section(Section::Attendance) {
            let parsed = parse_attendance(lines);
            record.attendance = parsed.attendance;
            record.remarks_text = parsed.remarks_text;
            record.raw_excerpts.extend(parsed.excerpts);
        }

        if let Some(lines) = block.section(Section::Subjects) {
            let parsed = self.subjects.parse(lines);
            record.subjects_present = parsed.present;
            record.subject_notes = parsed.notes;
            record.raw_excerpts.extend(parsed.excerpts);
        }

        if let Some(lines) = block.section(Section::Activities) {
            record.activity_text = join_lines(lines);
            if !record.activity_text.is_empty() {
                record
                    .raw_excerpts
                    .insert("activity_text".to_string(), record.activity_text.clone());
            }
        }

        if let Some(lines) = block.section(Section::Behavior) {
            record.behavior_text = join_lines(lines);
            if !record.behavior_text.is_empty() {
                record
                    .raw_excerpts
                    .insert("behavior_text".to_string(), record.behavior_text.clone());
            }
        }

        record
    }
}

fn join_lines(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|l| l.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
