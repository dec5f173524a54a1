//! Finding domain model

use serde::{Deserialize, Serialize};

use crate::record::StudentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Area {
    Attendance,
    Subjects,
    Activities,
    ProhibitedTerm,
    Typography,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Area::Attendance => "Attendance",
            Area::Subjects => "Subjects",
            Area::Activities => "Activities",
            Area::ProhibitedTerm => "ProhibitedTerm",
            Area::Typography => "Typography",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleId {
    ScheduledDaysError,
    MissingPerfectAttendanceMarker,
    SpuriousPerfectAttendanceMarker,
    MissingJustification,
    MissingSubject,
    MissingRequiredProgramMention,
    ProhibitedTermUsage,
    TypographyIssue,
    ParseAmbiguous,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ScheduledDaysError => "ScheduledDaysError",
            RuleId::MissingPerfectAttendanceMarker => "MissingPerfectAttendanceMarker",
            RuleId::SpuriousPerfectAttendanceMarker => "SpuriousPerfectAttendanceMarker",
            RuleId::MissingJustification => "MissingJustification",
            RuleId::MissingSubject => "MissingSubject",
            RuleId::MissingRequiredProgramMention => "MissingRequiredProgramMention",
            RuleId::ProhibitedTermUsage => "ProhibitedTermUsage",
            RuleId::TypographyIssue => "TypographyIssue",
            RuleId::ParseAmbiguous => "ParseAmbiguous",
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discrepancy found in one student's record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Position of the student block in the run
    pub record_index: usize,
    pub student_id: String,
    pub display_name: String,
    pub area: Area,
    pub rule_id: RuleId,
    pub description: String,
    pub suggested_fix: String,
}

impl Finding {
    pub fn new(
        record: &StudentRecord,
        area: Area,
        rule_id: RuleId,
        description: impl Into<String>,
        suggested_fix: impl Into<String>,
    ) -> Self {
        Self {
            record_index: 0,
            student_id: record.student_id.clone(),
            display_name: record.display_name.clone(),
            area,
            rule_id,
            description: description.into(),
            suggested_fix: suggested_fix.into(),
        }
    }

    pub fn at_index(mut self, record_index: usize) -> Self {
        self.record_index = record_index;
        self
    }
}

/// A student block the parser could not segment into sections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub block_index: usize,
    /// 1-indexed line where the block starts
    pub line: usize,
    pub excerpt: String,
    pub reason: String,
}
