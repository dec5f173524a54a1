//! Student record domain model

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A parsed count that keeps "could not be read" apart from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Count {
    Known(u32),
    #[default]
    Unknown,
}

impl Count {
    pub fn known(self) -> Option<u32> {
        match self {
            Count::Known(n) => Some(n),
            Count::Unknown => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Count::Unknown)
    }
}

impl std::fmt::Display for Count {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Count::Known(n) => write!(f, "{}", n),
            Count::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceCategory {
    AbsenceSick,
    AbsenceUnexcused,
    AbsenceExcused,
    AbsenceOther,
    Tardy,
    EarlyLeave,
    EarlyReturn,
}

/// How a category is grouped when deciding whether a justification is required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryGroup {
    /// Sick, unexcused and excused absences, judged jointly
    ShortAbsence,
    /// Any occurrence needs a reason
    OtherAbsence,
    /// Tardy, early leave and early return, judged jointly
    Irregular,
}

impl AttendanceCategory {
    pub const ALL: [AttendanceCategory; 7] = [
        AttendanceCategory::AbsenceSick,
        AttendanceCategory::AbsenceUnexcused,
        AttendanceCategory::AbsenceExcused,
        AttendanceCategory::AbsenceOther,
        AttendanceCategory::Tardy,
        AttendanceCategory::EarlyLeave,
        AttendanceCategory::EarlyReturn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceCategory::AbsenceSick => "absence_sick",
            AttendanceCategory::AbsenceUnexcused => "absence_unexcused",
            AttendanceCategory::AbsenceExcused => "absence_excused",
            AttendanceCategory::AbsenceOther => "absence_other",
            AttendanceCategory::Tardy => "tardy",
            AttendanceCategory::EarlyLeave => "early_leave",
            AttendanceCategory::EarlyReturn => "early_return",
        }
    }

    /// Label used for the category on the school record form
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceCategory::AbsenceSick => "질병결석",
            AttendanceCategory::AbsenceUnexcused => "미인정결석",
            AttendanceCategory::AbsenceExcused => "인정결석",
            AttendanceCategory::AbsenceOther => "기타결석",
            AttendanceCategory::Tardy => "지각",
            AttendanceCategory::EarlyLeave => "조퇴",
            AttendanceCategory::EarlyReturn => "결과",
        }
    }

    pub fn group(&self) -> CategoryGroup {
        match self {
            AttendanceCategory::AbsenceSick
            | AttendanceCategory::AbsenceUnexcused
            | AttendanceCategory::AbsenceExcused => CategoryGroup::ShortAbsence,
            AttendanceCategory::AbsenceOther => CategoryGroup::OtherAbsence,
            AttendanceCategory::Tardy
            | AttendanceCategory::EarlyLeave
            | AttendanceCategory::EarlyReturn => CategoryGroup::Irregular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CategoryEntry {
    pub count: Count,
    pub has_reason_text: bool,
}

impl CategoryEntry {
    pub fn known(count: u32, has_reason_text: bool) -> Self {
        Self {
            count: Count::Known(count),
            has_reason_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub scheduled_days: Count,
    pub categories: BTreeMap<AttendanceCategory, CategoryEntry>,
    /// Longest consecutive absence run, when the source states one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_absence_run: Option<u32>,
}

impl Attendance {
    /// Every field unread
    pub fn unknown() -> Self {
        Self {
            scheduled_days: Count::Unknown,
            categories: AttendanceCategory::ALL
                .iter()
                .map(|c| (*c, CategoryEntry::default()))
                .collect(),
            longest_absence_run: None,
        }
    }

    /// A fully read attendance block with every category at zero
    pub fn perfect(scheduled_days: u32) -> Self {
        Self {
            scheduled_days: Count::Known(scheduled_days),
            categories: AttendanceCategory::ALL
                .iter()
                .map(|c| (*c, CategoryEntry::known(0, false)))
                .collect(),
            longest_absence_run: None,
        }
    }

    pub fn entry(&self, category: AttendanceCategory) -> CategoryEntry {
        self.categories.get(&category).copied().unwrap_or_default()
    }

    pub fn set(&mut self, category: AttendanceCategory, entry: CategoryEntry) {
        self.categories.insert(category, entry);
    }

    pub fn with(mut self, category: AttendanceCategory, entry: CategoryEntry) -> Self {
        self.set(category, entry);
        self
    }

    pub fn unknown_categories(&self) -> Vec<AttendanceCategory> {
        AttendanceCategory::ALL
            .iter()
            .copied()
            .filter(|c| self.entry(*c).count.is_unknown())
            .collect()
    }

    /// Whether all seven categories are zero. `None` when that hinges on an
    /// unknown count.
    pub fn zero_absence(&self) -> Option<bool> {
        let mut any_unknown = false;
        for category in AttendanceCategory::ALL {
            match self.entry(category).count {
                Count::Known(0) => {}
                Count::Known(_) => return Some(false),
                Count::Unknown => any_unknown = true,
            }
        }
        if any_unknown { None } else { Some(true) }
    }
}

impl Default for Attendance {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Structural sections of a student block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Attendance,
    Subjects,
    Activities,
    Behavior,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Attendance,
        Section::Subjects,
        Section::Activities,
        Section::Behavior,
    ];

    /// Section header as printed on the form
    pub fn header(&self) -> &'static str {
        match self {
            Section::Attendance => "출결상황",
            Section::Subjects => "교과학습발달상황",
            Section::Activities => "창의적 체험활동",
            Section::Behavior => "행동특성 및 종합의견",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseConfidence {
    Complete,
    Partial,
}

/// One student's fields for one school year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub display_name: String,
    pub attendance: Attendance,
    pub remarks_text: String,
    pub subjects_present: BTreeSet<String>,
    #[serde(default)]
    pub subject_notes: BTreeMap<String, String>,
    pub activity_text: String,
    #[serde(default)]
    pub behavior_text: String,
    #[serde(default)]
    pub raw_excerpts: BTreeMap<String, String>,
    #[serde(default)]
    pub missing_sections: BTreeSet<Section>,
}

impl StudentRecord {
    /// Sentinel id for a block whose roster number could not be read
    pub const UNRESOLVED_ID: &'static str = "unresolved";

    pub fn new(student_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            display_name: display_name.into(),
            attendance: Attendance::unknown(),
            remarks_text: String::new(),
            subjects_present: BTreeSet::new(),
            subject_notes: BTreeMap::new(),
            activity_text: String::new(),
            behavior_text: String::new(),
            raw_excerpts: BTreeMap::new(),
            missing_sections: BTreeSet::new(),
        }
    }

    pub fn with_attendance(mut self, attendance: Attendance) -> Self {
        self.attendance = attendance;
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks_text = remarks.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>, note: impl Into<String>) -> Self {
        let subject = subject.into();
        self.subjects_present.insert(subject.clone());
        self.subject_notes.insert(subject, note.into());
        self
    }

    pub fn with_activity_text(mut self, text: impl Into<String>) -> Self {
        self.activity_text = text.into();
        self
    }

    pub fn with_behavior_text(mut self, text: impl Into<String>) -> Self {
        self.behavior_text = text.into();
        self
    }

    pub fn is_section_missing(&self, section: Section) -> bool {
        self.missing_sections.contains(&section)
    }

    pub fn confidence(&self) -> ParseConfidence {
        let attendance_unread = self.attendance.scheduled_days.is_unknown()
            || !self.attendance.unknown_categories().is_empty();
        if self.missing_sections.is_empty() && !attendance_unread {
            ParseConfidence::Complete
        } else {
            ParseConfidence::Partial
        }
    }

    /// Free-text fields in scan order, paired with a field name for evidence
    pub fn free_text_fields(&self) -> Vec<(String, &str)> {
        let mut fields = vec![
            ("activity_text".to_string(), self.activity_text.as_str()),
            ("remarks_text".to_string(), self.remarks_text.as_str()),
        ];
        for (subject, note) in &self.subject_notes {
            fields.push((format!("subject:{}", subject), note.as_str()));
        }
        fields.push(("behavior_text".to_string(), self.behavior_text.as_str()));
        fields.retain(|(_, text)| !text.trim().is_empty());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_is_not_zero() {
        let attendance = Attendance::unknown();
        assert_eq!(attendance.entry(AttendanceCategory::Tardy).count, Count::Unknown);
        assert_ne!(Count::Unknown, Count::Known(0));
        assert_eq!(attendance.unknown_categories().len(), 7);
    }

    #[test]
    fn test_zero_absence_tri_state() {
        let perfect = Attendance::perfect(190);
        assert_eq!(perfect.zero_absence(), Some(true));

        let tardy = perfect.clone().with(AttendanceCategory::Tardy, CategoryEntry::known(1, false));
        assert_eq!(tardy.zero_absence(), Some(false));

        let unread = perfect.with(AttendanceCategory::EarlyLeave, CategoryEntry::default());
        assert_eq!(unread.zero_absence(), None);

        let mixed = unread.with(AttendanceCategory::AbsenceSick, CategoryEntry::known(2, true));
        assert_eq!(mixed.zero_absence(), Some(false));
    }

    #[test]
    fn test_confidence_tracks_missing_sections() {
        let mut record = StudentRecord::new("3", "○○○").with_attendance(Attendance::perfect(190));
        assert_eq!(record.confidence(), ParseConfidence::Complete);

        record.missing_sections.insert(Section::Activities);
        assert_eq!(record.confidence(), ParseConfidence::Partial);
    }

    #[test]
    fn test_free_text_fields_skip_blank() {
        let record = StudentRecord::new("1", "")
            .with_activity_text("학교폭력예방교육 참여")
            .with_subject("국어", "글을 바르게 읽음.");

        let fields = record.free_text_fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].0, "activity_text");
        assert_eq!(fields[1].0, "subject:국어");
    }

    #[test]
    fn test_count_serialization() {
        let json = serde_json::to_string(&Count::Known(3)).unwrap();
        assert_eq!(json, r#"{"state":"known","value":3}"#);
        let parsed: Count = serde_json::from_str(r#"{"state":"unknown"}"#).unwrap();
        assert!(parsed.is_unknown());
    }
}
