use reccheck_core::{Area, Finding, RuleId, StudentRecord};

use super::{Gate, Rule, RuleOutcome, evidence};

/// Rule 2: the remarks carry the perfect-attendance marker exactly when
/// every attendance category is zero.
pub struct PerfectAttendanceRule {
    marker: String,
}

impl PerfectAttendanceRule {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl Rule for PerfectAttendanceRule {
    fn name(&self) -> &'static str {
        "perfect_attendance"
    }

    fn gate(&self) -> Option<Gate> {
        Some(Gate::PerfectAttendance)
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome {
        let has_marker = record.remarks_text.contains(&self.marker);

        // Unknown counts are reported by the justification rule
        let Some(zero_absence) = record.attendance.zero_absence() else {
            tracing::debug!(
                "Skipping perfect-attendance check for {}: unknown counts",
                record.student_id
            );
            return RuleOutcome::empty();
        };

        let finding = match (zero_absence, has_marker) {
            (true, false) => Finding::new(
                record,
                Area::Attendance,
                RuleId::MissingPerfectAttendanceMarker,
                format!(
                    "No absence, tardy, early leave or early return recorded, but the remarks do not contain \"{}\"{}",
                    self.marker,
                    evidence(record, "remarks_text")
                ),
                format!("Add \"{}\" to the attendance remarks", self.marker),
            ),
            (false, true) => Finding::new(
                record,
                Area::Attendance,
                RuleId::SpuriousPerfectAttendanceMarker,
                format!(
                    "The remarks contain \"{}\" but attendance events are recorded{}",
                    self.marker,
                    evidence(record, "remarks_text")
                ),
                format!("Remove \"{}\" from the attendance remarks", self.marker),
            ),
            _ => return RuleOutcome::empty(),
        };

        vec![finding].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reccheck_core::{Attendance, AttendanceCategory, CategoryEntry};

    fn rule() -> PerfectAttendanceRule {
        PerfectAttendanceRule::new("개근")
    }

    #[test]
    fn test_missing_marker() {
        let record = StudentRecord::new("1", "")
            .with_attendance(Attendance::perfect(190))
            .with_remarks("우수한 학생입니다");
        let outcome = rule().evaluate(&record);

        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(
            outcome.findings[0].rule_id,
            RuleId::MissingPerfectAttendanceMarker
        );
    }

    #[test]
    fn test_spurious_marker() {
        let attendance = Attendance::perfect(190)
            .with(AttendanceCategory::Tardy, CategoryEntry::known(1, false));
        let record = StudentRecord::new("1", "")
            .with_attendance(attendance)
            .with_remarks("개근");
        let outcome = rule().evaluate(&record);

        assert_eq!(
            outcome.findings[0].rule_id,
            RuleId::SpuriousPerfectAttendanceMarker
        );
    }

    #[test]
    fn test_consistent_records_pass() {
        let perfect = StudentRecord::new("1", "")
            .with_attendance(Attendance::perfect(190))
            .with_remarks("개근함");
        assert!(rule().evaluate(&perfect).findings.is_empty());

        let absent = StudentRecord::new("2", "").with_attendance(
            Attendance::perfect(190)
                .with(AttendanceCategory::AbsenceSick, CategoryEntry::known(2, true)),
        );
        assert!(rule().evaluate(&absent).findings.is_empty());
    }

    #[test]
    fn test_unknown_counts_skip() {
        let attendance =
            Attendance::perfect(190).with(AttendanceCategory::EarlyReturn, CategoryEntry::default());
        let record = StudentRecord::new("1", "").with_attendance(attendance);

        assert!(rule().evaluate(&record).findings.is_empty());
    }
}
