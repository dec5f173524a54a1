use reccheck_core::{Area, Count, Finding, RuleId, Section, StudentRecord};

use super::{Gate, Rule, RuleOutcome, evidence, parse_ambiguous};

/// Rule 1: the scheduled day count must equal the policy constant.
///
/// Any failure here closes the perfect-attendance gate, since the marker
/// cannot be judged against a wrong or unreadable day count.
pub struct ScheduledDaysRule {
    required: u32,
}

impl ScheduledDaysRule {
    pub fn new(required: u32) -> Self {
        Self { required }
    }
}

impl Rule for ScheduledDaysRule {
    fn name(&self) -> &'static str {
        "scheduled_days"
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome {
        let mut outcome = RuleOutcome::empty();

        if record.is_section_missing(Section::Attendance) {
            outcome.push(parse_ambiguous(
                record,
                Area::Attendance,
                "attendance",
                "section not found",
            ));
            return outcome
                .close(Gate::PerfectAttendance)
                .close(Gate::Justification);
        }

        match record.attendance.scheduled_days {
            Count::Unknown => {
                outcome.push(parse_ambiguous(
                    record,
                    Area::Attendance,
                    "scheduled_days",
                    &format!("no readable value{}", evidence(record, "scheduled_days")),
                ));
                outcome.close(Gate::PerfectAttendance)
            }
            Count::Known(days) if days != self.required => {
                outcome.push(Finding::new(
                    record,
                    Area::Attendance,
                    RuleId::ScheduledDaysError,
                    format!(
                        "Scheduled days is {}, expected {}{}",
                        days,
                        self.required,
                        evidence(record, "scheduled_days")
                    ),
                    format!("Correct the scheduled days to {}", self.required),
                ));
                outcome.close(Gate::PerfectAttendance)
            }
            Count::Known(_) => outcome,
        }
    }
}
