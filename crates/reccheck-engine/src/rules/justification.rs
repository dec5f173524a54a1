use reccheck_config::AttendanceConfig;
use reccheck_core::{
    Area, AttendanceCategory, CategoryGroup, Count, Finding, RuleId, StudentRecord,
};

use super::{Gate, Rule, RuleOutcome, evidence, parse_ambiguous};

/// Rule 3: categories above their threshold need a reason.
///
/// - Other absences need one from the first occurrence.
/// - Sick, unexcused and excused absences are judged jointly: a reason is
///   required once their total reaches the cumulative threshold or a stated
///   consecutive run reaches the long-absence threshold.
/// - Tardy, early leave and early return are judged jointly against the
///   tardy threshold.
///
/// Below a threshold a missing reason is not an error.
pub struct JustificationRule {
    long_absence_run: u32,
    short_absence_cumulative: u32,
    tardy_cumulative: u32,
}

/// Known total of a group and whether some member was unreadable
struct GroupTotal {
    known: u32,
    any_unknown: bool,
}

impl JustificationRule {
    pub fn new(long_absence_run: u32, short_absence_cumulative: u32, tardy_cumulative: u32) -> Self {
        Self {
            long_absence_run,
            short_absence_cumulative,
            tardy_cumulative,
        }
    }

    pub fn from_config(config: &AttendanceConfig) -> Self {
        Self::new(
            config.long_absence_run_threshold,
            config.short_absence_cumulative_threshold,
            config.tardy_cumulative_threshold,
        )
    }

    fn group_total(record: &StudentRecord, group: CategoryGroup) -> GroupTotal {
        let mut total = GroupTotal {
            known: 0,
            any_unknown: false,
        };
        for category in AttendanceCategory::ALL.iter().filter(|c| c.group() == group) {
            match record.attendance.entry(*category).count {
                Count::Known(n) => total.known = total.known.saturating_add(n),
                Count::Unknown => total.any_unknown = true,
            }
        }
        total
    }

    /// Whether the group needs reasons. `None` when unknown members leave it undecided.
    fn is_required(&self, record: &StudentRecord, group: CategoryGroup) -> Option<bool> {
        let total = Self::group_total(record, group);
        let required = match group {
            CategoryGroup::OtherAbsence => total.known >= 1,
            CategoryGroup::ShortAbsence => {
                total.known >= self.short_absence_cumulative
                    || record
                        .attendance
                        .longest_absence_run
                        .is_some_and(|run| run >= self.long_absence_run)
            }
            CategoryGroup::Irregular => total.known >= self.tardy_cumulative,
        };

        if required {
            Some(true)
        } else if total.any_unknown {
            None
        } else {
            Some(false)
        }
    }

    fn threshold_note(&self, record: &StudentRecord, group: CategoryGroup) -> String {
        match group {
            CategoryGroup::OtherAbsence => "any other absence needs a reason".to_string(),
            CategoryGroup::ShortAbsence => match record.attendance.longest_absence_run {
                Some(run) if run >= self.long_absence_run => format!(
                    "a consecutive absence of {} days reaches the {}-day threshold",
                    run, self.long_absence_run
                ),
                _ => format!(
                    "sick, unexcused and excused absences total {} days, threshold {}",
                    Self::group_total(record, group).known,
                    self.short_absence_cumulative
                ),
            },
            CategoryGroup::Irregular => format!(
                "tardy, early leave and early return total {}, threshold {}",
                Self::group_total(record, group).known,
                self.tardy_cumulative
            ),
        }
    }
}

impl Rule for JustificationRule {
    fn name(&self) -> &'static str {
        "justification"
    }

    fn gate(&self) -> Option<Gate> {
        Some(Gate::Justification)
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome {
        let mut outcome = RuleOutcome::empty();

        for category in record.attendance.unknown_categories() {
            outcome.push(parse_ambiguous(
                record,
                Area::Attendance,
                category.as_str(),
                &format!(
                    "\"{}\" missing or unreadable{}",
                    category.label(),
                    evidence(record, category.as_str())
                ),
            ));
        }

        for category in AttendanceCategory::ALL {
            let entry = record.attendance.entry(category);
            let Count::Known(count) = entry.count else {
                continue;
            };
            if count == 0 || entry.has_reason_text {
                continue;
            }

            match self.is_required(record, category.group()) {
                Some(true) => outcome.push(Finding::new(
                    record,
                    Area::Attendance,
                    RuleId::MissingJustification,
                    format!(
                        "{} ({}) count {} has no reason: {}{}",
                        category.label(),
                        category.as_str(),
                        count,
                        self.threshold_note(record, category.group()),
                        evidence(record, category.as_str())
                    ),
                    format!("Add the reason for {} to the attendance record", category.label()),
                )),
                Some(false) => {}
                None => tracing::debug!(
                    "Justification for {} of {} undecided: group has unknown counts",
                    category.as_str(),
                    record.student_id
                ),
            }
        }

        outcome
    }
}
