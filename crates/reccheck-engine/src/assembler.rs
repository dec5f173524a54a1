//! Report assembly: one flat, stably ordered finding list

use reccheck_core::{Finding, ParseFailure, Report};

use crate::engine::RecordEvaluation;

/// Flattens per-record findings into student order, then rule-priority order
#[derive(Debug, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Order does not depend on the order evaluations arrive in
    pub fn assemble(&self, mut evaluations: Vec<RecordEvaluation>) -> Vec<Finding> {
        // Stable sort keeps each record's rule-priority order
        evaluations.sort_by_key(|e| e.record_index);
        evaluations.into_iter().flat_map(|e| e.findings).collect()
    }

    pub fn report(
        &self,
        evaluations: Vec<RecordEvaluation>,
        failures: Vec<ParseFailure>,
        redactions: usize,
    ) -> Report {
        let students_checked = evaluations.len();
        let findings = self.assemble(evaluations);
        Report::new(findings, students_checked)
            .with_redactions(redactions)
            .with_parse_failures(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reccheck_core::{Area, RuleId, StudentRecord};

    fn finding(index: usize, rule_id: RuleId) -> Finding {
        let record = StudentRecord::new(index.to_string(), "");
        Finding::new(&record, Area::Attendance, rule_id, "", "").at_index(index)
    }

    #[test]
    fn test_assemble_orders_by_record_then_rule() {
        let evaluations = vec![
            RecordEvaluation {
                record_index: 1,
                findings: vec![finding(1, RuleId::MissingSubject)],
            },
            RecordEvaluation {
                record_index: 0,
                findings: vec![
                    finding(0, RuleId::ScheduledDaysError),
                    finding(0, RuleId::MissingJustification),
                ],
            },
        ];

        let findings = ReportAssembler::new().assemble(evaluations);
        let order: Vec<_> = findings.iter().map(|f| (f.record_index, f.rule_id)).collect();
        assert_eq!(
            order,
            vec![
                (0, RuleId::ScheduledDaysError),
                (0, RuleId::MissingJustification),
                (1, RuleId::MissingSubject),
            ]
        );
    }

    #[test]
    fn test_report_counts_students() {
        let evaluations = vec![
            RecordEvaluation {
                record_index: 0,
                findings: Vec::new(),
            },
            RecordEvaluation {
                record_index: 1,
                findings: Vec::new(),
            },
        ];
        let report = ReportAssembler::new().report(evaluations, Vec::new(), 3);

        assert_eq!(report.students_checked, 2);
        assert_eq!(report.redactions, 3);
        assert!(report.is_clean());
    }
}
