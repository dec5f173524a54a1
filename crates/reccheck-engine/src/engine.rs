//! Rule engine: ordered per-record evaluation, parallel across records

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use reccheck_config::Config;
use reccheck_core::{Error, Finding, Result, StudentRecord};

use crate::rules::{Flow, Rule, default_rules};

/// Findings for one record, tagged with its position in the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEvaluation {
    pub record_index: usize,
    pub findings: Vec<Finding>,
}

pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    /// Build the engine. An invalid configuration fails here, before any
    /// record is seen.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rules: default_rules(config),
        })
    }

    /// Build from an explicit rule list
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule over one record in priority order
    pub fn evaluate(&self, record_index: usize, record: &StudentRecord) -> Vec<Finding> {
        let mut flow = Flow::default();
        let mut findings = Vec::new();

        for rule in &self.rules {
            if let Some(gate) = rule.gate()
                && !flow.is_open(gate)
            {
                tracing::debug!(
                    "Rule {} skipped for {}: {:?} closed",
                    rule.name(),
                    record.student_id,
                    gate
                );
                continue;
            }

            let outcome = rule.evaluate(record);
            for gate in outcome.closes {
                flow.close(gate);
            }
            findings.extend(outcome.findings.into_iter().map(|f| f.at_index(record_index)));
        }

        findings
    }

    /// Evaluate all records in parallel. Results keep record order.
    ///
    /// When `cancel` is set the run stops between records with
    /// `Error::Cancelled` and no partial result.
    pub fn evaluate_all(
        &self,
        records: &[StudentRecord],
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<RecordEvaluation>> {
        let evaluations = records
            .par_iter()
            .enumerate()
            .map(|(record_index, record)| {
                if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                    return Err(Error::Cancelled);
                }
                Ok(RecordEvaluation {
                    record_index,
                    findings: self.evaluate(record_index, record),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Evaluated {} records, {} findings",
            evaluations.len(),
            evaluations.iter().map(|e| e.findings.len()).sum::<usize>()
        );
        Ok(evaluations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reccheck_core::{Attendance, RuleId};

    fn compliant(id: &str) -> StudentRecord {
        let config = Config::default();
        let mut record = StudentRecord::new(id, "○○○")
            .with_attendance(Attendance::perfect(190))
            .with_remarks("개근")
            .with_activity_text("학교폭력예방 교육에 참여함.")
            .with_behavior_text("성실함.");
        for subject in &config.subjects.required_subjects {
            record = record.with_subject(subject.clone(), "성취 기준에 도달함.");
        }
        record
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.subjects.required_subjects.clear();

        assert!(matches!(
            RuleEngine::new(&config),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_compliant_record_has_no_findings() {
        let engine = RuleEngine::new(&Config::default()).unwrap();
        assert!(engine.evaluate(0, &compliant("1")).is_empty());
    }

    #[test]
    fn test_findings_carry_record_index() {
        let engine = RuleEngine::new(&Config::default()).unwrap();
        let record = compliant("1").with_attendance(Attendance::perfect(188));
        let findings = engine.evaluate(4, &record);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, RuleId::ScheduledDaysError);
        assert_eq!(findings[0].record_index, 4);
    }

    #[test]
    fn test_evaluate_all_keeps_order() {
        let engine = RuleEngine::new(&Config::default()).unwrap();
        let records: Vec<_> = (0..32).map(|i| compliant(&i.to_string())).collect();
        let evaluations = engine.evaluate_all(&records, None).unwrap();

        let indices: Vec<_> = evaluations.iter().map(|e| e.record_index).collect();
        assert_eq!(indices, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn test_cancelled_run_returns_error() {
        let engine = RuleEngine::new(&Config::default()).unwrap();
        let records = vec![compliant("1"), compliant("2")];
        let cancel = AtomicBool::new(true);

        assert!(matches!(
            engine.evaluate_all(&records, Some(&cancel)),
            Err(Error::Cancelled)
        ));
    }
}
