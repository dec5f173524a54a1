use reccheck_core::{Area, Finding, RuleId, Section, StudentRecord};

use super::{Rule, RuleOutcome, parse_ambiguous};

/// Rule 4: every required subject has a non-empty entry
pub struct SubjectCompletenessRule {
    required: Vec<String>,
}

impl SubjectCompletenessRule {
    pub fn new(required: Vec<String>) -> Self {
        Self { required }
    }
}

impl Rule for SubjectCompletenessRule {
    fn name(&self) -> &'static str {
        "subject_completeness"
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome {
        if record.is_section_missing(Section::Subjects) {
            return vec![parse_ambiguous(
                record,
                Area::Subjects,
                "subjects",
                "section not found",
            )]
            .into();
        }

        self.required
            .iter()
            .filter(|subject| !record.subjects_present.contains(subject.as_str()))
            .map(|subject| {
                Finding::new(
                    record,
                    Area::Subjects,
                    RuleId::MissingSubject,
                    format!("Subject \"{}\" has no entry", subject),
                    format!("Write the learning development entry for {}", subject),
                )
            })
            .collect::<Vec<_>>()
            .into()
    }
}
