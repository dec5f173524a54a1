use reccheck_core::{Area, Finding, RuleId, Section, StudentRecord};

use super::{Rule, RuleOutcome, parse_ambiguous};

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Rule 5: the activity text mentions at least one required program.
///
/// Matching ignores whitespace, so "학교 폭력 예방" counts for "학교폭력예방".
pub struct ActivityProgramRule {
    keywords: Vec<String>,
}

impl ActivityProgramRule {
    pub fn new(keywords: Vec<String>) -> Self {
        Self { keywords }
    }
}

impl Rule for ActivityProgramRule {
    fn name(&self) -> &'static str {
        "activity_program"
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome {
        if self.keywords.is_empty() {
            return RuleOutcome::empty();
        }
        if record.is_section_missing(Section::Activities) {
            return vec![parse_ambiguous(
                record,
                Area::Activities,
                "activities",
                "section not found",
            )]
            .into();
        }

        let text = compact(&record.activity_text);
        if self.keywords.iter().any(|k| text.contains(&compact(k))) {
            return RuleOutcome::empty();
        }

        vec![Finding::new(
            record,
            Area::Activities,
            RuleId::MissingRequiredProgramMention,
            format!(
                "Activity text mentions none of the required programs ({})",
                self.keywords.join(", ")
            ),
            "Record participation in at least one required program".to_string(),
        )]
        .into()
    }
}
