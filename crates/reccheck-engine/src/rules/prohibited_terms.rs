use std::ops::Range;

use reccheck_core::{Area, Finding, RuleId, StudentRecord};

use super::{Rule, RuleOutcome, sentence_around};

/// Rule 6: no prohibited term in any free-text field.
///
/// A match that sits inside an occurrence of an allow-listed institution
/// (e.g. "과학관" inside "국립과천과학관") is not a violation.
pub struct ProhibitedTermRule {
    terms: Vec<String>,
    allow_list: Vec<String>,
}

impl ProhibitedTermRule {
    pub fn new(terms: Vec<String>, allow_list: Vec<String>) -> Self {
        Self { terms, allow_list }
    }

    fn allowed_spans(&self, text: &str) -> Vec<Range<usize>> {
        self.allow_list
            .iter()
            .filter(|name| !name.is_empty())
            .flat_map(|name| {
                text.match_indices(name.as_str())
                    .map(|(start, m)| start..start + m.len())
            })
            .collect()
    }

    /// Violations in one text as (byte range, term), in text order
    fn matches(&self, text: &str) -> Vec<(Range<usize>, &str)> {
        let allowed = self.allowed_spans(text);
        let mut found: Vec<(Range<usize>, &str)> = self
            .terms
            .iter()
            .filter(|term| !term.is_empty())
            .flat_map(|term| {
                text.match_indices(term.as_str())
                    .map(move |(start, m)| (start..start + m.len(), term.as_str()))
            })
            .filter(|(span, _)| {
                !allowed
                    .iter()
                    .any(|a| a.start <= span.start && span.end <= a.end)
            })
            .collect();
        found.sort_by(|(a, _), (b, _)| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        found
    }
}

impl Rule for ProhibitedTermRule {
    fn name(&self) -> &'static str {
        "prohibited_term"
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome {
        let mut outcome = RuleOutcome::empty();

        for (field, text) in record.free_text_fields() {
            for (span, term) in self.matches(text) {
                let sentence = sentence_around(text, span.start, span.end);
                outcome.push(Finding::new(
                    record,
                    Area::ProhibitedTerm,
                    RuleId::ProhibitedTermUsage,
                    format!("Prohibited term \"{}\" in {}: \"{}\"", term, field, sentence),
                    format!("Replace \"{}\" with a generic description", term),
                ));
            }
        }

        outcome
    }
}
