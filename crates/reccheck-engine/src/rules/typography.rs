use std::sync::LazyLock;

use reccheck_core::{Area, Finding, RuleId, StudentRecord};
use regex::Regex;

use super::{Rule, RuleOutcome, sentence_around};

// Runs of periods or commas; ".." is flagged, "..." is an ellipsis
static PUNCTUATION_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}|,{2,}").unwrap());

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

/// Rule 7: mechanical typing errors in free text
pub struct TypographyRule;

/// One typing error as (byte range, what is wrong)
type Issue = (std::ops::Range<usize>, String);

fn doubled_punctuation(text: &str) -> Vec<Issue> {
    PUNCTUATION_RUN
        .find_iter(text)
        .filter(|m| m.as_str() != "...")
        .map(|m| (m.range(), format!("doubled punctuation \"{}\"", m.as_str())))
        .collect()
}

fn repeated_words(text: &str) -> Vec<Issue> {
    let words: Vec<_> = WORD.find_iter(text).collect();
    words
        .windows(2)
        .filter(|pair| {
            pair[0].as_str() == pair[1].as_str()
                && pair[0].as_str().chars().any(|c| c.is_alphabetic())
        })
        .map(|pair| {
            (
                pair[0].start()..pair[1].end(),
                format!("repeated word \"{}\"", pair[0].as_str()),
            )
        })
        .collect()
}

fn unbalanced_brackets(text: &str) -> Option<Issue> {
    let mut open: Vec<(usize, char)> = Vec::new();
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' => open.push((i, c)),
            ')' | ']' => {
                let expected = if c == ')' { '(' } else { '[' };
                match open.pop() {
                    Some((_, o)) if o == expected => {}
                    _ => return Some((i..i + 1, format!("unmatched \"{}\"", c))),
                }
            }
            _ => {}
        }
    }
    open.first()
        .map(|(i, c)| (*i..*i + 1, format!("unclosed \"{}\"", c)))
}

impl Rule for TypographyRule {
    fn name(&self) -> &'static str {
        "typography"
    }

    fn evaluate(&self, record: &StudentRecord) -> RuleOutcome {
        let mut outcome = RuleOutcome::empty();

        for (field, text) in record.free_text_fields() {
            let mut issues = doubled_punctuation(text);
            issues.extend(repeated_words(text));
            issues.extend(unbalanced_brackets(text));
            issues.sort_by_key(|(span, _)| span.start);

            for (span, problem) in issues {
                let sentence = sentence_around(text, span.start, span.end);
                outcome.push(Finding::new(
                    record,
                    Area::Typography,
                    RuleId::TypographyIssue,
                    format!("{} in {}: \"{}\"", problem, field, sentence),
                    "Fix the typing error".to_string(),
                ));
            }
        }

        outcome
    }
}
