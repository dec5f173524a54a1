//! Personal-information redaction engine

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// Identifier-shaped numbers in one alternation, so a single left-to-right
// pass decides every match. Digits are masked in place so the layout survives.
static IDENTIFIERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<national_id>[0-9]{6}-[0-9]{7})",
        r"|(?P<mobile_phone>01[016789]-?[0-9]{3,4}-?[0-9]{4})",
        r"|(?P<landline_phone>0(?:2|[3-6][1-5])-[0-9]{3,4}-[0-9]{4})",
    ))
    .unwrap()
});

/// Capture group name and the redaction type it reports as
const IDENTIFIER_KINDS: [(&str, &str); 3] = [
    ("national_id", "NATIONAL_ID"),
    ("mobile_phone", "MOBILE_PHONE"),
    ("landline_phone", "LANDLINE_PHONE"),
];

// 2-4 syllables directly followed by a title, e.g. "김철수 학생"
static TITLED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([가-힣]{2,4}) (?:교사|학생|어린이)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionInfo {
    pub redaction_type: String,
    pub count: usize,
}

/// Redacted text plus what was masked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redaction {
    pub text: String,
    pub substitutions: usize,
    pub details: Vec<RedactionInfo>,
}

/// Masks national IDs, phone numbers and names in extracted record text
pub struct Redactor {
    name_placeholder: String,
    mask_titled_names: bool,
}

impl Redactor {
    pub fn new() -> Self {
        Self {
            name_placeholder: "○○○".to_string(),
            mask_titled_names: true,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.name_placeholder = placeholder.into();
        self
    }

    pub fn with_titled_names(mut self, enabled: bool) -> Self {
        self.mask_titled_names = enabled;
        self
    }

    pub fn placeholder(&self) -> &str {
        &self.name_placeholder
    }

    /// Redact identifiers and the given names from content.
    ///
    /// Running it again on its own output changes nothing.
    pub fn redact(&self, content: &str, names: &[String]) -> Redaction {
        let mut result = content.to_string();
        let mut details = Vec::new();

        let (masked, counts) = mask_identifiers(&result);
        result = masked;
        for ((_, kind), count) in IDENTIFIER_KINDS.iter().zip(counts) {
            if count > 0 {
                details.push(RedactionInfo {
                    redaction_type: kind.to_string(),
                    count,
                });
            }
        }

        let mut name_count = 0;
        for name in self.ordered_names(names) {
            let count = result.matches(name).count();
            if count > 0 {
                result = result.replace(name, &self.name_placeholder);
                name_count += count;
            }
        }
        if name_count > 0 {
            details.push(RedactionInfo {
                redaction_type: "NAME".to_string(),
                count: name_count,
            });
        }

        if self.mask_titled_names {
            let (masked, count) = self.mask_titled(&result);
            if count > 0 {
                result = masked;
                details.push(RedactionInfo {
                    redaction_type: "TITLED_NAME".to_string(),
                    count,
                });
            }
        }

        let substitutions = details.iter().map(|d| d.count).sum();
        Redaction {
            text: result,
            substitutions,
            details,
        }
    }

    /// Longest first so "김철수" is masked before "철수"; ties keep input order.
    /// Names with digits are skipped, since removing a digit can unglue an identifier.
    fn ordered_names<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        let mut ordered: Vec<&str> = Vec::new();
        for name in names {
            let name = name.trim();
            if name.is_empty()
                || name.chars().any(|c| self.name_placeholder.contains(c))
                || name.chars().any(|c| c.is_ascii_digit())
                || ordered.contains(&name)
            {
                continue;
            }
            ordered.push(name);
        }
        ordered.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));
        ordered
    }

    fn mask_titled(&self, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;
        let mut count = 0;

        // Resume right after each name so back-to-back titles are all seen
        while let Some(caps) = TITLED_NAME.captures_at(text, pos) {
            let Some(name) = caps.get(1) else { break };
            out.push_str(&text[pos..name.start()]);
            out.push_str(&self.name_placeholder);
            pos = name.end();
            count += 1;
        }
        out.push_str(&text[pos..]);
        (out, count)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace every ASCII digit in each identifier match with '*'. Matches glued
/// to more digits are part of some longer number and are left alone.
fn mask_identifiers(text: &str) -> (String, [usize; 3]) {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut counts = [0usize; 3];

    for caps in IDENTIFIERS.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let glued_before = m.start() > 0 && bytes[m.start() - 1].is_ascii_digit();
        let glued_after = m.end() < bytes.len() && bytes[m.end()].is_ascii_digit();
        if glued_before || glued_after {
            continue;
        }
        if let Some(slot) = IDENTIFIER_KINDS
            .iter()
            .position(|(group, _)| caps.name(group).is_some())
        {
            counts[slot] += 1;
        }
        out.push_str(&text[last..m.start()]);
        out.extend(
            m.as_str()
                .chars()
                .map(|c| if c.is_ascii_digit() { '*' } else { c }),
        );
        last = m.end();
    }
    out.push_str(&text[last..]);
    (out, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_national_id_redaction() {
        let redactor = Redactor::new();
        let redaction = redactor.redact("주민번호 900101-1234567 확인", &[]);

        assert_eq!(redaction.text, "주민번호 ******-******* 확인");
        assert_eq!(redaction.details.len(), 1);
        assert_eq!(redaction.details[0].redaction_type, "NATIONAL_ID");
        assert_eq!(redaction.substitutions, 1);
    }

    #[test]
    fn test_phone_redaction() {
        let redactor = Redactor::new();
        let redaction = redactor.redact("보호자 010-1234-5678, 학교 02-123-4567", &[]);

        assert_eq!(redaction.text, "보호자 ***-****-****, 학교 **-***-****");
        assert_eq!(redaction.substitutions, 2);
    }

    #[test]
    fn test_glued_digits_left_alone() {
        let redactor = Redactor::new();
        let content = "문서번호 1900101-12345678";
        let redaction = redactor.redact(content, &[]);

        assert_eq!(redaction.text, content);
        assert_eq!(redaction.substitutions, 0);
    }

    #[test]
    fn test_longest_name_first() {
        let redactor = Redactor::new().with_titled_names(false);
        let redaction = redactor.redact("김철수와 철수는 다르다", &names(&["철수", "김철수"]));

        assert_eq!(redaction.text, "○○○와 ○○○는 다르다");
        assert_eq!(redaction.details[0].redaction_type, "NAME");
        assert_eq!(redaction.details[0].count, 2);
    }

    #[test]
    fn test_titled_name_heuristic() {
        let redactor = Redactor::new();
        let redaction = redactor.redact("홍길동 학생은 이몽룡 교사와 상담함.", &[]);

        assert_eq!(redaction.text, "○○○ 학생은 ○○○ 교사와 상담함.");
        assert_eq!(redaction.substitutions, 2);
    }

    #[test]
    fn test_idempotent_on_repeated_titles() {
        let redactor = Redactor::new();
        let first = redactor.redact("철수 학생 학생 교사", &[]);
        let second = redactor.redact(&first.text, &[]);

        assert_eq!(first.text, second.text);
        assert_eq!(second.substitutions, 0);
    }

    #[test]
    fn test_no_personal_info() {
        let redactor = Redactor::new().with_titled_names(false);
        let content = "수업일수: 190";

        let redaction = redactor.redact(content, &[]);

        assert_eq!(redaction.text, content);
        assert!(redaction.details.is_empty());
    }

    #[test]
    fn test_names_sharing_placeholder_chars_ignored() {
        let redactor = Redactor::new().with_titled_names(false);
        let redaction = redactor.redact("○철 김철", &names(&["○철", " ", "김철"]));

        assert_eq!(redaction.text, "○철 ○○○");
    }

    #[test]
    fn test_names_with_digits_ignored() {
        let redactor = Redactor::new().with_titled_names(false);
        let first = redactor.redact("연락처 9010-1234-5678", &names(&["9"]));
        let second = redactor.redact(&first.text, &names(&["9"]));

        assert_eq!(first.text, "연락처 9010-1234-5678");
        assert_eq!(second.text, first.text);
        assert_eq!(second.substitutions, 0);
    }
}
