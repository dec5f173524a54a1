//! Subject section extraction

use std::collections::{BTreeMap, BTreeSet};

use reccheck_core::{Error, Result};
use regex::Regex;

use crate::segment::Line;

/// Fields read from one subject section
#[derive(Debug, Clone, Default)]
pub struct SubjectSection {
    pub present: BTreeSet<String>,
    pub notes: BTreeMap<String, String>,
    pub excerpts: BTreeMap<String, String>,
}

/// Recognizes subject header lines for a fixed subject list
pub struct SubjectMatcher {
    header: Regex,
}

impl SubjectMatcher {
    pub fn new(subjects: &[String]) -> Result<Self> {
        // Longest first so a subject never shadows a longer one it prefixes
        let mut names: Vec<&str> = subjects.iter().map(|s| s.trim()).collect();
        if names.is_empty() || names.iter().any(|n| n.is_empty()) {
            return Err(Error::Configuration(
                "Subject list is empty or has an empty entry".to_string(),
            ));
        }
        names.sort_by_key(|n| std::cmp::Reverse(n.chars().count()));
        let alternation = names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");

        // Matches: "국어: ...", "[국어] ...", or "국어" alone on its line.
        // "국어 시간에 ..." is prose, not a header.
        let pattern = format!(
            r"^\s*(?:\[\s*({alt})\s*\]\s*[:：]?|({alt})\s*[:：]|({alt})\s*$)\s*(.*)$",
            alt = alternation
        );

        let header = Regex::new(&pattern)
            .map_err(|e| Error::Configuration(format!("Invalid subject list: {}", e)))?;
        Ok(Self { header })
    }

    /// Subject named by a header line, and the text after it
    fn header<'t>(&self, line: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = self.header.captures(line)?;
        let subject = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
        let rest = caps.get(4).map(|m| m.as_str()).unwrap_or("");
        Some((subject.as_str(), rest))
    }

    pub fn parse(&self, lines: &[Line<'_>]) -> SubjectSection {
        let mut notes: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        let mut excerpts: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for line in lines {
            if let Some((subject, rest)) = self.header(line.text) {
                let subject = subject.to_string();
                let entry = notes.entry(subject.clone()).or_default();
                if !rest.trim().is_empty() {
                    entry.push(rest.trim());
                }
                excerpts.entry(subject.clone()).or_default().push(line.text.trim());
                current = Some(subject);
                continue;
            }

            match &current {
                Some(subject) => {
                    if !line.text.trim().is_empty() {
                        notes.entry(subject.clone()).or_default().push(line.text.trim());
                        excerpts
                            .entry(subject.clone())
                            .or_default()
                            .push(line.text.trim());
                    }
                }
                None => {
                    tracing::debug!(
                        "Subject section line {} before any subject header",
                        line.number
                    );
                }
            }
        }

        let mut section = SubjectSection::default();
        for (subject, parts) in notes {
            let note = parts.join("\n");
            if !note.trim().is_empty() {
                section.present.insert(subject.clone());
            }
            section.notes.insert(subject, note);
        }
        section.excerpts = excerpts
            .into_iter()
            .map(|(subject, lines)| (format!("subject:{}", subject), lines.join("\n")))
            .collect();
        section
    }
}
