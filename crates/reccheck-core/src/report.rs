//! Report domain model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::finding::{Area, Finding, ParseFailure};

/// Result of one checking run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    #[serde(with = "time::serde::timestamp")]
    pub generated_at: OffsetDateTime,
    pub students_checked: usize,
    pub redactions: usize,
    pub parse_failures: Vec<ParseFailure>,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn new(findings: Vec<Finding>, students_checked: usize) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            source_hash: None,
            generated_at: OffsetDateTime::now_utc(),
            students_checked,
            redactions: 0,
            parse_failures: Vec::new(),
            findings,
        }
    }

    pub fn with_source_hash(mut self, hash: String) -> Self {
        self.source_hash = Some(hash);
        self
    }

    pub fn with_redactions(mut self, redactions: usize) -> Self {
        self.redactions = redactions;
        self
    }

    pub fn with_parse_failures(mut self, failures: Vec<ParseFailure>) -> Self {
        self.parse_failures = failures;
        self
    }

    /// No findings and every block parsed
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.parse_failures.is_empty()
    }

    pub fn count_by_area(&self) -> BTreeMap<Area, usize> {
        let mut counts = BTreeMap::new();
        for finding in &self.findings {
            *counts.entry(finding.area).or_insert(0) += 1;
        }
        counts
    }
}
