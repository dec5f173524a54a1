//! Report output formats

use reccheck_core::{Report, Result};
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Markdown => Ok(MarkdownFormatter::new().format(report)),
        ReportFormat::Json => render_json(report),
    }
}

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Markdown formatter for check reports
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format(&self, report: &Report) -> String {
        let mut md = String::new();
        md.push_str("# School record check\n\n");
        md.push_str(&format!("- Run: `{}`\n", report.run_id));
        if let Ok(generated) = report.generated_at.format(&Rfc3339) {
            md.push_str(&format!("- Generated: {}\n", generated));
        }
        if let Some(hash) = &report.source_hash {
            md.push_str(&format!("- Source: `{}`\n", hash));
        }
        md.push_str(&format!("- Students checked: {}\n", report.students_checked));
        md.push_str(&format!("- Redactions: {}\n", report.redactions));
        md.push_str(&format!("- Findings: {}\n\n", report.findings.len()));

        if report.is_clean() {
            md.push_str("No issues found.\n");
            return md;
        }

        if !report.findings.is_empty() {
            md.push_str("## Findings by area\n\n");
            for (area, count) in report.count_by_area() {
                md.push_str(&format!("- {}: {}\n", area.as_str(), count));
            }
            md.push('\n');

            md.push_str("## Findings\n\n");
            md.push_str("| # | Student | Area | Rule | Description | Suggested fix |\n");
            md.push_str("|---|---|---|---|---|---|\n");
            for (i, finding) in report.findings.iter().enumerate() {
                let student = if finding.display_name.is_empty() {
                    finding.student_id.clone()
                } else {
                    format!("{} {}", finding.student_id, finding.display_name)
                };
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    i + 1,
                    escape_cell(&student),
                    finding.area.as_str(),
                    finding.rule_id,
                    escape_cell(&finding.description),
                    escape_cell(&finding.suggested_fix)
                ));
            }
            md.push('\n');
        }

        if !report.parse_failures.is_empty() {
            md.push_str("## Unparsed blocks\n\n");
            for failure in &report.parse_failures {
                md.push_str(&format!(
                    "- Block {} (line {}): {} `{}`\n",
                    failure.block_index,
                    failure.line,
                    failure.reason,
                    failure.excerpt.replace('`', "'")
                ));
            }
        }

        md
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep table cells on one row
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reccheck_core::{Area, Finding, ParseFailure, RuleId, StudentRecord};

    fn report() -> Report {
        let record = StudentRecord::new("3", "○○○");
        let finding = Finding::new(
            &record,
            Area::Subjects,
            RuleId::MissingSubject,
            "Subject \"영어\" has no entry",
            "Write the entry | now",
        );
        Report::new(vec![finding], 1).with_source_hash("abc".to_string())
    }

    #[test]
    fn test_markdown_table() {
        let md = MarkdownFormatter::new().format(&report());

        assert!(md.contains("# School record check"));
        assert!(md.contains("- Source: `abc`"));
        assert!(md.contains("| 1 | 3 ○○○ | Subjects | MissingSubject |"));
        assert!(md.contains("Write the entry \\| now"));
        assert!(md.contains("- Subjects: 1"));
    }

    #[test]
    fn test_markdown_clean_report() {
        let md = MarkdownFormatter::new().format(&Report::new(Vec::new(), 2));
        assert!(md.contains("No issues found."));
        assert!(!md.contains("## Findings"));
    }

    #[test]
    fn test_markdown_lists_parse_failures() {
        let report = Report::new(Vec::new(), 0).with_parse_failures(vec![ParseFailure {
            block_index: 2,
            line: 40,
            excerpt: "번호: 3".to_string(),
            reason: "no recognizable section headers".to_string(),
        }]);
        let md = MarkdownFormatter::new().format(&report);

        assert!(md.contains("## Unparsed blocks"));
        assert!(md.contains("Block 2 (line 40)"));
    }

    #[test]
    fn test_json_output() {
        let json = render(&report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["students_checked"], 1);
        assert_eq!(value["findings"][0]["rule_id"], "MissingSubject");
        assert_eq!(value["findings"][0]["area"], "Subjects");
    }
}
