//! Splitting raw text into student blocks and sections

use std::collections::BTreeMap;
use std::sync::LazyLock;

use reccheck_core::Section;
use regex::Regex;

// Matches: 번호: 12  성명: ○○○   /   번호 3번 이름 ○○○
static STUDENT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*번호\s*[:：]?\s*([0-9]+)?\s*번?(?:\s*(?:성명|이름)\s*[:：]?\s*(\S.*?))?\s*$")
        .unwrap()
});

// Leading numbering or bracket in front of a section header: "1.", "3)", "[", "【"
static HEADER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[0-9]+\s*[.)]\s*|[\[(【<]\s*)?").unwrap());

/// A line with its 1-indexed number in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// One student's slice of the document
#[derive(Debug, Clone)]
pub struct Block<'a> {
    pub index: usize,
    pub start_line: usize,
    pub roster_number: Option<String>,
    pub display_name: Option<String>,
    pub sections: BTreeMap<Section, Vec<Line<'a>>>,
    pub lines: Vec<Line<'a>>,
}

impl<'a> Block<'a> {
    pub fn section(&self, section: Section) -> Option<&[Line<'a>]> {
        self.sections.get(&section).map(|lines| lines.as_slice())
    }

    /// First non-blank lines of the block, for failure reports
    pub fn excerpt(&self) -> String {
        let text: Vec<&str> = self
            .lines
            .iter()
            .map(|l| l.text.trim())
            .filter(|t| !t.is_empty())
            .take(3)
            .collect();
        let joined = text.join(" / ");
        if joined.chars().count() > 80 {
            let cut: String = joined.chars().take(80).collect();
            format!("{}…", cut)
        } else {
            joined
        }
    }
}

/// Which section, if any, a line is the header of
pub fn section_header(line: &str) -> Option<Section> {
    let stripped = HEADER_PREFIX.replace(line, "");
    let compact: String = stripped
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ']' | ')' | '】' | '>' | ':' | '：'))
        .collect();
    if compact.is_empty() {
        return None;
    }

    Section::ALL.into_iter().find(|section| {
        let header: String = section.header().chars().filter(|c| !c.is_whitespace()).collect();
        // Allow a short suffix such as "상황" in "창의적 체험활동상황"
        compact.strip_prefix(header.as_str()).is_some_and(|rest| {
            rest.chars().count() <= 3 && !rest.chars().any(|c| c.is_ascii_digit())
        })
    })
}

/// Split text into student blocks.
///
/// Blocks start at each roster line ("번호 ..."). Documents without roster
/// lines are split at each attendance section header instead.
pub fn split_blocks(text: &str) -> Vec<Block<'_>> {
    let lines: Vec<Line<'_>> = text
        .lines()
        .enumerate()
        .map(|(i, text)| Line { number: i + 1, text })
        .collect();

    let mut starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| STUDENT_HEADER.is_match(l.text))
        .map(|(i, _)| i)
        .collect();
    let by_roster = !starts.is_empty();

    if !by_roster {
        starts = lines
            .iter()
            .enumerate()
            .filter(|(_, l)| section_header(l.text) == Some(Section::Attendance))
            .map(|(i, _)| i)
            .collect();
    }

    if starts.is_empty() {
        // Nothing structural at all: hand back the whole text as one block
        // so the caller can report it rather than drop it
        if lines.iter().any(|l| !l.text.trim().is_empty()) {
            return vec![build_block(0, &lines, false)];
        }
        return Vec::new();
    }

    if starts[0] > 0 {
        tracing::debug!("Skipping {} preamble lines", starts[0]);
    }

    let mut blocks = Vec::with_capacity(starts.len());
    for (index, window) in starts.iter().enumerate() {
        let end = starts.get(index + 1).copied().unwrap_or(lines.len());
        blocks.push(build_block(index, &lines[*window..end], by_roster));
    }
    blocks
}

fn build_block<'a>(index: usize, lines: &[Line<'a>], by_roster: bool) -> Block<'a> {
    let mut roster_number = None;
    let mut display_name = None;
    let mut body = lines;

    if by_roster && let Some(first) = lines.first() {
        if let Some(caps) = STUDENT_HEADER.captures(first.text) {
            roster_number = caps.get(1).map(|m| m.as_str().to_string());
            display_name = caps.get(2).map(|m| m.as_str().trim().to_string());
        }
        body = &lines[1..];
    }

    let mut sections: BTreeMap<Section, Vec<Line<'a>>> = BTreeMap::new();
    let mut current: Option<Section> = None;
    for line in body {
        if let Some(section) = section_header(line.text) {
            current = Some(section);
            sections.entry(section).or_default();
            continue;
        }
        if let Some(section) = current {
            sections.entry(section).or_default().push(*line);
        }
    }

    Block {
        index,
        start_line: lines.first().map(|l| l.number).unwrap_or(1),
        roster_number,
        display_name,
        sections,
        lines: lines.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_header_variants() {
        assert_eq!(section_header("1. 출결상황"), Some(Section::Attendance));
        assert_eq!(section_header("[교과학습발달상황]"), Some(Section::Subjects));
        assert_eq!(section_header("창의적 체험활동상황"), Some(Section::Activities));
        assert_eq!(section_header("창의적체험활동"), Some(Section::Activities));
        assert_eq!(section_header("행동특성 및 종합의견"), Some(Section::Behavior));
        assert_eq!(section_header("출결상황은 양호함. 특히 겨울철"), None);
        assert_eq!(section_header(""), None);
    }

    #[test]
    fn test_student_header_regex() {
        let caps = STUDENT_HEADER.captures("번호: 12  성명: ○○○").unwrap();
        assert_eq!(&caps[1], "12");
        assert_eq!(&caps[2], "○○○");

        let caps = STUDENT_HEADER.captures("번호 3번").unwrap();
        assert_eq!(&caps[1], "3");
        assert!(caps.get(2).is_none());

        assert!(!STUDENT_HEADER.is_match("주민번호 ******-*******"));
    }

    #[test]
    fn test_split_by_roster() {
        let text = "생활기록부\n번호: 1 성명: 가\n출결상황\n수업일수: 190\n번호: 2 성명: 나\n출결상황\n";
        let blocks = split_blocks(text);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].roster_number.as_deref(), Some("1"));
        assert_eq!(blocks[1].display_name.as_deref(), Some("나"));
        assert_eq!(blocks[0].start_line, 2);
        assert_eq!(
            blocks[0].section(Section::Attendance).map(|l| l.len()),
            Some(1)
        );
    }

    #[test]
    fn test_split_by_attendance_header() {
        let text = "출결상황\n수업일수: 190\n교과학습발달상황\n국어: 잘함\n출결상황\n수업일수: 188\n";
        let blocks = split_blocks(text);

        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].roster_number.is_none());
        assert!(blocks[0].section(Section::Subjects).is_some());
        assert!(blocks[1].section(Section::Subjects).is_none());
    }

    #[test]
    fn test_unstructured_text_is_single_block() {
        let blocks = split_blocks("아무 구조 없는 문장입니다.\n");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].sections.is_empty());
        assert!(split_blocks("\n  \n").is_empty());
    }
}
