//! Attendance section extraction

use std::collections::BTreeMap;
use std::sync::LazyLock;

use reccheck_core::{Attendance, AttendanceCategory, CategoryEntry, CategoryGroup, Count};
use regex::Regex;

use crate::segment::Line;

// Matches: 수업일수: 190 / 수업 일수 190일
static SCHEDULED_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*수업\s*일수(\s*[:：].*|\s.*|[0-9.].*|)$").unwrap());

// Matches: 특기사항: ... / 비고 ...
static REMARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:특기\s*사항|비고)\s*[:：]?\s*(.*)$").unwrap());

// Matches: 사유: 독감 (a reason on its own line, attached to the previous category)
static REASON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[(\[]?\s*사유\s*[:：]?\s*(.*)$").unwrap());

// Matches: 7일 연속 / 5일간 연속 / 연속 8일
static ABSENCE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*일\s*(?:간\s*)?연속|연속\s*(?:으로\s*)?([0-9]+)\s*일").unwrap()
});

// A count with an optional unit, then whatever follows
static VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\s*(?:일|회)?(.*)$").unwrap());

static CATEGORY_LINES: LazyLock<Vec<(AttendanceCategory, Regex)>> = LazyLock::new(|| {
    AttendanceCategory::ALL
        .iter()
        .map(|c| {
            // The label must end at a separator, so "결과적으로" is not 결과
            let pattern = format!(
                r"^\s*{}(?:일수|횟수)?(\s*[:：].*|\s.*|[0-9.].*|)$",
                c.label()
            );
            (*c, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Fields read from one attendance section
#[derive(Debug, Clone)]
pub struct AttendanceSection {
    pub attendance: Attendance,
    pub remarks_text: String,
    pub excerpts: BTreeMap<String, String>,
}

/// Parsed value of a label line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LabelValue {
    count: Count,
    has_reason: bool,
}

/// Read the value part after a label. NEIS prints zero as ".".
fn parse_value(rest: &str) -> LabelValue {
    let rest = rest.trim().trim_start_matches([':', '：']).trim();
    if rest == "." {
        return LabelValue {
            count: Count::Known(0),
            has_reason: false,
        };
    }

    match VALUE.captures(rest) {
        Some(caps) => {
            let count = caps[1].parse::<u32>().map(Count::Known).unwrap_or(Count::Unknown);
            LabelValue {
                count,
                has_reason: is_reason_text(&caps[2]),
            }
        }
        None => LabelValue {
            count: Count::Unknown,
            has_reason: false,
        },
    }
}

/// Whether trailing text is a real justification and not just punctuation
fn is_reason_text(trailing: &str) -> bool {
    let stripped = trailing
        .trim()
        .trim_start_matches(|c: char| c.is_whitespace() || "-–:：,()[]/".contains(c))
        .trim_start_matches("사유")
        .trim_matches(|c: char| c.is_whitespace() || "-–:：,()[]/.".contains(c));
    !stripped.is_empty()
}

/// Merge a repeated label; conflicting counts make the field unknown
fn merge(previous: Option<LabelValue>, next: LabelValue) -> LabelValue {
    match previous {
        None => next,
        Some(prev) if prev.count == next.count => LabelValue {
            count: prev.count,
            has_reason: prev.has_reason || next.has_reason,
        },
        Some(_) => LabelValue {
            count: Count::Unknown,
            has_reason: false,
        },
    }
}

fn push_excerpt(excerpts: &mut BTreeMap<String, String>, key: &str, line: &str) {
    excerpts
        .entry(key.to_string())
        .and_modify(|e| {
            e.push('\n');
            e.push_str(line);
        })
        .or_insert_with(|| line.to_string());
}

pub fn parse_attendance(lines: &[Line<'_>]) -> AttendanceSection {
    let mut scheduled: Option<LabelValue> = None;
    let mut values: BTreeMap<AttendanceCategory, LabelValue> = BTreeMap::new();
    let mut excerpts = BTreeMap::new();
    let mut remarks: Vec<&str> = Vec::new();
    let mut in_remarks = false;
    let mut last_category: Option<AttendanceCategory> = None;

    for line in lines {
        let text = line.text;
        if text.trim().is_empty() {
            continue;
        }

        // Inside the remarks, only a label line with a readable value ends them
        if let Some(caps) = SCHEDULED_DAYS.captures(text) {
            let value = parse_value(&caps[1]);
            if !(in_remarks && value.count.is_unknown()) {
                scheduled = Some(merge(scheduled, value));
                push_excerpt(&mut excerpts, "scheduled_days", text.trim());
                in_remarks = false;
                last_category = None;
                continue;
            }
        }

        if let Some((category, caps)) = CATEGORY_LINES
            .iter()
            .find_map(|(c, re)| re.captures(text).map(|caps| (*c, caps)))
        {
            let value = parse_value(&caps[1]);
            if !(in_remarks && value.count.is_unknown()) {
                let merged = merge(values.get(&category).copied(), value);
                values.insert(category, merged);
                push_excerpt(&mut excerpts, category.as_str(), text.trim());
                in_remarks = false;
                last_category = Some(category);
                continue;
            }
        }

        if let Some(caps) = REMARKS.captures(text) {
            in_remarks = true;
            last_category = None;
            let rest = caps.get(1).map_or("", |m| m.as_str()).trim();
            if !rest.is_empty() {
                remarks.push(rest);
            }
            continue;
        }

        if in_remarks {
            remarks.push(text.trim());
            continue;
        }

        if let (Some(category), Some(caps)) = (last_category, REASON_LINE.captures(text)) {
            if is_reason_text(&caps[1])
                && let Some(value) = values.get_mut(&category)
            {
                value.has_reason = true;
                push_excerpt(&mut excerpts, category.as_str(), text.trim());
            }
            continue;
        }

        tracing::debug!("Unrecognized attendance line {}: {}", line.number, text.trim());
    }

    let remarks_text = remarks.join("\n");
    if !remarks_text.is_empty() {
        excerpts.insert("remarks_text".to_string(), remarks_text.clone());
    }

    let mut attendance = Attendance::unknown();
    attendance.scheduled_days = scheduled.map(|v| v.count).unwrap_or(Count::Unknown);
    for (category, value) in &values {
        attendance.set(
            *category,
            CategoryEntry {
                count: value.count,
                has_reason_text: value.has_reason,
            },
        );
    }

    // A stated run counts only next to a short absence count or in the remarks,
    // and never beyond the group total when every member is known
    let run_keys: Vec<&str> = AttendanceCategory::ALL
        .iter()
        .filter(|c| c.group() == CategoryGroup::ShortAbsence)
        .map(|c| c.as_str())
        .chain(["remarks_text"])
        .collect();
    let group_total = AttendanceCategory::ALL
        .iter()
        .filter(|c| c.group() == CategoryGroup::ShortAbsence)
        .try_fold(0u32, |sum, c| {
            attendance.entry(*c).count.known().map(|n| sum.saturating_add(n))
        });
    attendance.longest_absence_run = excerpts
        .iter()
        .filter(|(key, _)| run_keys.contains(&key.as_str()))
        .flat_map(|(_, text)| ABSENCE_RUN.captures_iter(text))
        .filter_map(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .and_then(|m| m.as_str().parse::<u32>().ok())
        })
        .filter(|run| group_total.is_none_or(|total| *run <= total))
        .max();

    AttendanceSection {
        attendance,
        remarks_text,
        excerpts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<Line<'_>> {
        text.lines()
            .enumerate()
            .map(|(i, text)| Line { number: i + 1, text })
            .collect()
    }

    #[test]
    fn test_full_section() {
        let text = "수업일수: 190\n질병결석: 2 (사유: 독감)\n미인정결석: 0\n인정결석: .\n기타결석: 1\n지각: 3회\n조퇴: 0\n결과: 0\n특기사항: 개근";
        let section = parse_attendance(&lines(text));
        let a = &section.attendance;

        assert_eq!(a.scheduled_days, Count::Known(190));
        assert_eq!(
            a.entry(AttendanceCategory::AbsenceSick),
            CategoryEntry::known(2, true)
        );
        assert_eq!(
            a.entry(AttendanceCategory::AbsenceExcused).count,
            Count::Known(0)
        );
        assert_eq!(
            a.entry(AttendanceCategory::AbsenceOther),
            CategoryEntry::known(1, false)
        );
        assert_eq!(a.entry(AttendanceCategory::Tardy).count, Count::Known(3));
        assert!(a.unknown_categories().is_empty());
        assert_eq!(section.remarks_text, "개근");
        assert_eq!(section.excerpts["absence_sick"], "질병결석: 2 (사유: 독감)");
    }

    #[test]
    fn test_missing_label_is_unknown_not_zero() {
        let section = parse_attendance(&lines("수업일수: 190\n질병결석: 0"));
        let a = &section.attendance;

        assert_eq!(a.entry(AttendanceCategory::AbsenceSick).count, Count::Known(0));
        assert_eq!(a.entry(AttendanceCategory::Tardy).count, Count::Unknown);
        assert_eq!(a.unknown_categories().len(), 6);
    }

    #[test]
    fn test_non_numeric_and_conflicting_values() {
        let section = parse_attendance(&lines("수업일수: 미상\n지각: 2\n지각: 3"));
        let a = &section.attendance;

        assert_eq!(a.scheduled_days, Count::Unknown);
        assert_eq!(a.entry(AttendanceCategory::Tardy).count, Count::Unknown);
    }

    #[test]
    fn test_reason_on_following_line() {
        let section = parse_attendance(&lines("기타결석: 1\n사유: 가족 행사 참석"));
        assert_eq!(
            section.attendance.entry(AttendanceCategory::AbsenceOther),
            CategoryEntry::known(1, true)
        );
    }

    #[test]
    fn test_unit_only_is_not_a_reason() {
        let section = parse_attendance(&lines("질병결석: 3일\n조퇴 1회 ()"));
        let a = &section.attendance;

        assert!(!a.entry(AttendanceCategory::AbsenceSick).has_reason_text);
        assert!(!a.entry(AttendanceCategory::EarlyLeave).has_reason_text);
    }

    #[test]
    fn test_label_prefix_in_prose_is_not_a_label() {
        let text = "결과: 0\n특기사항: 성실함.\n결과적으로 지각 없이 생활함.";
        let section = parse_attendance(&lines(text));

        assert_eq!(
            section.attendance.entry(AttendanceCategory::EarlyReturn).count,
            Count::Known(0)
        );
        assert_eq!(section.remarks_text, "성실함.\n결과적으로 지각 없이 생활함.");
    }

    #[test]
    fn test_absence_run_from_remarks() {
        let text = "질병결석: 9 (입원)\n특기사항: 폐렴으로 8일간 연속 결석함.\n이후 정상 등교함.";
        let section = parse_attendance(&lines(text));

        assert_eq!(section.attendance.longest_absence_run, Some(8));
        assert_eq!(section.remarks_text, "폐렴으로 8일간 연속 결석함.\n이후 정상 등교함.");
    }

    #[test]
    fn test_run_on_tardy_line_is_not_an_absence_run() {
        let text = "질병결석: 1\n미인정결석: 0\n인정결석: 0\n지각: 8 (8일 연속 늦잠)";
        let section = parse_attendance(&lines(text));

        assert_eq!(section.attendance.longest_absence_run, None);
    }

    #[test]
    fn test_run_beyond_known_total_is_ignored() {
        let text = "질병결석: 2\n미인정결석: 0\n인정결석: 0\n특기사항: 9일 연속 결석함.";
        let section = parse_attendance(&lines(text));

        assert_eq!(section.attendance.longest_absence_run, None);
    }
}
