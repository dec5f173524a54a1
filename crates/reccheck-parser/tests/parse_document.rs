use reccheck_config::Config;
use reccheck_core::{AttendanceCategory, CategoryEntry, Count, Section};
use reccheck_parser::RecordParser;

const DOCUMENT: &str = "\
2025학년도 학교생활기록부 (3학년 2반)

번호 1번 이름 ○○○
[출결상황]
수업일수 190일
질병결석 21일 (사유: 폐렴 입원 치료)
미인정결석 .
인정결석 .
기타결석 .
지각 2회
조퇴 .
결과 .
특기사항: 폐렴으로 10일 연속 결석함.
[교과학습발달상황]
국어
이야기의 흐름을 파악하여 요약함.
도덕: 약속의 중요성을 앎.
사회: 지역의 문제를 조사함.
수학: 분수의 덧셈을 함.
과학: 식물의 한살이를 관찰함.
체육: 줄넘기를 꾸준히 연습함.
음악: 리코더를 연주함.
미술: 색의 대비를 활용함.
영어: 간단한 인사를 함.
[창의적 체험활동상황]
안전교육에 참여하여 대피 요령을 익힘.
[행동특성 및 종합의견]
책임감이 강함.

번호 2번 이름 ○○○
[출결상황]
수업일수 188일
지각 3회
지각 4회
[교과학습발달상황]
국어: 시를 낭송함.
";

#[test]
fn test_parse_two_students() {
    let parser = RecordParser::from_config(&Config::default()).unwrap();
    let outcome = parser.parse(DOCUMENT);

    assert!(outcome.failures.is_empty());
    assert_eq!(outcome.records.len(), 2);

    let first = &outcome.records[0];
    assert_eq!(first.student_id, "1");
    assert_eq!(first.attendance.scheduled_days, Count::Known(190));
    assert_eq!(
        first.attendance.entry(AttendanceCategory::AbsenceSick),
        CategoryEntry::known(21, true)
    );
    assert_eq!(
        first.attendance.entry(AttendanceCategory::Tardy),
        CategoryEntry::known(2, false)
    );
    assert_eq!(first.attendance.longest_absence_run, Some(10));
    assert_eq!(first.subjects_present.len(), 9);
    assert_eq!(first.subject_notes["국어"], "이야기의 흐름을 파악하여 요약함.");
    assert!(first.activity_text.contains("안전교육"));
    assert!(first.missing_sections.is_empty());

    let second = &outcome.records[1];
    assert_eq!(second.student_id, "2");
    assert_eq!(second.attendance.scheduled_days, Count::Known(188));
    assert_eq!(
        second.attendance.entry(AttendanceCategory::Tardy).count,
        Count::Unknown
    );
    assert_eq!(
        second.attendance.entry(AttendanceCategory::AbsenceSick).count,
        Count::Unknown
    );
    assert!(second.is_section_missing(Section::Activities));
    assert!(second.is_section_missing(Section::Behavior));
    assert_eq!(second.subjects_present.len(), 1);
}

#[test]
fn test_parse_is_deterministic() {
    let parser = RecordParser::from_config(&Config::default()).unwrap();
    let first = parser.parse(DOCUMENT);
    let second = parser.parse(DOCUMENT);

    assert_eq!(first.records, second.records);
}
