use std::io::Cursor;

use super::common::*;
use crate::registration::domain::RegistrationOutcome;
use crate::registration::import::{import_candidates, parse_candidates, ImportError};

const CSV: &str = "name,date_of_birth,email,password
asokoIdris, 1/1/2000 ,asoko@kundabox.com,12ABCabc
asokoIdris,1/1/2000,asokoIdris@kundabox.com,12ABCabc
asok,1/1/2000,asok@kundabox.com,12ABCabc
otherUser,1999-03-04,other@kundabox.com,34XYZxyz
";

#[test]
fn parses_rows_with_trimmed_fields() {
    let candidates = parse_candidates(Cursor::new(CSV)).expect("csv parses");

    assert_eq!(candidates.len(), 4);
    assert_eq!(candidates[0].date_of_birth.as_text(), Some("1/1/2000"));
    assert_eq!(candidates[3].name.as_text(), Some("otherUser"));
}

#[test]
fn accepts_dob_header_alias() {
    let csv = "name,dob,email,password\nasokoIdris,1/1/2000,asoko@kundabox.com,12ABCabc\n";
    let candidates = parse_candidates(Cursor::new(csv)).expect("csv parses");

    assert_eq!(candidates[0].date_of_birth.as_text(), Some("1/1/2000"));
}

#[test]
fn rejects_rows_missing_columns() {
    let csv = "name,date_of_birth,email,password\nasokoIdris,1/1/2000\n";

    assert!(matches!(
        parse_candidates(Cursor::new(csv)),
        Err(ImportError::Csv(_))
    ));
}

#[test]
fn import_registers_rows_in_order() {
    let (service, store) = build_service();

    let report = import_candidates(Cursor::new(CSV), &service).expect("import runs");

    let outcomes: Vec<(u64, &str, RegistrationOutcome)> = report
        .rows
        .iter()
        .map(|row| (row.line, row.name.as_str(), row.outcome))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            (2, "asokoIdris", RegistrationOutcome::Success),
            (3, "asokoIdris", RegistrationOutcome::UserAlreadyExists),
            (4, "asok", RegistrationOutcome::NameInvalid),
            (5, "otherUser", RegistrationOutcome::Success),
        ]
    );
    assert_eq!(report.registered(), 2);
    assert_eq!(report.rejected(), 2);
    assert_eq!(stored(&store).len(), 2);
}

#[test]
fn import_reports_file_lines_across_blank_and_multiline_records() {
    let (service, _store) = build_service();
    let csv = "name,date_of_birth,email,password\n\n\"asoko\nIdris\",1/1/2000,asoko@kundabox.com,12ABCabc\notherUser,1/1/1990,other@kundabox.com,34XYZxyz\n";

    let report = import_candidates(Cursor::new(csv), &service).expect("import runs");

    let lines: Vec<u64> = report.rows.iter().map(|row| row.line).collect();
    assert_eq!(lines, vec![3, 5]);
}
