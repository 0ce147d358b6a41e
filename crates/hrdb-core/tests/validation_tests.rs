// Property tests over the field validation rules and entity constructors

use hrdb_core::rules::validation::{non_blank, review_year, MIN_REVIEW_YEAR};
use hrdb_core::{Department, Employee, ExErrorKind, ExResult, HrError, Review};
use proptest::prelude::*;

fn any_id_exists(_: i64) -> ExResult<bool> {
    Ok(true)
}

fn no_id_exists(_: i64) -> ExResult<bool> {
    Ok(false)
}

proptest! {
    #[test]
    fn prop_whitespace_only_text_is_blank(value in "[ \t\n\r]{0,12}") {
        let err = non_blank("employee", "name", &value).unwrap_err();
        prop_assert!(matches!(err, HrError::BlankField { field: "name", .. }), "unexpected error");
    }

    #[test]
    fn prop_text_with_content_is_trimmed(
        pad_left in "[ \t]{0,4}",
        core in "[A-Za-z][A-Za-z ]{0,10}[A-Za-z]",
        pad_right in "[ \t]{0,4}",
    ) {
        let value = format!("{}{}{}", pad_left, core, pad_right);
        prop_assert_eq!(non_blank("review", "summary", &value).unwrap(), core);
    }

    #[test]
    fn prop_years_from_2000_are_accepted(year in MIN_REVIEW_YEAR..10_000i64) {
        prop_assert_eq!(review_year(year).unwrap(), year);
    }

    #[test]
    fn prop_years_before_2000_are_rejected(year in i64::MIN..MIN_REVIEW_YEAR) {
        let is_range_error = matches!(review_year(year), Err(HrError::YearOutOfRange { .. }));
        prop_assert!(is_range_error);
    }

    #[test]
    fn prop_employee_requires_existing_department(department_id in any::<i64>()) {
        let err = Employee::new("Alice", "Engineer", department_id, &no_id_exists).unwrap_err();
        prop_assert_eq!(err.kind(), ExErrorKind::DanglingReference);
        prop_assert_eq!(err.entity_id(), Some(department_id));

        let ok = Employee::new("Alice", "Engineer", department_id, &any_id_exists).unwrap();
        prop_assert_eq!(ok.department_id(), department_id);
        prop_assert_eq!(ok.id(), None);
    }
}

#[test]
fn test_review_checks_year_before_reference() {
    let err = Review::new(1999, "Early", 1, &no_id_exists).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::YearOutOfRange);
}

#[test]
fn test_lookup_failure_propagates_unchanged() {
    let failing = |_: i64| -> ExResult<bool> {
        Err(hrdb_core::ExError::new(ExErrorKind::Persistence).with_message("disk I/O error"))
    };
    let err = Employee::new("Alice", "Engineer", 1, &failing).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(err.message(), "disk I/O error");
}

#[test]
fn test_transient_entities_render_none_id() {
    let dept = Department::new("Payroll", "HQ").unwrap();
    let emp = Employee::new("Alice", "Engineer", 1, &any_id_exists).unwrap();
    assert_eq!(dept.to_string(), "<Department id=None name=Payroll location=HQ>");
    assert_eq!(
        emp.to_string(),
        "<Employee id=None name=Alice job_title=Engineer department_id=1>"
    );
}

#[test]
fn test_entities_serialize_to_json() {
    let review = Review::new(2024, "Great work", 3, &any_id_exists).unwrap();
    let json = serde_json::to_value(&review).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": null,
            "year": 2024,
            "summary": "Great work",
            "employee_id": 3
        })
    );
}
