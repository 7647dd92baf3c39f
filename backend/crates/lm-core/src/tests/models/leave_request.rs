use crate::{CoreError, LeaveRequest, LeaveStatus};

use chrono::NaiveDate;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_leave_request_new_counts_inclusive_days() {
    let request = LeaveRequest::new(
        7,
        "annual".into(),
        date("2024-02-15"),
        date("2024-02-17"),
        "vacation".into(),
    )
    .unwrap();

    assert_eq!(request.employee_id, 7);
    assert_eq!(request.total_days, 3);
    assert_eq!(request.status, LeaveStatus::Pending);
    assert!(request.approved_by.is_none());
}

#[test]
fn test_leave_request_single_day() {
    let request = LeaveRequest::new(
        1,
        "sick".into(),
        date("2024-03-01"),
        date("2024-03-01"),
        String::new(),
    )
    .unwrap();

    assert_eq!(request.total_days, 1);
}

#[test]
fn test_leave_request_rejects_inverted_range() {
    let result = LeaveRequest::new(
        1,
        "annual".into(),
        date("2024-02-17"),
        date("2024-02-15"),
        "oops".into(),
    );

    match result {
        Err(CoreError::Validation { field, .. }) => assert_eq!(field.as_deref(), Some("end_date")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_leave_request_rejects_blank_type() {
    let result = LeaveRequest::new(
        1,
        "  ".into(),
        date("2024-02-15"),
        date("2024-02-15"),
        "reason".into(),
    );

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}
