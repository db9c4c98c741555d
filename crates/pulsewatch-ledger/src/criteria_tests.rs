use super::*;
use chrono::{Duration, TimeZone};
use uuid::Uuid;

use crate::record::NewExecution;

fn record(id: i64, job: &str, status: ExecutionStatus, response_time: u64) -> ExecutionRecord {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let exec = match status {
        ExecutionStatus::Succeeded => NewExecution::succeeded(job, "http://example.test", response_time),
        ExecutionStatus::Failed => {
            NewExecution::failed(job, "http://example.test", response_time, "500 Internal Server Error")
        }
    };
    exec.into_record(id, Uuid::new_v4(), base + Duration::seconds(id))
}

#[test]
fn test_empty_criteria_has_no_clauses() {
    let criteria = ExecutionCriteria::new();
    assert!(criteria.clauses().is_empty());
    assert!(criteria.matches(&record(1, "ping", ExecutionStatus::Succeeded, 10)));
}

#[test]
fn test_clauses_follow_field_order() {
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let criteria = ExecutionCriteria::new()
        .with_status(ExecutionStatus::Failed)
        .with_job_name("ping")
        .with_from(from);

    let sql: Vec<&str> = criteria.clauses().iter().map(|c| c.sql()).collect();
    assert_eq!(sql, vec!["job_name = ?", "status = ?", "created_date >= ?"]);
}

#[test]
fn test_clauses_combine_with_and() {
    let criteria = ExecutionCriteria::new()
        .with_job_name("ping")
        .with_status(ExecutionStatus::Failed);

    assert!(criteria.matches(&record(1, "ping", ExecutionStatus::Failed, 10)));
    assert!(!criteria.matches(&record(2, "ping", ExecutionStatus::Succeeded, 10)));
    assert!(!criteria.matches(&record(3, "other", ExecutionStatus::Failed, 10)));
}

#[test]
fn test_date_bounds_are_inclusive() {
    let r = record(5, "ping", ExecutionStatus::Succeeded, 10);
    let at = r.created_date;

    let exact = ExecutionCriteria::new().with_from(at).with_to(at);
    assert!(exact.matches(&r));

    let after = ExecutionCriteria::new().with_from(at + Duration::milliseconds(1));
    assert!(!after.matches(&r));

    let before = ExecutionCriteria::new().with_to(at - Duration::milliseconds(1));
    assert!(!before.matches(&r));
}

#[test]
fn test_sort_direction_parse() {
    assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
    assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    assert!(matches!(
        "up".parse::<SortDirection>(),
        Err(LedgerError::InvalidSortDirection(_))
    ));
}

#[test]
fn test_sort_property_accepts_both_spellings() {
    assert_eq!(
        "responseTime".parse::<SortProperty>().unwrap(),
        SortProperty::ResponseTime
    );
    assert_eq!(
        "response_time".parse::<SortProperty>().unwrap(),
        SortProperty::ResponseTime
    );
    assert!(matches!(
        "durationMs".parse::<SortProperty>(),
        Err(LedgerError::InvalidSortProperty(_))
    ));
}

#[test]
fn test_default_sort_is_newest_first() {
    let sort = Sort::default();
    assert_eq!(sort.sql(), " ORDER BY created_date DESC, id DESC");

    let older = record(1, "ping", ExecutionStatus::Succeeded, 10);
    let newer = record(2, "ping", ExecutionStatus::Succeeded, 10);
    assert_eq!(sort.compare(&newer, &older), Ordering::Less);
}

#[test]
fn test_sort_keeps_explicit_id_once() {
    let sort = Sort::by(SortDirection::Asc, vec![SortProperty::Id, SortProperty::JobName]);
    assert_eq!(sort.sql(), " ORDER BY id ASC, job_name ASC");
}

#[test]
fn test_sort_breaks_ties_by_id() {
    let sort = Sort::by(SortDirection::Asc, vec![SortProperty::ResponseTime]);
    let a = record(7, "ping", ExecutionStatus::Succeeded, 50);
    let b = record(3, "ping", ExecutionStatus::Succeeded, 50);
    assert_eq!(sort.compare(&b, &a), Ordering::Less);

    let mut records = vec![
        record(1, "a", ExecutionStatus::Succeeded, 30),
        record(2, "b", ExecutionStatus::Succeeded, 10),
        record(3, "c", ExecutionStatus::Succeeded, 20),
    ];
    records.sort_by(|x, y| sort.compare(x, y));
    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn test_pageable_offset() {
    let pageable = Pageable::new(3, 25, Sort::default());
    assert_eq!(pageable.offset(), 75);
}

#[test]
fn test_page_totals() {
    let pageable = Pageable::new(0, 10, Sort::default());

    let page: Page<i32> = Page::new(vec![], &pageable, 0);
    assert_eq!(page.total_pages, 1);

    let page: Page<i32> = Page::new(vec![1; 10], &pageable, 10);
    assert_eq!(page.total_pages, 1);

    let page: Page<i32> = Page::new(vec![1; 10], &pageable, 21);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_elements, 21);
}

#[test]
fn test_external_id_sort_matches_stored_text_order() {
    let mut records: Vec<ExecutionRecord> = (1..=20)
        .map(|id| record(id, "ping", ExecutionStatus::Succeeded, 10))
        .collect();
    records[3].external_id = Uuid::parse_str("0fffffff-ffff-4fff-bfff-ffffffffffff").unwrap();
    records[4].external_id = Uuid::parse_str("a0000000-0000-4000-8000-000000000000").unwrap();

    let sort = Sort::by(SortDirection::Asc, vec![SortProperty::ExternalId]);
    records.sort_by(|a, b| sort.compare(a, b));

    let ids: Vec<String> = records.iter().map(|r| r.external_id.to_string()).collect();
    let mut expected = ids.clone();
    expected.sort();
    assert_eq!(ids, expected);
}
