use conreal_core::db::open_db_in_memory;
use conreal_core::{LogDate, LogStore, SqliteLogStore};
use std::collections::HashSet;
use uuid::Uuid;

fn day(value: &str) -> LogDate {
    LogDate::parse(value).unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn get_logs_distinguishes_unwritten_from_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLogStore::new(&conn);
    let group = Uuid::new_v4();
    let date = day("2025-09-14");

    assert_eq!(store.get_logs(group, &date).unwrap(), None);

    store.set_logs(group, &date, &[]).unwrap();
    assert_eq!(store.get_logs(group, &date).unwrap(), Some(Vec::new()));
}

#[test]
fn set_logs_replaces_the_whole_day_and_keeps_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLogStore::new(&conn);
    let group = Uuid::new_v4();
    let date = day("2025-09-14");

    store
        .set_logs(group, &date, &strings(&["first", "second", "third"]))
        .unwrap();
    store
        .set_logs(group, &date, &strings(&["b", "a"]))
        .unwrap();

    assert_eq!(
        store.get_logs(group, &date).unwrap(),
        Some(strings(&["b", "a"]))
    );
}

#[test]
fn days_of_different_groups_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLogStore::new(&conn);
    let date = day("2025-09-14");
    let (left, right) = (Uuid::new_v4(), Uuid::new_v4());

    store.set_logs(left, &date, &strings(&["left"])).unwrap();
    store.set_logs(right, &date, &strings(&["right"])).unwrap();

    assert_eq!(store.get_logs(left, &date).unwrap(), Some(strings(&["left"])));
    assert_eq!(store.get_logs(right, &date).unwrap(), Some(strings(&["right"])));
}

#[test]
fn group_dates_are_deduplicated_and_sorted() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLogStore::new(&conn);
    let group = Uuid::new_v4();

    store.add_date_to_group(group, &day("2025-09-15")).unwrap();
    store.add_date_to_group(group, &day("2025-09-13")).unwrap();
    store.add_date_to_group(group, &day("2025-09-15")).unwrap();

    assert_eq!(
        store.dates_for_group(group).unwrap(),
        vec![day("2025-09-13"), day("2025-09-15")]
    );
    assert!(store.is_date_in_group(group, &day("2025-09-13")).unwrap());
    assert!(!store.is_date_in_group(group, &day("2025-09-14")).unwrap());
    assert!(store.dates_for_group(Uuid::new_v4()).unwrap().is_empty());
}

#[test]
fn scan_groups_pages_through_every_group_once() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLogStore::new(&conn);
    let created = (0..7).map(|_| Uuid::new_v4()).collect::<Vec<_>>();
    for group in &created {
        store.add_group(*group).unwrap();
        store.add_group(*group).unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor = 0;
    let mut pages = 0;
    loop {
        let page = store.scan_groups(cursor, 3).unwrap();
        assert!(page.groups.len() <= 3);
        seen.extend(page.groups);
        pages += 1;
        if page.cursor == 0 {
            break;
        }
        cursor = page.cursor;
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, created);
    assert_eq!(store.list_groups().unwrap(), created);
    assert_eq!(seen.iter().collect::<HashSet<_>>().len(), 7);
}

#[test]
fn standalone_logs_are_last_write_wins() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLogStore::new(&conn);
    let log_id = Uuid::new_v4();

    assert_eq!(store.get_log(log_id).unwrap(), None);
    store.set_log(log_id, "first take").unwrap();
    store.set_log(log_id, "second take").unwrap();
    assert_eq!(store.get_log(log_id).unwrap().as_deref(), Some("second take"));
}

#[test]
fn counter_starts_at_zero_and_accumulates() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteLogStore::new(&conn);

    assert_eq!(store.get_count().unwrap(), 0);
    assert_eq!(store.incr_count(1).unwrap(), 1);
    assert_eq!(store.incr_count(1).unwrap(), 2);
    assert_eq!(store.incr_count(-3).unwrap(), -1);
    assert_eq!(store.get_count().unwrap(), -1);
}

#[test]
fn malformed_group_ids_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO reality_groups (group_id) VALUES ('not-a-uuid');",
        [],
    )
    .unwrap();
    let store = SqliteLogStore::new(&conn);

    let err = store.list_groups().unwrap_err();
    assert!(err.to_string().contains("not-a-uuid"));
}
