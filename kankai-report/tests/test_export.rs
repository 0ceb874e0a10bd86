use chrono::{Duration, TimeZone, Utc};
use chrono_tz::Tz;
use kankai_core::{summarize, Difficulty, TaskStatus, TaskStore};
use kankai_report::{write_csv, xlsx_report};

fn sample_board() -> TaskStore {
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
    let mut store = TaskStore::new();
    store.create("Design prototype", 480, Difficulty::Medium).unwrap();
    store.create("Write, review, ship", 60, Difficulty::Low).unwrap();
    store.transition("task-2", TaskStatus::InProgress, start).unwrap();
    store
        .transition("task-2", TaskStatus::Done, start + Duration::minutes(120))
        .unwrap();
    store
}

#[test]
fn test_xlsx_report_is_a_zip_container() {
    let store = sample_board();
    let bytes = xlsx_report(store.list_all(), &summarize(&store), Tz::UTC).unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_xlsx_report_on_empty_board() {
    let store = TaskStore::new();
    let bytes = xlsx_report(store.list_all(), &summarize(&store), Tz::UTC).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn test_csv_has_one_row_per_task() {
    let store = sample_board();
    let mut out = Vec::new();
    write_csv(store.list_all(), Tz::UTC, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "ID,Name,Status,Difficulty,Estimated,Efficiency,Started,Completed"
    );
    assert!(lines[1].starts_with("task-1,Design prototype,To do,Medium,8h,"));
    // Commas in names are quoted.
    assert_eq!(
        lines[2],
        "task-2,\"Write, review, ship\",Done,Low,1h,Late (2h/1h),2026-03-02 09:00,2026-03-02 11:00"
    );
}
