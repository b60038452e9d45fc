#[path = "../src/record.rs"]
mod record;
#[path = "../src/store.rs"]
mod store;
#[path = "../src/writer.rs"]
mod writer;

use record::{normalize_submission, ObservationRecord};
use serde_json::json;
use store::{LocalStore, StoreError, DEFAULT_RECENT_WINDOW, RECORDS_FILE};
use writer::{RecordWriter, WriterError};

fn record(n: usize) -> ObservationRecord {
    normalize_submission(&json!({
        "teacherId": "t1",
        "teacherName": "Kim",
        "subjectId": "kor-10",
        "subjectName": "Korean",
        "classId": "10-1",
        "className": "1-1",
        "studentId": format!("S{n}"),
        "studentName": format!("Student {n}"),
        "observation": format!("observation #{n}"),
    }))
}

#[test]
fn open_seeds_an_empty_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = dir.path().join("nested").join("data");
    let store = LocalStore::open(&data).expect("open");
    assert_eq!(store.path(), data.join(RECORDS_FILE));
    let raw = std::fs::read_to_string(store.path()).expect("read");
    assert_eq!(serde_json::from_str::<serde_json::Value>(&raw).expect("json"), json!([]));
    assert!(store.recent(DEFAULT_RECENT_WINDOW).expect("recent").is_empty());
}

#[test]
fn open_keeps_existing_records() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    let r = record(1);
    store.append(&r).expect("append");

    let reopened = LocalStore::open(dir.path()).expect("reopen");
    assert_eq!(reopened.load().expect("load"), vec![r]);
}

#[test]
fn append_then_recent_puts_new_record_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    let (a, b, c) = (record(1), record(2), record(3));
    for r in [&a, &b, &c] {
        store.append(r).expect("append");
    }

    // Disk keeps insertion order; recent() reverses it.
    assert_eq!(store.load().expect("load"), vec![a.clone(), b.clone(), c.clone()]);
    assert_eq!(store.recent(1).expect("recent"), vec![c.clone()]);
    assert_eq!(store.recent(20).expect("recent"), vec![c, b, a]);
}

#[test]
fn recent_is_capped_and_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    let all: Vec<ObservationRecord> = (0..25).map(record).collect();
    for r in &all {
        store.append(r).expect("append");
    }

    let first = store.recent(DEFAULT_RECENT_WINDOW).expect("recent");
    let second = store.recent(DEFAULT_RECENT_WINDOW).expect("recent");
    assert_eq!(first.len(), 20);
    assert_eq!(first, second);
    assert_eq!(first[0], all[24]);
    assert_eq!(first[19], all[5]);
    assert!(store.recent(0).expect("recent").is_empty());
}

#[test]
fn missing_file_is_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    std::fs::remove_file(store.path()).expect("remove");

    assert!(matches!(
        store.recent(5),
        Err(StoreError::Unavailable { .. })
    ));
    assert!(matches!(
        store.append(&record(1)),
        Err(StoreError::Unavailable { .. })
    ));
    // A failed append must not recreate the file.
    assert!(!store.path().exists());
}

#[test]
fn malformed_file_is_unavailable_and_left_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    std::fs::write(store.path(), "[{\"id\": ").expect("corrupt");

    let err = store.append(&record(1)).expect_err("corrupt file");
    assert!(err.to_string().contains(RECORDS_FILE), "{err}");
    assert_eq!(
        std::fs::read_to_string(store.path()).expect("read"),
        "[{\"id\": "
    );
}

#[test]
fn no_temp_files_left_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    for n in 0..3 {
        store.append(&record(n)).expect("append");
    }
    let names: Vec<String> = std::fs::read_dir(dir.path())
        .expect("read dir")
        .map(|e| e.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec![RECORDS_FILE.to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_through_writer_are_all_kept() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    let writer = RecordWriter::spawn(store.clone()).expect("spawn writer");

    let mut tasks = Vec::new();
    for n in 0..40 {
        let w = writer.clone();
        tasks.push(tokio::spawn(async move { w.append(record(n)).await }));
    }
    for t in tasks {
        t.await.expect("join").expect("append");
    }

    let on_disk = store.load().expect("load");
    assert_eq!(on_disk.len(), 40);
    let recent = writer.recent(DEFAULT_RECENT_WINDOW).await.expect("recent");
    assert_eq!(recent.len(), 20);
    assert_eq!(recent[0], on_disk[39]);
}

#[tokio::test]
async fn writer_surfaces_store_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = LocalStore::open(dir.path()).expect("open");
    std::fs::remove_file(store.path()).expect("remove");
    let writer = RecordWriter::spawn(store).expect("spawn writer");

    let err = writer.recent(3).await.expect_err("missing file");
    assert!(matches!(err, WriterError::Store(StoreError::Unavailable { .. })));
}
