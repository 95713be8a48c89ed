use std::fs;

use mct_batch::{
    build_task_batch, load_task_batch, parse_task_batch, read_task_batch, TaskRecord,
};
use mct_core::{Interval, MctError};
use mct_task::TaskDefaults;
use tempfile::tempdir;

fn batch_info(err: MctError) -> mct_core::ErrorInfo {
    match err {
        MctError::Batch(info) => info,
        other => panic!("expected a batch error, got {other:?}"),
    }
}

#[test]
fn short_records_take_defaults() {
    let text = "Ivanov I.I.;x^2;0;2\nPetrov P.P.;sin(x);0;3.14;20;0.1;0.9\n";
    let records = parse_task_batch(text.as_bytes(), b';').expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].index, 1);
    assert_eq!(records[0].name, "Ivanov I.I.");
    assert_eq!(records[0].interval, Interval::new(0.0, 2.0));
    assert_eq!(records[0].min_points, None);
    assert_eq!(records[1].min_points, Some(20));
    assert_eq!(records[1].confidence, Some(0.9));

    let defaults = TaskDefaults::default();
    let tasks = build_task_batch(&records, &defaults).expect("tasks");
    assert_eq!(tasks[0].task.min_points(), 10);
    assert_eq!(tasks[0].task.confidence(), 0.95);
    assert_eq!(tasks[1].task.min_points(), 20);
    assert_eq!(tasks[1].task.target_error(), 0.1);
    assert_eq!(tasks[1].name, "Petrov P.P.");
}

#[test]
fn quoted_fields_keep_delimiters_and_blank_optionals_default() {
    let text = "\"Sidorov, S.\",\"log(x, 2)\", 1 , 4 ,,0.2\n\n";
    let records = parse_task_batch(text.as_bytes(), b',').expect("records");
    assert_eq!(records.len(), 1);
    let record: &TaskRecord = &records[0];
    assert_eq!(record.name, "Sidorov, S.");
    assert_eq!(record.expression, "log(x, 2)");
    assert_eq!(record.interval, Interval::new(1.0, 4.0));
    assert_eq!(record.min_points, None);
    assert_eq!(record.target_error, Some(0.2));
}

#[test]
fn wrong_field_count_reports_index_and_raw_text() {
    let text = "a;x;0;1\nb;x;0\n";
    let info = batch_info(parse_task_batch(text.as_bytes(), b';').unwrap_err());
    assert_eq!(info.code, "batch_record");
    assert!(info.message.contains("record 2"), "{}", info.message);
    assert!(info.message.contains("\"b;x;0\""), "{}", info.message);
    assert_eq!(info.context.get("record").map(String::as_str), Some("2"));
    assert_eq!(info.context.get("raw").map(String::as_str), Some("b;x;0"));
    assert!(info.hint.is_some());
}

#[test]
fn non_numeric_fields_are_rejected() {
    let text = "a;x;zero;1\n";
    let info = batch_info(parse_task_batch(text.as_bytes(), b';').unwrap_err());
    assert!(info.message.contains("start \"zero\""), "{}", info.message);

    let text = "a;x;0;1;-3\n";
    let info = batch_info(parse_task_batch(text.as_bytes(), b';').unwrap_err());
    assert!(info.message.contains("min_points"), "{}", info.message);
}

#[test]
fn construction_failures_keep_the_record_position() {
    let text = "a;x;0;1\nb;x*y;0;1\n";
    let records = parse_task_batch(text.as_bytes(), b';').expect("records");
    let info = batch_info(build_task_batch(&records, &TaskDefaults::default()).unwrap_err());
    assert_eq!(info.code, "batch_task");
    assert!(info.message.contains("record 2"));
    assert!(info.message.contains("too many variables"), "{}", info.message);
}

#[test]
fn files_are_read_with_the_default_delimiter() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("batch.csv");
    fs::write(&path, "a,x,0,1\nb,2*x,-1,1,15\n").expect("write");
    let records = read_task_batch(&path, None).expect("records");
    assert_eq!(records.len(), 2);
    let tasks = load_task_batch(&path, None, &TaskDefaults::default()).expect("tasks");
    assert_eq!(tasks[1].task.f(0.5), 1.0);
    assert_eq!(tasks[1].task.min_points(), 15);
}

#[test]
fn file_errors_carry_the_path() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("absent.csv");
    assert!(matches!(read_task_batch(&missing, None).unwrap_err(), MctError::Io(_)));

    let path = dir.path().join("broken.csv");
    fs::write(&path, "a,x,0\n").expect("write");
    let info = batch_info(read_task_batch(&path, None).unwrap_err());
    assert!(info.context.contains_key("path"));
}

#[test]
fn records_serialize_for_reports() {
    let records = parse_task_batch("a;x;0;1\n".as_bytes(), b';').expect("records");
    let json = serde_json::to_value(&records[0]).expect("json");
    assert_eq!(json["interval"]["end"], 1.0);
    assert_eq!(json["min_points"], serde_json::Value::Null);
}

#[test]
fn invalid_utf8_keeps_the_raw_text() {
    let bytes: &[u8] = b"ann,x,0,1\nbob,x\xff,0,1\n";
    let info = batch_info(parse_task_batch(bytes, b',').unwrap_err());
    assert_eq!(info.code, "batch_record");
    assert!(info.message.contains("record 2"), "{}", info.message);
    assert!(info.message.contains("\"bob,x\u{FFFD},0,1\""), "{}", info.message);
    assert!(info.message.contains("field 2"), "{}", info.message);
    assert_eq!(info.context.get("raw").map(String::as_str), Some("bob,x\u{FFFD},0,1"));
}
