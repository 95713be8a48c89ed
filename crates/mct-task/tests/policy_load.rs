use std::fs;

use mct_core::MctError;
use mct_task::{load_policy, SessionPolicy, Task, TaskDefaults, TaskSession};
use tempfile::tempdir;

#[test]
fn defaults_match_the_trainer() {
    let policy = SessionPolicy::default();
    assert_eq!(policy.accuracy, 0.01);
    assert_eq!(policy.y_accuracy, 0.1);
    assert_eq!(policy.resolution, 1000);
    assert_eq!(
        policy.defaults,
        TaskDefaults {
            min_points: 10,
            target_error: 0.05,
            confidence: 0.95
        }
    );
    assert!(policy.validate().is_ok());
}

#[test]
fn partial_yaml_keeps_remaining_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("policy.yaml");
    fs::write(&path, "accuracy: 0.05\ndefaults:\n  min_points: 25\n").expect("write");
    let policy = load_policy(&path).expect("policy");
    assert_eq!(policy.accuracy, 0.05);
    assert_eq!(policy.y_accuracy, 0.1);
    assert_eq!(policy.defaults.min_points, 25);
    assert_eq!(policy.defaults.confidence, 0.95);
}

#[test]
fn invalid_values_are_config_errors() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("policy.yaml");
    fs::write(&path, "resolution: 0\n").expect("write");
    match load_policy(&path).unwrap_err() {
        MctError::Config(info) => {
            assert_eq!(info.code, "policy_invalid");
            assert_eq!(info.context.get("field").map(String::as_str), Some("resolution"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn unreadable_and_malformed_files_are_reported() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("absent.yaml");
    let err = load_policy(&missing).unwrap_err();
    assert!(matches!(err, MctError::Io(_)));
    assert_eq!(err.info().code, "policy_read");

    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "accuracy: [1, 2\n").expect("write");
    assert!(matches!(load_policy(&broken).unwrap_err(), MctError::Serde(_)));
}

#[test]
fn session_uses_policy_tolerances() {
    let task = Task::new("x", (0.0, 10.0), 10, 0.05, 0.95).expect("task");
    let loose = SessionPolicy {
        accuracy: 0.2,
        resolution: 10,
        ..SessionPolicy::default()
    };
    let session = TaskSession::with_policy(task, loose);
    assert!(session.compare(55.0, 60.0));
    assert_eq!(session.f_max(), 9.0);
}
