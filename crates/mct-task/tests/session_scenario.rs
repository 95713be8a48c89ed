use mct_core::{Interval, Point};
use mct_task::{Action, CallArgs, ErrorCode, Misuse, SessionError, Step, Task, TaskSession};

fn identity_session() -> TaskSession {
    let task = Task::new("x", (0.0, 10.0), 10, 0.05, 0.95).expect("task");
    TaskSession::new(task)
}

fn in_points() -> TaskSession {
    let mut session = identity_session();
    session.start().expect("start");
    session.set_int_x((0.0, 10.0)).expect("int_x");
    session.set_int_y((0.0, 10.0)).expect("int_y");
    session.next_step().expect("rect complete");
    session
}

const HITS: [(f64, f64); 6] = [(5.0, 2.0), (6.0, 1.0), (7.0, 3.0), (8.0, 4.0), (9.0, 5.0), (4.0, 1.0)];
const MISSES: [(f64, f64); 4] = [(1.0, 5.0), (2.0, 6.0), (3.0, 7.0), (0.5, 9.0)];

fn in_integral() -> TaskSession {
    let mut session = in_points();
    for p in HITS {
        session.generate_point(p).expect("generate");
        session.count_point(true).expect("count hit");
    }
    for p in MISSES {
        session.generate_point(p).expect("generate");
        session.count_point(false).expect("count miss");
    }
    session.next_step().expect("points complete");
    session
}

#[test]
fn sampled_bounds_cover_the_interval() {
    let session = identity_session();
    assert_eq!(session.f_min(), 0.0);
    assert!((session.f_max() - 9.99).abs() < 1e-12);
}

#[test]
fn full_walkthrough_reaches_end() {
    let mut session = in_integral();
    assert_eq!(session.step(), Step::Integral);
    assert_eq!(session.state().hit_count(), 6);
    assert_eq!(session.true_estimate(), Some(60.0));

    let err = session.set_result(50.0).unwrap_err();
    assert!(err.contains(ErrorCode::RESULT));
    assert_eq!(session.state().result(), None);

    assert_eq!(session.set_result(60.0).expect("result"), Action::RESULT);
    assert_eq!(session.state().result(), Some(60.0));

    let action = session.next_step().expect("integral complete");
    assert_eq!(action, Action::INTEGRAL_COMPLETE | Action::END);
    assert_eq!(session.step(), Step::End);
    assert!(session.stats().step_time(Step::End).is_some());
    assert!(session.stats().step_time(Step::Error).is_none());
}

#[test]
fn x_bounds_must_match_exactly() {
    let mut session = identity_session();
    session.start().expect("start");
    let err = session.set_int_x((0.0, 9.0)).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::X_1));
    let err = session.set_int_x((0.1, 9.0)).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::X_0 | ErrorCode::X_1));
    assert_eq!(session.state().int_x(), None);
    session.set_int_x((0.0, 10.0)).expect("exact bounds");
    assert_eq!(session.state().int_x(), Some(Interval::new(0.0, 10.0)));
}

#[test]
fn y_bounds_accept_slack_outside_the_sampled_range() {
    let mut session = identity_session();
    session.start().expect("start");
    // f_min = 0, f_max = 9.99, slack = 0.999
    session.set_int_y((-0.9, 10.9)).expect("within slack");
    let err = session.set_int_y((-1.0, 10.0)).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Y_0));
    let err = session.set_int_y((0.5, 9.0)).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Y_0 | ErrorCode::Y_1));
    assert_eq!(session.state().int_y(), Some(Interval::new(-0.9, 10.9)));
}

#[test]
fn rectangle_fields_commit_independently() {
    let mut session = identity_session();
    session.start().expect("start");
    session.set_int_x((0.0, 10.0)).expect("int_x");
    let err = session.set_int_y((0.0, 5.0)).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Y_1));
    assert!(session.state().int_x().is_some());
    assert!(session.state().int_y().is_none());

    let err = session.next_step().unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Y_0 | ErrorCode::Y_1));
    assert_eq!(session.step(), Step::Rect);
}

#[test]
fn gated_calls_outside_their_step_fail_without_mutation() {
    let mut session = identity_session();
    let before = session.state().clone();
    let err = session.set_int_x((0.0, 10.0)).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::RECT_WRONG_STEP));
    assert_eq!(session.state(), &before);

    session.start().expect("start");
    let before = session.state().clone();
    assert_eq!(
        session.generate_point((1.0, 1.0)).unwrap_err().code(),
        Some(ErrorCode::POINTS_WRONG_STEP)
    );
    assert_eq!(
        session.count_point(true).unwrap_err().code(),
        Some(ErrorCode::POINTS_WRONG_STEP)
    );
    assert_eq!(
        session.set_result(1.0).unwrap_err().code(),
        Some(ErrorCode::INTEGRAL_WRONG_STEP)
    );
    assert_eq!(session.state(), &before);

    let mut session = in_points();
    assert_eq!(
        session.set_int_y((0.0, 10.0)).unwrap_err().code(),
        Some(ErrorCode::RECT_WRONG_STEP)
    );
}

#[test]
fn point_lifecycle_is_enforced() {
    let mut session = in_points();
    assert_eq!(
        session.count_point(true).unwrap_err().code(),
        Some(ErrorCode::COUNT_BEFORE_GENERATE)
    );
    assert_eq!(
        session.generate_point((11.0, 1.0)).unwrap_err().code(),
        Some(ErrorCode::POINT)
    );
    assert!(session.state().points().is_empty());

    session.generate_point((5.0, 2.0)).expect("generate");
    assert_eq!(session.state().pending_point(), Some(Point::new(5.0, 2.0)));
    assert_eq!(
        session.generate_point((5.0, 3.0)).unwrap_err().code(),
        Some(ErrorCode::GENERATE_BEFORE_COUNT)
    );

    let err = session.count_point(false).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::COUNT | ErrorCode::COUNT_MISS));
    assert!(!session.state().point_counted());

    session.count_point(true).expect("correct claim");
    assert_eq!(session.state().point_hits(), &[true]);

    session.generate_point((1.0, 9.0)).expect("generate");
    let err = session.count_point(true).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::COUNT | ErrorCode::COUNT_HIT));
}

#[test]
fn point_step_completion_reports_both_gates() {
    let mut session = in_points();
    session.generate_point((5.0, 2.0)).expect("generate");
    let err = session.next_step().unwrap_err();
    assert_eq!(
        err.code(),
        Some(ErrorCode::COMPLETE_BEFORE_COUNT | ErrorCode::NOT_ENOUGH_POINTS)
    );
    session.count_point(true).expect("count");
    let err = session.next_step().unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::NOT_ENOUGH_POINTS));
    assert_eq!(session.step(), Step::Points);
}

#[test]
fn discard_drops_only_the_pending_point() {
    let mut session = in_points();
    let records = session.stats().record_count();
    let err = session.discard_point().unwrap_err();
    assert!(matches!(err, SessionError::Misuse(Misuse::NothingToDiscard)));

    session.generate_point((5.0, 2.0)).expect("generate");
    assert_eq!(session.discard_point().expect("discard"), Point::new(5.0, 2.0));
    assert!(session.state().points().is_empty());
    assert!(session.state().point_counted());
    assert_eq!(session.stats().record_count(), records + 1);
}

#[test]
fn every_gated_call_is_recorded_under_its_step() {
    let mut session = identity_session();
    session.start().expect("start");
    let _ = session.set_int_x((0.0, 9.0));
    session.set_int_x((0.0, 10.0)).expect("int_x");
    let _ = session.generate_point((1.0, 1.0));

    let stats = session.stats();
    assert_eq!(stats.actions(Step::Start).len(), 1);
    assert_eq!(stats.actions(Step::Start)[0].action, Action::START);
    assert_eq!(stats.actions(Step::Rect).len(), 1);
    assert_eq!(stats.actions(Step::Rect)[0].action, Action::X_0 | Action::X_1);
    assert_eq!(
        stats.actions(Step::Rect)[0].args,
        CallArgs::Interval(Interval::new(0.0, 10.0))
    );

    let errors = stats.errors(Step::Rect);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0].code, ErrorCode::X_1);
    assert_eq!(errors[0].args, CallArgs::Interval(Interval::new(0.0, 9.0)));
    assert_eq!(errors[1].code, ErrorCode::POINTS_WRONG_STEP);
    assert!(stats.errors(Step::Points).is_empty());
    assert!(stats.step_time(Step::Start).is_some());
    assert!(stats.step_time(Step::Rect).is_some());
}

#[test]
fn lifecycle_misuse_is_loud_and_unrecorded() {
    let mut session = identity_session();
    session.start().expect("start");
    let records = session.stats().record_count();
    assert!(matches!(
        session.start().unwrap_err(),
        SessionError::Misuse(Misuse::AlreadyStarted { since: Some(_) })
    ));

    assert_eq!(session.end().expect("end"), Action::END);
    assert_eq!(session.step(), Step::End);
    assert_eq!(session.stats().actions(Step::End).len(), 1);
    assert!(matches!(
        session.end().unwrap_err(),
        SessionError::Misuse(Misuse::AlreadyFinished { since: Some(_) })
    ));
    let err = session.next_step().unwrap_err();
    assert!(err.is_misuse());
    assert!(matches!(err, SessionError::Misuse(Misuse::TerminalStep(Step::End))));
    assert_eq!(session.stats().record_count(), records + 1);
}

#[test]
fn rectangle_below_the_axis_is_corrected() {
    let task = Task::new("x - 5", (0.0, 10.0), 2, 0.05, 0.95).expect("task");
    let mut session = TaskSession::new(task);
    session.start().expect("start");
    session.set_int_x((0.0, 10.0)).expect("int_x");
    session.set_int_y((-5.0, 5.0)).expect("int_y");
    session.next_step().expect("rect complete");
    session.generate_point((8.0, 1.0)).expect("generate");
    session.count_point(true).expect("hit");
    session.generate_point((2.0, 1.0)).expect("generate");
    session.count_point(false).expect("miss");
    session.next_step().expect("points complete");

    // 100 * 1/2 - 10 * 5
    assert_eq!(session.true_estimate(), Some(0.0));
    assert!(session.set_result(0.001).is_err());
    session.set_result(0.0).expect("exact zero");
}

#[test]
fn reads_are_idempotent() {
    let session = in_integral();
    assert_eq!(session.state(), session.state());
    assert_eq!(session.stats().clone(), session.stats().clone());
}
