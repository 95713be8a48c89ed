use mct_core::Interval;
use mct_task::{ErrorCode, Step, Task, TaskSession};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Generate(f64, f64),
    Count(bool),
    Discard,
    Next,
    SetX(f64, f64),
    Result(f64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-1.0f64..4.0, -1.0f64..10.0).prop_map(|(x, y)| Op::Generate(x, y)),
        4 => any::<bool>().prop_map(Op::Count),
        1 => Just(Op::Discard),
        1 => Just(Op::Next),
        1 => (-1.0f64..1.0, 2.0f64..4.0).prop_map(|(a, b)| Op::SetX(a, b)),
        1 => (0.0f64..10.0).prop_map(Op::Result),
    ]
}

fn session_in_points() -> TaskSession {
    let task = Task::new("x^2", (0.0, 3.0), 3, 0.05, 0.95).expect("task");
    let mut session = TaskSession::new(task);
    session.start().expect("start");
    session.set_int_x((0.0, 3.0)).expect("int_x");
    let y = Interval::new(session.f_min(), session.f_max());
    session.set_int_y(y).expect("int_y");
    session.next_step().expect("rect complete");
    session
}

fn lifecycle_holds(session: &TaskSession) -> bool {
    let state = session.state();
    let pending = usize::from(!state.point_counted());
    state.points().len() == state.point_hits().len() + pending
}

proptest! {
    #[test]
    fn point_lifecycle_survives_any_call_sequence(ops in prop::collection::vec(op(), 1..60)) {
        let mut session = session_in_points();
        prop_assert!(lifecycle_holds(&session));
        for op in ops {
            let records = session.stats().record_count();
            let step = session.step();
            let before = session.state().clone();
            let outcome = match op {
                Op::Generate(x, y) => session.generate_point((x, y)).map(|_| ()),
                Op::Count(hit) => {
                    let truth = before.pending_point().map(|p| p.y <= session.task().f(p.x));
                    let outcome = session.count_point(hit).map(|_| ());
                    if let Some(truth) = truth {
                        if step == Step::Points {
                            prop_assert_eq!(outcome.is_ok(), hit == truth);
                        }
                    }
                    outcome
                }
                Op::Discard => session.discard_point().map(|_| ()),
                Op::Next => session.next_step().map(|_| ()),
                Op::SetX(a, b) => session.set_int_x((a, b)).map(|_| ()),
                Op::Result(v) => session.set_result(v).map(|_| ()),
            };
            prop_assert!(lifecycle_holds(&session));

            match &outcome {
                Err(err) if !err.is_misuse() => {
                    prop_assert_eq!(session.stats().record_count(), records + 1);
                    let errors = session.stats().errors(step);
                    prop_assert_eq!(errors.last().map(|r| r.code), err.code());
                    let wrong_step = ErrorCode::RECT_WRONG_STEP
                        | ErrorCode::POINTS_WRONG_STEP
                        | ErrorCode::INTEGRAL_WRONG_STEP;
                    if err.code().is_some_and(|code| code.intersects(wrong_step)) {
                        prop_assert_eq!(session.state(), &before);
                    }
                }
                Err(_) => prop_assert_eq!(session.stats().record_count(), records),
                Ok(()) if matches!(op, Op::Discard) => {
                    prop_assert_eq!(session.stats().record_count(), records)
                }
                Ok(()) => prop_assert_eq!(session.stats().record_count(), records + 1),
            }
        }
    }

    #[test]
    fn result_tolerance_is_relative(scale in 0.5f64..1.5) {
        let mut session = session_in_points();
        for p in [(2.5, 0.5), (2.0, 8.0), (1.0, 0.5)] {
            session.generate_point(p).expect("generate");
            let hit = p.1 <= session.task().f(p.0);
            session.count_point(hit).expect("count");
        }
        session.next_step().expect("points complete");
        let expected = session.true_estimate().expect("estimate");
        let submitted = expected * scale;
        let accepted = session.set_result(submitted).is_ok();
        prop_assert_eq!(accepted, (expected - submitted).abs() <= 0.01 * expected.abs());
    }
}
