use mct_core::MctError;
use mct_expr::{parse, ExprError, Function, MAX_DEPTH};

#[test]
fn empty_source_is_rejected() {
    let err = parse("   ").unwrap_err();
    assert_eq!(err.message, "empty expression");
}

#[test]
fn dangling_operator_reports_end_offset() {
    let err = parse("x +").unwrap_err();
    assert_eq!(err.position, 3);
}

#[test]
fn unbalanced_parenthesis() {
    assert!(parse("(x + 1").is_err());
    assert!(parse("x + 1)").is_err());
}

#[test]
fn unknown_character_and_function() {
    let err = parse("x $ 2").unwrap_err();
    assert_eq!(err.position, 2);
    let err = parse("foo(x)").unwrap_err();
    assert!(err.message.contains("unknown function"));
    let err = parse("sin + 1").unwrap_err();
    assert!(err.message.contains("without arguments"));
}

#[test]
fn wrong_arity() {
    assert!(parse("sin(x, 2)").is_err());
    assert!(parse("log(x, 2, 3)").is_err());
}

#[test]
fn two_variables_are_rejected() {
    match Function::parse("x*y").unwrap_err() {
        ExprError::TooManyVariables { variables, .. } => {
            assert_eq!(variables, vec!["x".to_string(), "y".to_string()]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn converts_into_shared_error() {
    let err: MctError = Function::parse("x*y").unwrap_err().into();
    assert_eq!(err.info().code, "expr.too_many_variables");
    let err: MctError = Function::parse("1 +").unwrap_err().into();
    assert_eq!(err.info().code, "expr.parse");
    assert_eq!(err.info().context["position"], "3");
}

#[test]
fn deep_nesting_is_an_error_not_a_crash() {
    for n in [1000, 30_000] {
        let grouped = format!("{}x{}", "(".repeat(n), ")".repeat(n));
        let err = Function::parse(&grouped).unwrap_err();
        assert!(err.to_string().contains("nested too deeply"), "{err}");

        let negated = format!("{}x", "-".repeat(n));
        let err = parse(&negated).unwrap_err();
        assert_eq!(err.message, "expression nested too deeply");

        let powers = vec!["2"; n].join("^");
        assert!(parse(&powers).is_err());

        let chain = vec!["x"; n].join(" + ");
        assert!(parse(&chain).is_err());
    }
}

#[test]
fn moderate_nesting_still_parses() {
    let n = MAX_DEPTH / 2;
    let grouped = format!("{}x{}", "(".repeat(n), ")".repeat(n));
    assert_eq!(Function::parse(&grouped).unwrap().eval(3.0), 3.0);

    let chain = vec!["1"; 100].join(" + ");
    assert_eq!(parse(&chain).unwrap().eval(0.0), 100.0);
}
