use mct_expr::{parse, Function};
use proptest::prelude::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

#[test]
fn identity_function() {
    let f = Function::parse("x").unwrap();
    assert_eq!(f.eval(5.0), 5.0);
    assert_eq!(f.variable(), "x");
}

#[test]
fn operator_precedence() {
    let e = parse("1 + 2*3^2").unwrap();
    assert_eq!(e.eval(0.0), 19.0);
    let e = parse("-2^2").unwrap();
    assert_eq!(e.eval(0.0), -4.0);
    let e = parse("2^3^2").unwrap();
    assert_eq!(e.eval(0.0), 512.0);
    let e = parse("2**-1").unwrap();
    assert_eq!(e.eval(0.0), 0.5);
    let e = parse("(1 - 2) - 3").unwrap();
    assert_eq!(e.eval(0.0), -4.0);
    let e = parse("8/4/2").unwrap();
    assert_eq!(e.eval(0.0), 1.0);
}

#[test]
fn functions_and_constants() {
    let f = Function::parse("sin(t)^2 + cos(t)^2").unwrap();
    assert!(approx(f.eval(0.7), 1.0));
    assert_eq!(f.variable(), "t");
    let f = Function::parse("log(E) + log(8, 2) + sqrt(16) + Abs(-3)").unwrap();
    assert!(approx(f.eval(0.0), 1.0 + 3.0 + 4.0 + 3.0));
    let f = Function::parse("pi * 2").unwrap();
    assert!(approx(f.eval(123.0), std::f64::consts::TAU));
}

#[test]
fn scientific_literals() {
    assert_eq!(parse("1.5e2").unwrap().eval(0.0), 150.0);
    assert_eq!(parse("2E-1").unwrap().eval(0.0), 0.2);
    assert_eq!(parse(".25").unwrap().eval(0.0), 0.25);
}

#[test]
fn constant_function_binds_default_variable() {
    let f = Function::parse("3").unwrap();
    assert_eq!(f.variable(), "x");
    assert_eq!(f.eval(-100.0), 3.0);
}

#[test]
fn lowercase_e_is_a_variable() {
    let f = Function::parse("e + 1").unwrap();
    assert_eq!(f.variable(), "e");
    assert_eq!(f.eval(1.0), 2.0);
}

proptest! {
    #[test]
    fn quadratics_match_closed_form(a in -10.0f64..10.0, b in -10.0f64..10.0, c in -10.0f64..10.0, x in -5.0f64..5.0) {
        let f = Function::parse(&format!("{a}*x^2 + {b}*x + {c}")).unwrap();
        let expected = a * x * x + b * x + c;
        prop_assert!(approx(f.eval(x), expected), "{} vs {}", f.eval(x), expected);
    }
}
