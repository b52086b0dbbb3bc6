use crate::evaluator::{EvalError, EvalResult};
use crate::types::{Atom, Expression};

// Checks the number of arguments
macro_rules! check_arity {
    ($args:expr, $expected:expr, $name:expr) => {
        if $args.len() != $expected {
            return Err(EvalError::InvalidArguments(format!(
                "procedure '{}' expects exactly {} argument(s), got {}",
                $name,
                $expected,
                $args.len()
            )));
        }
    };
    // Variant for minimum number of args
    ($args:expr, min $expected:expr, $name:expr) => {
        if $args.len() < $expected {
            return Err(EvalError::InvalidArguments(format!(
                "procedure '{}' expects at least {} argument(s), got {}",
                $name,
                $expected,
                $args.len()
            )));
        }
    };
    // Variant for range of args (inclusive)
    ($args:expr, $min:expr, $max:expr, $name:expr) => {
        if !($min..=$max).contains(&$args.len()) {
            return Err(EvalError::InvalidArguments(format!(
                "procedure '{}' expects between {} and {} arguments, got {}",
                $name,
                $min,
                $max,
                $args.len()
            )));
        }
    };
}

// Extracts a number from an Atom or returns a TypeMismatch error
fn expect_number(atom: &Atom, name: &str, position: usize) -> EvalResult<f64> {
    match atom {
        Atom::Number(n) => Ok(*n),
        other => Err(EvalError::TypeMismatch {
            procedure: name.to_string(),
            position,
            expected: "number",
            found: other.type_name(),
        }),
    }
}

fn expect_boolean(atom: &Atom, name: &str, position: usize) -> EvalResult<bool> {
    match atom {
        Atom::Boolean(b) => Ok(*b),
        other => Err(EvalError::TypeMismatch {
            procedure: name.to_string(),
            position,
            expected: "boolean",
            found: other.type_name(),
        }),
    }
}

fn fold_numbers<F: Fn(f64, f64) -> f64>(
    args: &[Atom],
    start: f64,
    func: F,
    operator: &str,
) -> EvalResult {
    let mut acc = start;
    for (i, atom) in args.iter().enumerate() {
        acc = func(acc, expect_number(atom, operator, i + 1)?);
    }
    Ok(Expression::number(acc))
}

fn fold_booleans<F: Fn(bool, bool) -> bool>(
    args: &[Atom],
    start: bool,
    func: F,
    operator: &str,
) -> EvalResult {
    let mut acc = start;
    for (i, atom) in args.iter().enumerate() {
        acc = func(acc, expect_boolean(atom, operator, i + 1)?);
    }
    Ok(Expression::boolean(acc))
}

fn compare_numbers<F: Fn(f64, f64) -> bool>(args: &[Atom], compare: F, operator: &str) -> EvalResult {
    check_arity!(args, 2, operator);
    let left = expect_number(&args[0], operator, 1)?;
    let right = expect_number(&args[1], operator, 2)?;
    Ok(Expression::boolean(compare(left, right)))
}

// --- Logic ---

pub fn prim_not(args: &[Atom]) -> EvalResult {
    check_arity!(args, 1, "not");
    Ok(Expression::boolean(!expect_boolean(&args[0], "not", 1)?))
}

pub fn prim_and(args: &[Atom]) -> EvalResult {
    check_arity!(args, min 1, "and");
    fold_booleans(args, true, |acc, val| acc && val, "and")
}

pub fn prim_or(args: &[Atom]) -> EvalResult {
    check_arity!(args, min 1, "or");
    fold_booleans(args, false, |acc, val| acc || val, "or")
}

// --- Comparison ---

pub fn prim_less_than(args: &[Atom]) -> EvalResult {
    compare_numbers(args, |left, right| left < right, "<")
}

pub fn prim_less_than_or_equals(args: &[Atom]) -> EvalResult {
    compare_numbers(args, |left, right| left <= right, "<=")
}

pub fn prim_greater_than(args: &[Atom]) -> EvalResult {
    compare_numbers(args, |left, right| left > right, ">")
}

pub fn prim_greater_than_or_equals(args: &[Atom]) -> EvalResult {
    compare_numbers(args, |left, right| left >= right, ">=")
}

pub fn prim_equals(args: &[Atom]) -> EvalResult {
    compare_numbers(args, |left, right| left == right, "=")
}

// --- Arithmetic ---

pub fn prim_add(args: &[Atom]) -> EvalResult {
    // (+ 1 2 3) -> 6
    check_arity!(args, min 1, "+");
    fold_numbers(args, 0.0, |acc, val| acc + val, "+")
}

pub fn prim_sub(args: &[Atom]) -> EvalResult {
    // (- x) -> -x
    // (- x y) -> x - y
    check_arity!(args, 1, 2, "-");
    let first = expect_number(&args[0], "-", 1)?;
    match args.get(1) {
        Some(atom) => Ok(Expression::number(first - expect_number(atom, "-", 2)?)),
        None => Ok(Expression::number(-first)),
    }
}

pub fn prim_mul(args: &[Atom]) -> EvalResult {
    // (* 1 2 3) -> 6
    check_arity!(args, min 2, "*");
    fold_numbers(args, 1.0, |acc, val| acc * val, "*")
}

pub fn prim_div(args: &[Atom]) -> EvalResult {
    // Division by zero follows IEEE-754 and yields inf or NaN.
    check_arity!(args, 2, "/");
    let dividend = expect_number(&args[0], "/", 1)?;
    let divisor = expect_number(&args[1], "/", 2)?;
    Ok(Expression::number(dividend / divisor))
}

pub fn prim_log10(args: &[Atom]) -> EvalResult {
    check_arity!(args, 1, "log10");
    Ok(Expression::number(expect_number(&args[0], "log10", 1)?.log10()))
}

pub fn prim_pow(args: &[Atom]) -> EvalResult {
    // (pow base exponent)
    check_arity!(args, 2, "pow");
    let base = expect_number(&args[0], "pow", 1)?;
    let exponent = expect_number(&args[1], "pow", 2)?;
    Ok(Expression::number(base.powf(exponent)))
}
