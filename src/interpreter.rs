use crate::environment::Environment;
use crate::evaluator::{EvalResult, evaluate};
use crate::parser::{ParseError, parse_str};
use crate::types::Expression;
use std::io::{self, Read};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("failed to read program: {0}")]
    Io(#[from] io::Error),
    // Keeps the text that failed so it can be rendered with the diagnostic
    #[error("{error}")]
    Parse { error: ParseError, program: String },
}

/// One environment plus the most recently parsed program.
///
/// `parse` replaces the program only when it succeeds; `eval` runs whatever
/// program is current against the environment, which persists between calls.
#[derive(Debug, Default)]
pub struct Interpreter {
    env: Environment,
    ast: Expression,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::default()
    }

    pub fn parse(&mut self, program: &str) -> Result<(), ParseError> {
        self.ast = parse_str(program)?;
        Ok(())
    }

    /// Reads `reader` to the end and parses it as one program.
    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> Result<(), InterpreterError> {
        let mut program = String::new();
        reader.read_to_string(&mut program)?;
        self.parse(&program)
            .map_err(|error| InterpreterError::Parse { error, program })
    }

    /// Evaluates the current program, reporting the error to the caller.
    pub fn try_eval(&mut self) -> EvalResult {
        evaluate(&self.ast, &mut self.env)
    }

    /// Evaluates the current program. Never fails: an error is logged and the
    /// empty expression is returned in its place.
    pub fn eval(&mut self) -> Expression {
        match self.try_eval() {
            Ok(result) => result,
            Err(err) => {
                log::error!("{}", err);
                Expression::default()
            }
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::EvalError;
    use crate::types::Atom;
    use std::io::Cursor;

    // Parses and evaluates `program` in a fresh interpreter
    fn run(program: &str) -> Expression {
        let mut interp = Interpreter::new();
        if let Err(e) = interp.parse(program) {
            panic!("Failed to parse '{}': {}", program, e);
        }
        interp.eval()
    }

    fn assert_run(program: &str, expected: Expression) {
        assert_eq!(run(program), expected, "Program: '{}'", program);
    }

    fn assert_run_number(program: &str, expected: f64) {
        match run(program).head {
            Some(Atom::Number(n)) => assert!(
                (n - expected).abs() < 1e-9,
                "Program: '{}', expected {}, got {}",
                program,
                expected,
                n
            ),
            other => panic!("Program: '{}', expected a number, got {:?}", program, other),
        }
    }

    #[test]
    fn test_parse_numerical_literals() {
        for program in ["(1)", "(+1)", "(+1e+0)", "(1e-0)"] {
            let mut interp = Interpreter::new();
            assert!(interp.parse(program).is_ok(), "Program: '{}'", program);
        }
    }

    #[test]
    fn test_parse_expected_input() {
        let mut interp = Interpreter::new();
        assert!(interp.parse("(begin (define r 10) (* pi (* r r)))").is_ok());
    }

    #[test]
    fn test_parse_faulted_input() {
        let mut interp = Interpreter::new();
        assert!(interp.parse(")(begin (define r 10) (* pi (* r r)))").is_err());
    }

    #[test]
    fn test_parse_commented_input() {
        let mut interp = Interpreter::new();
        assert!(
            interp
                .parse("(begin (define r 10) (* pi (* r r))) ; not included")
                .is_ok()
        );
    }

    #[test]
    fn test_failed_parse_keeps_previous_program() {
        let mut interp = Interpreter::new();
        interp.parse("(+ 1 2)").unwrap();
        assert!(interp.parse("(+ 1").is_err());
        assert_eq!(interp.eval(), Expression::number(3.0));
    }

    #[test]
    fn test_parse_reader() {
        let mut interp = Interpreter::new();
        interp
            .parse_reader(Cursor::new("(begin (define answer 42)\n(answer))"))
            .unwrap();
        assert_eq!(interp.eval(), Expression::number(42.0));

        let err = interp.parse_reader(Cursor::new("(1abc)")).unwrap_err();
        assert!(matches!(
            err,
            InterpreterError::Parse { error: ParseError::InvalidAtom { .. }, ref program }
                if program == "(1abc)"
        ));
    }

    #[test]
    fn test_literal_expressions() {
        assert_run("(True)", Expression::boolean(true));
        assert_run("(False)", Expression::boolean(false));
        assert_run("(4)", Expression::number(4.0));
        assert_run("(pi)", Expression::number(0f64.atan2(-1.0)));
    }

    #[test]
    fn test_simple_procedures() {
        assert_run("(+ 1 2)", Expression::number(3.0));
        assert_run("(+ 1 2 3)", Expression::number(6.0));
        assert_run("(+ 1 2 3 4 5 6)", Expression::number(21.0));
    }

    #[test]
    fn test_special_form_if() {
        assert_run("(if True (4) (-4))", Expression::number(4.0));
        assert_run("(if False (4) (-4))", Expression::number(-4.0));
    }

    #[test]
    fn test_special_forms_begin_and_define() {
        assert_run("(define answer 42)", Expression::number(42.0));
        assert_run("(begin (define answer 42)\n(answer))", Expression::number(42.0));
        assert_run("(begin (define answer (+ 9 11)) (answer))", Expression::number(20.0));
        assert_run("(begin (define a 1) (define b 1) (+ a b))", Expression::number(2.0));
        assert_run_number(
            "(begin (define r 10) (* pi (* r r)))",
            std::f64::consts::PI * 100.0,
        );
    }

    #[test]
    fn test_complex_expression() {
        assert_run("(+ (+ 10 1) (+ 30 (+ 1 1)))", Expression::number(43.0));
    }

    #[test]
    fn test_all_procedures() {
        assert_run("(not True)", Expression::boolean(false));
        assert_run("(not False)", Expression::boolean(true));
        assert_run("(and True False (not True))", Expression::boolean(false));
        assert_run("(and True True (not False))", Expression::boolean(true));
        assert_run("(or True False)", Expression::boolean(true));
        assert_run("(or False False False)", Expression::boolean(false));
        assert_run("(< 2 3)", Expression::boolean(true));
        assert_run("(< 3 2)", Expression::boolean(false));
        assert_run("(<= 3 3)", Expression::boolean(true));
        assert_run("(<= 2 3)", Expression::boolean(true));
        assert_run("(<= 4 3)", Expression::boolean(false));
        assert_run("(>= 3 3)", Expression::boolean(true));
        assert_run("(>= 2 3)", Expression::boolean(false));
        assert_run("(>= 4 3)", Expression::boolean(true));
        assert_run("(> 2 3)", Expression::boolean(false));
        assert_run("(> 3 2)", Expression::boolean(true));
        assert_run("(= 3 2)", Expression::boolean(false));
        assert_run("(= 3 3)", Expression::boolean(true));
        assert_run("(+ 3 2)", Expression::number(5.0));
        assert_run_number("(+ 9.1 3 2)", 14.1);
        assert_run("(- 2)", Expression::number(-2.0));
        assert_run("(- 3 2)", Expression::number(1.0));
        assert_run("(* 3 2)", Expression::number(6.0));
        assert_run("(* 3 2 4 5)", Expression::number(120.0));
        assert_run("(/ 1 2)", Expression::number(0.5));
        assert_run("(/ 10 2)", Expression::number(5.0));
        assert_run_number("(log10 1000000)", 6.0);
        assert_run("(pow 3 2)", Expression::number(9.0));
        assert_run_number("(pow 4 0.5)", 2.0);
    }

    #[test]
    fn test_failures_yield_empty_result() {
        for program in [
            "(foo 1 2)",
            "(not True False)",
            "(/ 1)",
            "(pow 2)",
            "(if True 1)",
            "(+ 1 False)",
        ] {
            let result = run(program);
            assert!(result.is_empty(), "Program: '{}', got {:?}", program, result);
        }
    }

    #[test]
    fn test_arity_failures_reset_environment() {
        let programs = [
            ("not", "(not True False)"),
            ("and", "(and)"),
            ("or", "(or)"),
            ("<", "(< 1)"),
            ("<=", "(<= 1 2 3)"),
            (">", "(> 1)"),
            (">=", "(>= 1)"),
            ("=", "(= 1 2 3)"),
            ("+", "(+)"),
            ("-", "(- 1 2 3)"),
            ("*", "(* 2)"),
            ("/", "(/ 1)"),
            ("log10", "(log10 1 2)"),
            ("pow", "(pow 2)"),
        ];
        for (name, program) in programs {
            let mut interp = Interpreter::new();
            interp.parse("(define keep 1)").unwrap();
            interp.eval();

            interp.parse(program).unwrap();
            match interp.try_eval() {
                Err(EvalError::ProcedureFailed { procedure, source }) => {
                    assert_eq!(procedure, name, "Program: '{}'", program);
                    assert!(
                        matches!(*source, EvalError::InvalidArguments(_)),
                        "Program: '{}', cause {:?}",
                        program,
                        source
                    );
                }
                other => panic!("Program: '{}', expected a failed call, got {:?}", program, other),
            }

            assert!(!interp.env().key_present("keep"), "Program: '{}'", program);
            assert_eq!(
                interp.env().get_expression("pi"),
                Some(Expression::number(std::f64::consts::PI)),
                "Program: '{}'",
                program
            );
        }
    }

    #[test]
    fn test_redefinition_resets_environment() {
        let mut interp = Interpreter::new();
        interp.parse("(define x 1)").unwrap();
        assert_eq!(interp.eval(), Expression::number(1.0));

        interp.parse("(define x 2)").unwrap();
        assert!(matches!(
            interp.try_eval(),
            Err(EvalError::AlreadyDefined(name)) if name == "x"
        ));
        assert!(!interp.env().key_present("x"));

        interp.parse("(pi)").unwrap();
        assert_eq!(interp.eval(), Expression::number(std::f64::consts::PI));

        // x is gone, so it can be defined again
        interp.parse("(define x 2)").unwrap();
        assert_eq!(interp.eval(), Expression::number(2.0));
    }

    #[test]
    fn test_definitions_persist_between_programs() {
        let mut interp = Interpreter::new();
        interp.parse("(define r 10)").unwrap();
        interp.eval();
        interp.parse("(* r r)").unwrap();
        assert_eq!(interp.eval(), Expression::number(100.0));

        // A failing call wipes r
        interp.parse("(log10)").unwrap();
        assert!(interp.eval().is_empty());
        interp.parse("(* r r)").unwrap();
        assert!(matches!(
            interp.try_eval(),
            Err(EvalError::UnknownSymbol(name)) if name == "r"
        ));
    }

    #[test]
    fn test_rendering() {
        assert_eq!(run("(+ 1 2)").to_string(), "(3)");
        assert_eq!(run("(< 1 2)").to_string(), "(True)");
        assert_eq!(run("(foo)").to_string(), "()");
    }
}
