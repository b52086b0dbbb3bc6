use crate::environment::Environment;
use crate::types::{Atom, Expression};
use std::collections::HashSet;
use thiserror::Error;

// --- Evaluation Error ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),
    #[error("symbol '{0}' is already defined")]
    AlreadyDefined(String),
    // Mismatched arity; the message names the procedure
    #[error("invalid number of arguments: {0}")]
    InvalidArguments(String),
    #[error("procedure '{procedure}' expects a {expected} for argument {position}, got a {found}")]
    TypeMismatch {
        procedure: String,
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    // Malformed special form, e.g. (if True 1)
    #[error("invalid special form: {0}")]
    InvalidSpecialForm(String),
    #[error("argument {position} to '{procedure}' evaluated to nothing")]
    EmptyArgument { procedure: String, position: usize },
    // A built-in rejected its arguments. The environment has been reset.
    #[error("invalid arguments to '{procedure}'")]
    ProcedureFailed {
        procedure: String,
        #[source]
        source: Box<EvalError>,
    },
}

// Result type alias for convenience
pub type EvalResult<T = Expression> = Result<T, EvalError>;

pub const SPECIAL_FORMS: [&str; 3] = ["begin", "if", "define"];

pub fn special_form_identifiers() -> HashSet<String> {
    SPECIAL_FORMS.iter().map(|name| name.to_string()).collect()
}

// --- Evaluate Function ---

/// Evaluates an expression tree against `env`.
///
/// `define` mutates `env` immediately, so later siblings in a `begin` see the
/// new binding. Redefinitions and failing procedure calls reset `env` to its
/// defaults before the error is returned.
pub fn evaluate(expr: &Expression, env: &mut Environment) -> EvalResult {
    log::trace!("evaluate {:?}", expr);

    let Some(head) = &expr.head else {
        // The empty expression evaluates to itself
        return Ok(Expression::default());
    };

    match head {
        // Self-evaluating literals; any children are dropped
        Atom::Number(_) | Atom::Boolean(_) => Ok(Expression::leaf(head.clone())),
        Atom::Symbol(name) => match name.as_str() {
            "begin" => evaluate_begin(&expr.tail, env),
            "if" => evaluate_if(&expr.tail, env),
            "define" => evaluate_define(&expr.tail, env),
            _ => evaluate_symbol(name, &expr.tail, env),
        },
    }
}

fn evaluate_begin(body: &[Expression], env: &mut Environment) -> EvalResult {
    let mut result = Expression::default();
    for expr in body {
        result = evaluate(expr, env)?;
    }
    Ok(result)
}

fn evaluate_if(operands: &[Expression], env: &mut Environment) -> EvalResult {
    let [condition, consequent, alternate] = operands else {
        return Err(EvalError::InvalidSpecialForm(format!(
            "if expects a condition, a consequent and an alternate, got {} expression(s)",
            operands.len()
        )));
    };

    match evaluate(condition, env)?.head {
        Some(Atom::Boolean(true)) => evaluate(consequent, env),
        Some(Atom::Boolean(false)) => evaluate(alternate, env),
        Some(other) => Err(EvalError::InvalidSpecialForm(format!(
            "if condition must be a boolean, got a {}",
            other.type_name()
        ))),
        None => Err(EvalError::InvalidSpecialForm(
            "if condition evaluated to nothing".to_string(),
        )),
    }
}

fn evaluate_define(operands: &[Expression], env: &mut Environment) -> EvalResult {
    let [target, value] = operands else {
        return Err(EvalError::InvalidSpecialForm(format!(
            "define expects a symbol and a value, got {} expression(s)",
            operands.len()
        )));
    };

    let name = match target {
        Expression {
            head: Some(Atom::Symbol(name)),
            tail,
        } if tail.is_empty() => name,
        _ => {
            return Err(EvalError::InvalidSpecialForm(format!(
                "define expects a symbol to bind, got {:?}",
                target
            )));
        }
    };

    if env.key_present(name) || SPECIAL_FORMS.contains(&name.as_str()) {
        // Redefinition wipes every user binding, not only this one.
        log::warn!("redefinition of '{}', resetting environment", name);
        env.reset();
        return Err(EvalError::AlreadyDefined(name.clone()));
    }

    let result = evaluate(value, env)?;
    log::debug!("define {} as {}", name, result);
    env.add_expression(name, result.clone());
    Ok(result)
}

fn evaluate_symbol(name: &str, operands: &[Expression], env: &mut Environment) -> EvalResult {
    if !env.key_present(name) {
        return Err(EvalError::UnknownSymbol(name.to_string()));
    }

    if !env.is_procedure(name) {
        // A stored value; children, if any, are ignored
        return env
            .get_expression(name)
            .ok_or_else(|| EvalError::UnknownSymbol(name.to_string()));
    }

    // Evaluate the operands down to their head atoms
    let mut args: Vec<Atom> = Vec::with_capacity(operands.len());
    for (i, operand) in operands.iter().enumerate() {
        match evaluate(operand, env)?.head {
            Some(atom) => args.push(atom),
            None => {
                return Err(EvalError::EmptyArgument {
                    procedure: name.to_string(),
                    position: i + 1,
                });
            }
        }
    }

    log::debug!("apply {} to {:?}", name, args);
    env.get_result(name, &args).map_err(|err| {
        // A failing built-in wipes the environment back to its defaults.
        log::warn!("{}, resetting environment", err);
        env.reset();
        EvalError::ProcedureFailed {
            procedure: name.to_string(),
            source: Box::new(err),
        }
    })
}
