use crate::evaluator::{EvalError, EvalResult};
use crate::primitives;
use crate::types::{Atom, Expression, PrimitiveFunc, Procedure};
use std::collections::{HashMap, HashSet};

/// What a symbol is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Expression(Expression),
    Procedure(Procedure),
}

// --- Environment Definition ---

/// Mapping from symbol names to stored values and built-in procedures.
///
/// There is a single flat scope. Entries only ever grow through
/// `add_expression`; `reset` is the one way to drop them.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl Environment {
    /// Creates an environment seeded with the built-ins and `pi`.
    pub fn new() -> Self {
        let mut env = Environment {
            bindings: HashMap::new(),
        };
        env.reset();
        env
    }

    /// Drops every binding and re-seeds the defaults.
    ///
    /// The evaluator calls this when a definition collides with an existing
    /// key and when a built-in rejects its arguments, so any user
    /// definitions are lost at that point.
    pub fn reset(&mut self) {
        self.bindings.clear();

        self.add_expression("pi", Expression::number(0f64.atan2(-1.0)));

        // Logic
        self.add_primitive("not", primitives::prim_not);
        self.add_primitive("and", primitives::prim_and);
        self.add_primitive("or", primitives::prim_or);

        // Comparison
        self.add_primitive("<", primitives::prim_less_than);
        self.add_primitive("<=", primitives::prim_less_than_or_equals);
        self.add_primitive(">", primitives::prim_greater_than);
        self.add_primitive(">=", primitives::prim_greater_than_or_equals);
        self.add_primitive("=", primitives::prim_equals);

        // Arithmetic
        self.add_primitive("+", primitives::prim_add);
        self.add_primitive("-", primitives::prim_sub);
        self.add_primitive("*", primitives::prim_mul);
        self.add_primitive("/", primitives::prim_div);
        self.add_primitive("log10", primitives::prim_log10);
        self.add_primitive("pow", primitives::prim_pow);
    }

    /// Same as `reset`.
    pub fn clear(&mut self) {
        self.reset();
    }

    pub fn key_present(&self, key: &str) -> bool {
        self.bindings.contains_key(key)
    }

    /// `false` for absent keys as well as stored values.
    pub fn is_procedure(&self, key: &str) -> bool {
        matches!(self.bindings.get(key), Some(Binding::Procedure(_)))
    }

    /// Returns a copy of the stored value, or `None` if `key` is absent or
    /// bound to a procedure.
    pub fn get_expression(&self, key: &str) -> Option<Expression> {
        match self.bindings.get(key) {
            Some(Binding::Expression(expr)) => Some(expr.clone()),
            _ => None,
        }
    }

    /// Binds `key` to `value`, replacing whatever was there.
    /// Whether a redefinition is allowed is up to the caller.
    pub fn add_expression(&mut self, key: &str, value: Expression) {
        self.bindings
            .insert(key.to_string(), Binding::Expression(value));
    }

    /// Calls the procedure bound to `key` with `args`.
    pub fn get_result(&self, key: &str, args: &[Atom]) -> EvalResult {
        match self.bindings.get(key) {
            Some(Binding::Procedure(procedure)) => procedure.call(args),
            Some(Binding::Expression(_)) => Err(EvalError::InvalidSpecialForm(format!(
                "'{}' is a value, not a procedure",
                key
            ))),
            None => Err(EvalError::UnknownSymbol(key.to_string())),
        }
    }

    /// Helper to add a primitive procedure to the environment.
    fn add_primitive(&mut self, name: &str, func: PrimitiveFunc) {
        self.bindings.insert(
            name.to_string(),
            Binding::Procedure(Procedure::new(name, func)),
        );
    }

    /// Gets a list of all identifiers in the environment
    pub fn get_identifiers(&self) -> HashSet<String> {
        self.bindings.keys().cloned().collect()
    }
}
