use crate::evaluator::EvalResult;
use std::fmt; // For custom display formatting

/// A single indivisible literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Number(f64),    // Every number is a double
    Boolean(bool),  // True or False
    Symbol(String), // e.g., +, pi, define
}

impl Atom {
    pub fn type_name(&self) -> &'static str {
        match self {
            Atom::Number(_) => "number",
            Atom::Boolean(_) => "boolean",
            Atom::Symbol(_) => "symbol",
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Number(n) => write!(f, "{}", n),
            Atom::Boolean(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Atom::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// A tree node: a head atom plus an ordered list of child expressions.
///
/// The head is `None` for the empty expression, which is what `()` parses to
/// and what the evaluator returns when there is nothing to return.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    pub head: Option<Atom>,
    pub tail: Vec<Expression>,
}

impl Expression {
    pub fn new(head: Atom, tail: Vec<Expression>) -> Self {
        Expression {
            head: Some(head),
            tail,
        }
    }

    pub fn leaf(head: Atom) -> Self {
        Expression::new(head, Vec::new())
    }

    pub fn number(n: f64) -> Self {
        Expression::leaf(Atom::Number(n))
    }

    pub fn boolean(b: bool) -> Self {
        Expression::leaf(Atom::Boolean(b))
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Expression::leaf(Atom::Symbol(s.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Structural equality: heads match and every child is deeply equal.
    ///
    /// `==` only compares the heads and the number of children.
    pub fn deep_eq(&self, other: &Expression) -> bool {
        self.head == other.head
            && self.tail.len() == other.tail.len()
            && self
                .tail
                .iter()
                .zip(&other.tail)
                .all(|(left, right)| left.deep_eq(right))
    }
}

// Shallow on purpose: the children themselves are never compared.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.head == other.head && self.tail.len() == other.tail.len()
    }
}

// Renders only the head, as `(value)`; the empty expression renders as `()`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.head {
            Some(atom) => write!(f, "({})", atom),
            None => write!(f, "()"),
        }
    }
}

pub type PrimitiveFunc = fn(&[Atom]) -> EvalResult;

/// A built-in procedure: a function over evaluated argument atoms.
#[derive(Clone)]
pub struct Procedure {
    pub name: String, // For display/debug and error messages
    pub func: PrimitiveFunc,
}

impl Procedure {
    pub fn new(name: &str, func: PrimitiveFunc) -> Self {
        Procedure {
            name: name.to_string(),
            func,
        }
    }

    pub fn call(&self, args: &[Atom]) -> EvalResult {
        (self.func)(args)
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive({})", self.name)
    }
}

// Function pointers don't implement PartialEq reliably, compare by name.
impl PartialEq for Procedure {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Classifies a single token as a number, boolean or symbol.
///
/// Returns `None` for tokens that start like a number but aren't one, such as
/// `1abc`.
pub fn token_to_atom(token: &str) -> Option<Atom> {
    // `f64::from_str` also accepts "inf" and "nan"; those stay symbols.
    if token.bytes().any(|b| b.is_ascii_digit())
        && let Ok(n) = token.parse::<f64>()
    {
        return Some(Atom::Number(n));
    }
    match token {
        t if t.starts_with(|c: char| c.is_ascii_digit()) => None,
        "True" => Some(Atom::Boolean(true)),
        "False" => Some(Atom::Boolean(false)),
        "" => None,
        t => Some(Atom::Symbol(t.to_string())),
    }
}
