//! Debug renderings of [`Expr`] trees.

use crate::ast::Expr;
use lox_value::Value;
use std::fmt;

/// Fully parenthesized, operator-first rendering (e.g. `(+ 1 (* 2 3))`).
pub struct Prefix<'a>(pub &'a Expr);

/// Operator-last rendering (e.g. `1 2 3 * +`). Groupings render their inner expression only.
pub struct Postfix<'a>(pub &'a Expr);

pub fn prefix(expr: &Expr) -> String {
    Prefix(expr).to_string()
}

pub fn postfix(expr: &Expr) -> String {
    Postfix(expr).to_string()
}

/// String literals are quoted so that printed trees can be scanned again.
fn fmt_literal(f: &mut fmt::Formatter<'_>, val: &Value) -> fmt::Result {
    match val {
        Value::Str(string) => write!(f, "\"{}\"", string),
        _ => write!(f, "{}", val),
    }
}

impl fmt::Display for Prefix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Literal(val) => fmt_literal(f, val),
            Expr::Unary { op, arg } => write!(f, "({} {})", op.lexeme, Prefix(arg)),
            Expr::Binary { lhs, op, rhs } => {
                write!(f, "({} {} {})", op.lexeme, Prefix(lhs), Prefix(rhs))
            }
            Expr::Grouping(inner) => write!(f, "(group {})", Prefix(inner)),
        }
    }
}

impl fmt::Display for Postfix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expr::Literal(val) => fmt_literal(f, val),
            Expr::Unary { op, arg } => write!(f, "{} {}", Postfix(arg), op.lexeme),
            Expr::Binary { lhs, op, rhs } => {
                write!(f, "{} {} {}", Postfix(lhs), Postfix(rhs), op.lexeme)
            }
            Expr::Grouping(inner) => write!(f, "{}", Postfix(inner)),
        }
    }
}
