use crate::lexer::Token;
use lox_value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A number, string, boolean or `nil` literal.
    Literal(Value),
    /// A prefix expression (e.g. `-1`, `!true`).
    Unary { op: Token, arg: Box<Expr> },
    /// A binary expression (e.g. `1+1`).
    Binary {
        lhs: Box<Expr>,
        op: Token,
        rhs: Box<Expr>,
    },
    /// A parenthesized expression.
    Grouping(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    ExprStmt(Expr),
    PrintStmt(Expr),
}

impl Stmt {
    /// The expression the statement owns.
    pub fn expr(&self) -> &Expr {
        match self {
            Stmt::ExprStmt(expr) | Stmt::PrintStmt(expr) => expr,
        }
    }
}
