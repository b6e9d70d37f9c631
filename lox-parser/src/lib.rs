//! Scanner, parser and AST for the Lox language.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
