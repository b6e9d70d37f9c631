//! Tree-walking interpreter for parsed Lox programs.

pub mod error;
pub mod interpreter;

pub use error::RuntimeError;
pub use interpreter::Interpreter;
