//! Runtime errors.

use lox_parser::lexer::Token;
use lox_source::{Diagnostic, ErrorLocation};
use std::{error, fmt, io};

/// An error raised while evaluating a program. Aborts the rest of the program.
#[derive(Debug)]
pub enum RuntimeError {
    /// Operand types do not satisfy the operator's contract.
    Type {
        /// The offending operator.
        op: Token,
        message: String,
    },
    /// Expression evaluation went deeper than the interpreter's limit.
    NestingTooDeep { line: usize, limit: usize },
    /// Writing `print` output failed.
    Io { line: usize, source: io::Error },
}

impl RuntimeError {
    pub fn type_error(op: &Token, message: impl ToString) -> Self {
        RuntimeError::Type {
            op: op.clone(),
            message: message.to_string(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RuntimeError::Type { op, message } => Diagnostic::new(message, op.line, op.location()),
            RuntimeError::NestingTooDeep { line, limit } => Diagnostic::new(
                format!("Expression nesting exceeds {} levels.", limit),
                *line,
                ErrorLocation::Nowhere,
            ),
            RuntimeError::Io { line, source } => Diagnostic::new(
                format!("Cannot write output: {}.", source),
                *line,
                ErrorLocation::Nowhere,
            ),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_diagnostic(), f)
    }
}

impl error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            RuntimeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(error: &RuntimeError) -> Self {
        error.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use lox_parser::lexer::TokenType;

    #[test]
    fn test_display() {
        let error = RuntimeError::type_error(
            &Token::simple(TokenType::Minus, 4),
            "Operands of subtraction must be numbers.",
        );
        assert!(matches!(&error, RuntimeError::Type { op, .. } if op.kind == TokenType::Minus));
        assert_snapshot!(error.to_string(), @"[line 4] Error at '-': Operands of subtraction must be numbers.");

        let error = RuntimeError::NestingTooDeep { line: 2, limit: 8 };
        assert_snapshot!(error.to_string(), @"[line 2] Error: Expression nesting exceeds 8 levels.");
    }
}
