//! Source code representation and error management.

use std::{cell::RefCell, error, fmt};

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Accumulated errors.
    pub errors: ErrorReporter,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            errors: ErrorReporter::new(),
        }
    }

    /// Returns `true` if `Source` has no accumulated errors. Returns `false` otherwise.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// Where in the token stream an error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    /// Lexical errors are not attached to a token.
    Nowhere,
    /// The offending token is the end of input.
    AtEnd,
    /// The offending token, by lexeme.
    AtLexeme(String),
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLocation::Nowhere => Ok(()),
            ErrorLocation::AtEnd => write!(f, " at end"),
            ErrorLocation::AtLexeme(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

/// A reported error (lexical, syntax or runtime).
///
/// Every error kind renders through the same `Display` impl:
/// `[line <n>] Error<where>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: ErrorLocation,
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic with the specified `message` reported at `line`.
    pub fn new(message: impl ToString, line: usize, location: ErrorLocation) -> Self {
        Self {
            line,
            location,
            message: message.to_string(),
        }
    }

    /// Create a diagnostic that is not attached to a token.
    pub fn lexical(message: impl ToString, line: usize) -> Self {
        Self::new(message, line, ErrorLocation::Nowhere)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[line {line}] Error{location}: {message}",
            line = self.line,
            location = self.location,
            message = self.message
        )
    }
}

impl error::Error for Diagnostic {}

/// Manages all the errors.
pub struct ErrorReporter {
    errors: RefCell<Vec<Diagnostic>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds an error to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for ergonomics.
    pub fn add_error(&self, error: Diagnostic) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Returns a copy of the accumulated errors in the order they were reported.
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.errors.borrow().clone()
    }

    /// Consumes the reporter and returns the accumulated errors.
    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors.into_inner()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.errors.borrow();
        for error in errors.iter() {
            writeln!(f, "{}", error)?;
        }

        Ok(())
    }
}
