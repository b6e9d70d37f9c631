use crate::ast::{Expr, Stmt};
use crate::lexer::{Scanner, Token, TokenType};
use lox_source::{Diagnostic, Source};
use lox_value::Value;
use std::{error, fmt};

mod expr;
mod prefix;
mod stmt;

/// Default bound on the height of an expression tree.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// A syntax error. Already reported to the [`Source`] when it is created.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The offending token.
    pub token: Token,
    pub message: String,
}

impl ParseError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::new(&self.message, self.token.line, self.token.location())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_diagnostic(), f)
    }
}

impl error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    /// Always ends with a [`TokenType::Eof`].
    tokens: Vec<Token>,
    /// Index of the token being looked at.
    current: usize,
    /// Current expression nesting.
    depth: usize,
    max_depth: usize,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Parser<'a> {
    /// Create a parser over already scanned `tokens`.
    /// An `Eof` token is appended if the sequence does not end with one.
    pub fn new(mut tokens: Vec<Token>, source: &'a Source<'a>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenType::Eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::eof(line));
        }

        Self {
            tokens,
            current: 0,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            source,
        }
    }

    /// Scan `source` and create a parser over the result.
    pub fn from_source(source: &'a Source<'a>) -> Self {
        let tokens = Scanner::new(source).scan_tokens();
        Self::new(tokens, source)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl<'a> Parser<'a> {
    /// Parses statements until the end of input.
    /// A statement with a syntax error is skipped (see [`Self::synchronize`]) so that
    /// every error in the program gets reported. Check [`Source::has_no_errors`]
    /// before running the result.
    pub fn parse_program(&mut self) -> Vec<Stmt> {
        let mut program = Vec::new();

        while !self.is_at_end() {
            match self.parse_stmt() {
                Ok(stmt) => program.push(stmt),
                Err(_) => self.synchronize(),
            }
        }

        program
    }

    /// Parses a single expression. Returns `None` on a syntax error.
    pub fn parse_expression(&mut self) -> Option<Expr> {
        self.parse_expr().ok()
    }
}

/// Parse utilities
impl<'a> Parser<'a> {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenType::Eof
    }

    /// Consumes the current token. Never moves past `Eof`.
    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenType) -> bool {
        self.peek().kind == kind
    }

    /// Predicate that tests whether the current token is of kind `kind` and eats it if yes as a side effect.
    fn eat(&mut self, kind: TokenType) -> bool {
        if self.check(kind) {
            self.next(); // eat token
            true
        } else {
            false
        }
    }

    /// Eats and returns the current token if it is one of `kinds`.
    fn eat_any(&mut self, kinds: &[TokenType]) -> Option<Token> {
        if kinds.contains(&self.peek().kind) {
            Some(self.next())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenType, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.next())
        } else {
            Err(self.unexpected(message))
        }
    }

    /// The value of the current token if it is a literal (`true`, `false`, `nil`, number or string).
    fn literal(&self) -> Option<Value> {
        let token = self.peek();
        match token.kind {
            TokenType::False => Some(Value::Bool(false)),
            TokenType::True => Some(Value::Bool(true)),
            TokenType::Nil => Some(Value::Nil),
            TokenType::NumberLit | TokenType::StringLit => token.literal.clone(),
            _ => None,
        }
    }

    /// Runs `f` one nesting level deeper, failing once `max_depth` is exceeded.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= self.max_depth {
            return Err(self.unexpected("Expression nesting too deep."));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Reports a syntax error at `token`.
    fn error(&self, token: Token, message: &str) -> ParseError {
        let error = ParseError {
            token,
            message: message.to_string(),
        };
        self.source.errors.add_error(error.to_diagnostic());
        error
    }

    /// Reports a syntax error at the current token.
    fn unexpected(&self, message: &str) -> ParseError {
        self.error(self.peek().clone(), message)
    }

    /// Discards tokens until the next likely statement boundary: just after a `;`
    /// or right before a keyword that starts a statement.
    fn synchronize(&mut self) {
        self.next();

        while !self.is_at_end() {
            if self.previous().kind == TokenType::Semicolon {
                return;
            }
            if self.peek().kind.starts_statement() {
                return;
            }
            self.next();
        }
    }
}
