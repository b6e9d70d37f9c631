use logos::{Lexer, Logos, Skip};
use lox_source::{Diagnostic, ErrorLocation, Source};
use lox_value::Value;
use std::fmt;

/// Lexical category of a [`Token`].
/// `extras` holds the current (1-based) line number.
#[derive(Debug, Logos, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(extras = usize)]
pub enum TokenType {
    // single character tokens
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token(";")]
    Semicolon,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,

    // one or two character tokens
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEqual,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,

    // literals
    #[regex("[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[token("\"", string_lit)]
    StringLit,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    NumberLit,

    // keywords
    #[token("and")]
    And,
    #[token("class")]
    Class,
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("fun")]
    Fun,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("nil")]
    Nil,
    #[token("or")]
    Or,
    #[token("print")]
    Print,
    #[token("return")]
    Return,
    #[token("super")]
    Super,
    #[token("this")]
    This,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("while")]
    While,

    // misc
    #[regex(r"[ \t\r]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[token("\n", newline)]
    #[token("/*", block_comment)]
    /// Unmatched input. Reported by the [`Scanner`], never emitted.
    #[error]
    Error,

    /// Only generated by the [`Scanner`] once the input is exhausted.
    Eof,
}

fn newline(lex: &mut Lexer<TokenType>) -> Skip {
    lex.extras += 1;
    Skip
}

/// Consumes a string literal after its opening quote.
/// Returns `false` (producing [`TokenType::Error`]) if the closing quote is missing.
fn string_lit(lex: &mut Lexer<TokenType>) -> bool {
    let remainder = lex.remainder();
    let (len, terminated) = match remainder.find('"') {
        Some(end) => (end + 1, true),
        None => (remainder.len(), false),
    };
    let newlines = remainder[..len].matches('\n').count();

    lex.extras += newlines;
    lex.bump(len);
    terminated
}

/// Consumes a (possibly nested) block comment after its opening `/*`.
/// An unterminated comment runs to the end of input.
fn block_comment(lex: &mut Lexer<TokenType>) -> Skip {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1;
    let mut newlines = 0;
    let mut i = 0;

    while i < bytes.len() && depth > 0 {
        match (bytes[i], bytes.get(i + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                i += 2;
            }
            (b'\n', _) => {
                newlines += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }

    lex.extras += newlines;
    lex.bump(i);
    Skip
}

impl TokenType {
    /// Returns the canonical lexeme of a fixed-text category, or `None` for
    /// identifiers, literals and [`TokenType::Eof`].
    pub fn lexeme(&self) -> Option<&'static str> {
        use TokenType::*;
        Some(match self {
            LeftParen => "(",
            RightParen => ")",
            LeftBrace => "{",
            RightBrace => "}",
            Comma => ",",
            Dot => ".",
            Minus => "-",
            Plus => "+",
            Semicolon => ";",
            Slash => "/",
            Star => "*",
            Bang => "!",
            BangEqual => "!=",
            Equal => "=",
            EqualEqual => "==",
            Greater => ">",
            GreaterEqual => ">=",
            Less => "<",
            LessEqual => "<=",
            And => "and",
            Class => "class",
            Else => "else",
            False => "false",
            Fun => "fun",
            For => "for",
            If => "if",
            Nil => "nil",
            Or => "or",
            Print => "print",
            Return => "return",
            Super => "super",
            This => "this",
            True => "true",
            Var => "var",
            While => "while",
            Identifier | StringLit | NumberLit | Error | Eof => return None,
        })
    }

    /// Keywords that can start a statement. Used for error recovery.
    pub fn starts_statement(&self) -> bool {
        use TokenType::*;
        matches!(
            self,
            Class | Fun | Var | For | If | While | Print | Return
        )
    }
}

/// A classified, positioned unit of lexical input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenType,
    /// The exact source text the token was scanned from.
    pub lexeme: String,
    /// Only present for [`TokenType::NumberLit`] and [`TokenType::StringLit`].
    pub literal: Option<Value>,
    pub line: usize,
}

impl Token {
    /// Create a token. `literal` is dropped unless `kind` is a literal kind.
    pub fn new(
        kind: TokenType,
        lexeme: impl ToString,
        literal: Option<Value>,
        line: usize,
    ) -> Self {
        let literal = match kind {
            TokenType::NumberLit | TokenType::StringLit => literal,
            _ => None,
        };
        Self {
            kind,
            lexeme: lexeme.to_string(),
            literal,
            line,
        }
    }

    /// Create a fixed-text token with its canonical lexeme.
    pub fn simple(kind: TokenType, line: usize) -> Self {
        Self::new(kind, kind.lexeme().unwrap_or_default(), None, line)
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenType::Eof, "", None, line)
    }

    /// Where this token is, for error reporting.
    pub fn location(&self) -> ErrorLocation {
        match self.kind {
            TokenType::Eof => ErrorLocation::AtEnd,
            _ => ErrorLocation::AtLexeme(self.lexeme.clone()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.kind, self.lexeme)?;
        if let Some(literal) = &self.literal {
            write!(f, " {}", literal)?;
        }
        Ok(())
    }
}

/// Converts source text into a sequence of [`Token`]s.
pub struct Scanner<'a> {
    lexer: Lexer<'a, TokenType>,
    /// Source code
    source: &'a Source<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        let mut lexer = TokenType::lexer(source.content);
        lexer.extras = 1; // line numbers start at 1

        Self { lexer, source }
    }

    /// Scans the whole input. Lexical errors are reported to the [`Source`] and
    /// scanning carries on with the next character.
    /// The result always ends with exactly one [`TokenType::Eof`].
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(kind) = self.lexer.next() {
            let lexeme = self.lexer.slice();
            let line = self.lexer.extras;

            match kind {
                TokenType::Error if lexeme.starts_with('"') => {
                    self.error("Unterminated string.", line)
                }
                TokenType::Error => self.error("Unexpected character.", line),
                TokenType::NumberLit => match lexeme.parse::<f64>() {
                    Ok(val) if val.is_finite() => {
                        tokens.push(Token::new(kind, lexeme, Some(Value::Number(val)), line))
                    }
                    _ => self.error("Number literal out of range.", line),
                },
                TokenType::StringLit => {
                    let contents = &lexeme[1..lexeme.len() - 1];
                    tokens.push(Token::new(kind, lexeme, Some(Value::from(contents)), line));
                }
                _ => tokens.push(Token::new(kind, lexeme, None, line)),
            }
        }

        tokens.push(Token::eof(self.lexer.extras));
        tokens
    }

    fn error(&self, message: &str, line: usize) {
        self.source.errors.add_error(Diagnostic::lexical(message, line));
    }
}
