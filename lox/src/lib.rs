//! Runs Lox source text through the scanner, parser and interpreter.

use lox_interp::{interpreter, Interpreter, RuntimeError};
use lox_parser::{
    ast::Stmt,
    lexer::{Scanner, Token},
    parser::{self, Parser},
    printer::{Postfix, Prefix},
};
use lox_source::{Diagnostic, Source};
use std::{error, fmt, io};

/// Tree notation used by [`Session::dump_ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Prefix,
    Postfix,
}

/// Options for a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum height of an expression tree accepted by the parser.
    pub max_depth: usize,
    /// Maximum evaluation depth of the interpreter. Never below `max_depth`.
    pub max_eval_depth: usize,
    /// Print the scanned tokens before parsing.
    pub dump_tokens: bool,
    /// Print every parsed statement before running it.
    pub dump_ast: Option<Notation>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: parser::DEFAULT_MAX_DEPTH,
            max_eval_depth: interpreter::DEFAULT_MAX_DEPTH,
            dump_tokens: false,
            dump_ast: None,
        }
    }
}

/// Why a unit of input did not run to completion.
#[derive(Debug)]
pub enum RunError {
    /// Lexical or syntax errors, in the order they were found. Nothing was executed.
    Syntax(Vec<Diagnostic>),
    /// Execution stopped at a runtime error.
    Runtime(RuntimeError),
}

impl RunError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            RunError::Syntax(diagnostics) => diagnostics.clone(),
            RunError::Runtime(error) => vec![error.to_diagnostic()],
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

impl error::Error for RunError {}

/// State shared by every unit of input a driver runs: the interpreter and the
/// error flags used to pick an exit status. The driver decides when to reset them.
pub struct Session<W = io::Stdout> {
    config: Config,
    interpreter: Interpreter<W>,
    had_syntax_error: bool,
    had_runtime_error: bool,
}

impl Session<io::Stdout> {
    /// Create a session printing to stdout.
    pub fn new(config: Config) -> Self {
        Self::with_output(config, io::stdout())
    }
}

impl<W: io::Write> Session<W> {
    pub fn with_output(config: Config, out: W) -> Self {
        // every tree the parser accepts must be evaluable
        let eval_depth = config.max_eval_depth.max(config.max_depth);
        let interpreter = Interpreter::with_output(out).with_max_depth(eval_depth);
        Self {
            config,
            interpreter,
            had_syntax_error: false,
            had_runtime_error: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn had_syntax_error(&self) -> bool {
        self.had_syntax_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clears both error flags.
    pub fn reset_errors(&mut self) {
        self.had_syntax_error = false;
        self.had_runtime_error = false;
    }

    pub fn output(&self) -> &W {
        self.interpreter.output()
    }

    /// Consumes `self` and returns the output writer.
    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Scans and parses `text` as a complete program.
    /// The program is only returned if no lexical or syntax error was found.
    pub fn parse(&mut self, text: &str) -> Result<Vec<Stmt>, RunError> {
        let source = Source::new(text);
        let tokens = Scanner::new(&source).scan_tokens();
        if self.config.dump_tokens {
            dump_tokens(&tokens);
        }

        let program = Parser::new(tokens, &source)
            .with_max_depth(self.config.max_depth)
            .parse_program();

        if source.has_no_errors() {
            if let Some(notation) = self.config.dump_ast {
                dump_ast(&program, notation);
            }
            Ok(program)
        } else {
            self.had_syntax_error = true;
            Err(RunError::Syntax(source.errors.into_errors()))
        }
    }

    /// Executes a parsed program. A runtime error aborts the remaining statements.
    pub fn execute(&mut self, program: &[Stmt]) -> Result<(), RunError> {
        self.interpreter.interpret(program).map_err(|error| {
            self.had_runtime_error = true;
            RunError::Runtime(error)
        })
    }

    /// Runs `text` as one complete program.
    pub fn run(&mut self, text: &str) -> Result<(), RunError> {
        let program = self.parse(text)?;
        self.execute(&program)
    }
}

fn dump_tokens(tokens: &[Token]) {
    use console::style;

    eprintln!("{}", style("== tokens ==").bold());
    for token in tokens {
        eprintln!("{:>4} {}", style(token.line).dim(), token);
    }
}

fn dump_ast(program: &[Stmt], notation: Notation) {
    use console::style;

    eprintln!("{}", style("== ast ==").bold());
    for stmt in program {
        let kind = match stmt {
            Stmt::ExprStmt(_) => "expr",
            Stmt::PrintStmt(_) => "print",
        };
        let tree = match notation {
            Notation::Prefix => Prefix(stmt.expr()).to_string(),
            Notation::Postfix => Postfix(stmt.expr()).to_string(),
        };
        eprintln!("{:<5} {}", style(kind).cyan(), tree);
    }
}
