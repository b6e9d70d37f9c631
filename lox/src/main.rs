use clap::{error::ErrorKind, Parser, ValueEnum};
use lox::{Config, Notation, RunError, Session};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Exit status for command line usage errors (`EX_USAGE`).
const EXIT_USAGE: i32 = 64;
/// Exit status for an unreadable script (`EX_NOINPUT`).
const EXIT_NO_INPUT: i32 = 66;
/// Exit status for a script that hit a runtime error (`EX_SOFTWARE`).
const EXIT_RUNTIME_ERROR: i32 = 70;

/// A tree-walking interpreter for Lox. Starts an interactive prompt when no
/// script is given.
#[derive(Parser, Debug)]
#[command(name = "lox", version, about, long_about = None)]
struct Args {
    /// Script to run.
    script: Option<PathBuf>,

    /// Print the scanned tokens before running.
    #[arg(long)]
    tokens: bool,

    /// Print every parsed statement's expression tree before running.
    #[arg(long, value_enum)]
    ast: Option<AstNotation>,

    /// Maximum height of an expression tree.
    #[arg(long, default_value_t = lox_parser::parser::DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AstNotation {
    Prefix,
    Postfix,
}

impl From<AstNotation> for Notation {
    fn from(notation: AstNotation) -> Self {
        match notation {
            AstNotation::Prefix => Notation::Prefix,
            AstNotation::Postfix => Notation::Postfix,
        }
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => {
            eprintln!("Usage: lox [script]");
            process::exit(EXIT_USAGE);
        }
    };

    let config = Config {
        max_depth: args.max_depth,
        dump_tokens: args.tokens,
        dump_ast: args.ast.map(Notation::from),
        ..Config::default()
    };
    let mut session = Session::new(config);

    match args.script {
        Some(path) => run_file(&mut session, &path),
        None => run_prompt(&mut session),
    }
}

fn report(error: &RunError) {
    for diagnostic in error.diagnostics() {
        eprintln!("{}", diagnostic);
    }
}

fn run_file(session: &mut Session, path: &Path) {
    let text = fs::read_to_string(path).unwrap_or_else(|err| {
        eprintln!("Failed to read the script '{}': {}", path.display(), err);
        process::exit(EXIT_NO_INPUT);
    });

    if let Err(error) = session.run(&text) {
        report(&error);
    }

    if session.had_runtime_error() {
        process::exit(EXIT_RUNTIME_ERROR);
    }
}

fn run_prompt(session: &mut Session) {
    let mut stdout = io::stdout();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => break, // end of input
            Ok(_) => {}
        }

        // every line is an independent program
        session.reset_errors();
        if let Err(error) = session.run(&line) {
            report(&error);
        }
    }
}
