use crate::error::RuntimeError;
use lox_parser::{
    ast::{Expr, Stmt},
    lexer::{Token, TokenType},
};
use lox_value::Value;
use std::io::{self, Write};

/// Default bound on evaluation depth. Counts every node on the path from the
/// root, so long operator chains count too.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

type RuntimeResult<T> = Result<T, RuntimeError>;

/// Evaluates statements and writes `print` output to `W`.
pub struct Interpreter<W = io::Stdout> {
    out: W,
    depth: usize,
    max_depth: usize,
    /// Line of the operator evaluated last. Used for errors without a token.
    line: usize,
}

impl Interpreter<io::Stdout> {
    /// Create an interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            out,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            line: 1,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes `self` and returns the output writer.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes `program` in order. The first runtime error aborts the remaining statements.
    pub fn interpret(&mut self, program: &[Stmt]) -> RuntimeResult<()> {
        for stmt in program {
            self.execute(stmt)?;
        }
        self.out.flush().map_err(|source| RuntimeError::Io {
            line: self.line,
            source,
        })
    }

    pub fn execute(&mut self, stmt: &Stmt) -> RuntimeResult<()> {
        match stmt {
            Stmt::ExprStmt(expr) => {
                self.evaluate(expr)?; // throw away result
            }
            Stmt::PrintStmt(expr) => {
                let val = self.evaluate(expr)?;
                writeln!(self.out, "{}", val).map_err(|source| RuntimeError::Io {
                    line: self.line,
                    source,
                })?;
            }
        }
        Ok(())
    }

    pub fn evaluate(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        if self.depth >= self.max_depth {
            return Err(RuntimeError::NestingTooDeep {
                line: self.line,
                limit: self.max_depth,
            });
        }

        self.depth += 1;
        let result = self.evaluate_node(expr);
        self.depth -= 1;
        result
    }

    fn evaluate_node(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match expr {
            Expr::Literal(val) => Ok(val.clone()),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { op, arg } => {
                self.line = op.line;
                let arg = self.evaluate(arg)?;
                unary(op, arg)
            }
            Expr::Binary { lhs, op, rhs } => {
                self.line = op.line;
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                binary(op, lhs, rhs)
            }
        }
    }
}

fn unary(op: &Token, arg: Value) -> RuntimeResult<Value> {
    match op.kind {
        TokenType::Minus => match arg {
            Value::Number(val) => Ok(Value::Number(-val)),
            _ => Err(RuntimeError::type_error(
                op,
                "Operand of negation must be a number.",
            )),
        },
        TokenType::Bang => match arg {
            Value::Bool(val) => Ok(Value::Bool(!val)),
            _ => Err(RuntimeError::type_error(
                op,
                "Operand of logical not must be a boolean.",
            )),
        },
        _ => Err(RuntimeError::type_error(op, "Invalid unary operator.")),
    }
}

fn binary(op: &Token, lhs: Value, rhs: Value) -> RuntimeResult<Value> {
    /// Generate evaluation of a binary operator on two numbers.
    macro_rules! num_binary_op {
        ($op: tt, $result: path, $purpose: literal) => {
            match (lhs.cast_to_number(), rhs.cast_to_number()) {
                (Some(a), Some(b)) => Ok($result(a $op b)),
                _ => Err(RuntimeError::type_error(
                    op,
                    concat!("Operands of ", $purpose, " must be numbers."),
                )),
            }
        };

        ($op: tt, $purpose: literal) => {
            num_binary_op!($op, Value::Number, $purpose)
        };
    }

    match op.kind {
        TokenType::Plus => match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
            // string concatenation, any other operand is stringified
            (Value::Str(_), _) | (_, Value::Str(_)) => Ok(Value::Str(format!("{}{}", lhs, rhs))),
            _ => Err(RuntimeError::type_error(
                op,
                "Operands of addition must be two numbers or include a string.",
            )),
        },
        TokenType::Minus => num_binary_op!(-, "subtraction"),
        TokenType::Star => num_binary_op!(*, "multiplication"),
        TokenType::Slash => num_binary_op!(/, "division"),
        TokenType::Greater => num_binary_op!(>, Value::Bool, "comparison"),
        TokenType::GreaterEqual => num_binary_op!(>=, Value::Bool, "comparison"),
        TokenType::Less => num_binary_op!(<, Value::Bool, "comparison"),
        TokenType::LessEqual => num_binary_op!(<=, Value::Bool, "comparison"),
        TokenType::EqualEqual => Ok(Value::Bool(lhs == rhs)),
        TokenType::BangEqual => Ok(Value::Bool(lhs != rhs)),
        _ => Err(RuntimeError::type_error(op, "Invalid binary operator.")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox_parser::parser::Parser;
    use lox_source::Source;

    fn eval(source: &str) -> RuntimeResult<Value> {
        let source = source.into();
        let expr = Parser::from_source(&source).parse_expression();
        assert!(source.has_no_errors(), "{}", source.errors);
        let expr = expr.expect("parse error");
        Interpreter::with_output(Vec::new()).evaluate(&expr)
    }

    fn run(source: &str) -> (String, RuntimeResult<()>) {
        let source: Source = source.into();
        let program = Parser::from_source(&source).parse_program();
        assert!(source.has_no_errors(), "{}", source.errors);

        let mut interpreter = Interpreter::with_output(Vec::new());
        let result = interpreter.interpret(&program);
        let output = String::from_utf8(interpreter.into_output()).expect("utf-8 output");
        (output, result)
    }

    fn type_error(source: &str) -> String {
        match eval(source) {
            Err(error @ RuntimeError::Type { .. }) => error.to_string(),
            other => panic!("expected type error, got {:?}", other),
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("(5 - (3 - 1)) + -1").unwrap(), Value::Number(2.0));
        assert_eq!(eval("1 + 2 * 3").unwrap(), Value::Number(7.0));
        assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Number(9.0));
        assert_eq!(eval("7 / 2").unwrap(), Value::Number(3.5));
        assert_eq!(eval("--3").unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(eval("1 / 0").unwrap(), Value::Number(f64::INFINITY));
        assert_eq!(eval("-1 / 0").unwrap(), Value::Number(f64::NEG_INFINITY));
        match eval("0 / 0").unwrap() {
            Value::Number(val) => assert!(val.is_nan()),
            other => panic!("expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_concatenation() {
        assert_eq!(eval("\"foo\" + 1").unwrap(), Value::from("foo1"));
        assert_eq!(eval("1.5 + \"foo\"").unwrap(), Value::from("1.5foo"));
        assert_eq!(eval("\"a\" + \"b\"").unwrap(), Value::from("ab"));
        assert_eq!(eval("\"is \" + nil").unwrap(), Value::from("is nil"));
        assert_eq!(eval("true + \"!\"").unwrap(), Value::from("true!"));
    }

    #[test]
    fn test_comparison() {
        assert_eq!(eval("1 < 2").unwrap(), Value::Bool(true));
        assert_eq!(eval("2 <= 2").unwrap(), Value::Bool(true));
        assert_eq!(eval("1 > 2").unwrap(), Value::Bool(false));
        assert_eq!(eval("3 >= 4").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_equality() {
        assert_eq!(eval("nil == nil").unwrap(), Value::Bool(true));
        assert_eq!(eval("1 == \"1\"").unwrap(), Value::Bool(false));
        assert_eq!(eval("nil == false").unwrap(), Value::Bool(false));
        assert_eq!(eval("nil != 0").unwrap(), Value::Bool(true));
        assert_eq!(eval("\"a\" == \"a\"").unwrap(), Value::Bool(true));
        assert_eq!(eval("1 == 1.0").unwrap(), Value::Bool(true));
        assert_eq!(eval("0 / 0 == 0 / 0").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_unary() {
        assert_eq!(eval("!true").unwrap(), Value::Bool(false));
        assert_eq!(eval("!!false").unwrap(), Value::Bool(false));
        assert_eq!(eval("-(1 + 1)").unwrap(), Value::Number(-2.0));
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(
            type_error("\"a\" - 1"),
            "[line 1] Error at '-': Operands of subtraction must be numbers."
        );
        assert_eq!(
            type_error("true + 1"),
            "[line 1] Error at '+': Operands of addition must be two numbers or include a string."
        );
        assert_eq!(
            type_error("nil * 2"),
            "[line 1] Error at '*': Operands of multiplication must be numbers."
        );
        assert_eq!(
            type_error("1 / false"),
            "[line 1] Error at '/': Operands of division must be numbers."
        );
        assert_eq!(
            type_error("\"a\" < \"b\""),
            "[line 1] Error at '<': Operands of comparison must be numbers."
        );
        assert_eq!(
            type_error("-\"a\""),
            "[line 1] Error at '-': Operand of negation must be a number."
        );
        // no truthiness
        assert_eq!(
            type_error("!nil"),
            "[line 1] Error at '!': Operand of logical not must be a boolean."
        );
    }

    #[test]
    fn test_print() {
        let (output, result) = run("print 1 + 2;\nprint \"a\" + \"b\";\nprint nil;\n1 + 1;\nprint 2.5 > 1;");
        assert!(result.is_ok());
        assert_eq!(output, "3\nab\nnil\ntrue\n");
    }

    #[test]
    fn test_error_aborts_remaining_statements() {
        let (output, result) = run("print 1;\nprint \"a\" - 1;\nprint 2;");
        assert_eq!(output, "1\n");
        match result {
            Err(RuntimeError::Type { op, .. }) => {
                assert_eq!(op.kind, TokenType::Minus);
                assert_eq!(op.line, 2);
            }
            other => panic!("expected type error, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let source: Source = "1 + 1 + 1 + 1".into();
        let expr = Parser::from_source(&source)
            .parse_expression()
            .expect("parse error");

        let mut interpreter = Interpreter::with_output(Vec::new()).with_max_depth(3);
        match interpreter.evaluate(&expr) {
            Err(RuntimeError::NestingTooDeep { limit, .. }) => assert_eq!(limit, 3),
            other => panic!("expected nesting error, got {:?}", other),
        }

        // the interpreter is still usable afterwards
        let shallow = Expr::Literal(Value::Nil);
        assert_eq!(interpreter.evaluate(&shallow).unwrap(), Value::Nil);

        let mut interpreter = Interpreter::with_output(Vec::new()).with_max_depth(4);
        assert_eq!(interpreter.evaluate(&expr).unwrap(), Value::Number(4.0));
    }
}
