use super::*;

const EQUALITY_OPS: &[TokenType] = &[TokenType::BangEqual, TokenType::EqualEqual];
const COMPARISON_OPS: &[TokenType] = &[
    TokenType::Greater,
    TokenType::GreaterEqual,
    TokenType::Less,
    TokenType::LessEqual,
];
const TERM_OPS: &[TokenType] = &[TokenType::Minus, TokenType::Plus];
const FACTOR_OPS: &[TokenType] = &[TokenType::Slash, TokenType::Star];
const UNARY_OPS: &[TokenType] = &[TokenType::Bang, TokenType::Minus];

/// An expression and the height of its tree.
type Tree = (Expr, usize);

impl<'a> Parser<'a> {
    /* Expressions */
    /// Parses any expression.
    /// Fails with `Expression nesting too deep.` once the tree would be higher than
    /// the parser's `max_depth`, so anything returned can be walked recursively.
    pub fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_tree().map(|(expr, _)| expr)
    }

    fn parse_tree(&mut self) -> ParseResult<Tree> {
        self.nested(Self::parse_equality)
    }

    fn parse_equality(&mut self) -> ParseResult<Tree> {
        self.parse_binary_expr(EQUALITY_OPS, Self::parse_comparison)
    }

    fn parse_comparison(&mut self) -> ParseResult<Tree> {
        self.parse_binary_expr(COMPARISON_OPS, Self::parse_term)
    }

    fn parse_term(&mut self) -> ParseResult<Tree> {
        self.parse_binary_expr(TERM_OPS, Self::parse_factor)
    }

    fn parse_factor(&mut self) -> ParseResult<Tree> {
        self.parse_binary_expr(FACTOR_OPS, Self::parse_unary_expr)
    }

    /// Parses one precedence level: `operand ( op operand )*`, folded to the left.
    /// Every fold puts the tree one level deeper.
    fn parse_binary_expr(
        &mut self,
        ops: &[TokenType],
        operand: fn(&mut Self) -> ParseResult<Tree>,
    ) -> ParseResult<Tree> {
        let (mut lhs, mut height) = operand(self)?;

        while let Some(op) = self.eat_any(ops) {
            let (rhs, rhs_height) = operand(self)?;
            height = self.grow(height.max(rhs_height), &op)?;
            lhs = Expr::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }

        Ok((lhs, height))
    }

    /// Parses a prefix expression. Prefix operators nest to the right.
    fn parse_unary_expr(&mut self) -> ParseResult<Tree> {
        match self.eat_any(UNARY_OPS) {
            Some(op) => {
                let (arg, height) = self.nested(Self::parse_unary_expr)?;
                let height = self.grow(height, &op)?;
                let expr = Expr::Unary {
                    op,
                    arg: Box::new(arg),
                };
                Ok((expr, height))
            }
            None => self.parse_primary_expr(),
        }
    }

    /// Parses a primary (atom) expression: a literal or a parenthesized expression.
    fn parse_primary_expr(&mut self) -> ParseResult<Tree> {
        if let Some(val) = self.literal() {
            self.next(); // eat literal
            return Ok((Expr::Literal(val), 1));
        }

        if self.eat(TokenType::LeftParen) {
            let (inner, height) = self.parse_tree()?;
            let paren = self.expect(TokenType::RightParen, "Expect ')' after expression.")?;
            return Ok((Expr::Grouping(Box::new(inner)), self.grow(height, &paren)?));
        }

        Err(self.unexpected("Expect expression."))
    }

    /// Height of a node built around `token` whose highest child is `height` tall.
    fn grow(&self, height: usize, token: &Token) -> ParseResult<usize> {
        if height >= self.max_depth {
            return Err(self.error(token.clone(), "Expression nesting too deep."));
        }
        Ok(height + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{postfix, prefix};
    use insta::assert_snapshot;

    fn expr(source: &str) -> Expr {
        let source = source.into();
        let ast = Parser::from_source(&source).parse_expr();
        assert!(source.has_no_errors(), "{}", source.errors);
        ast.expect("parse error")
    }

    fn error(source: &str) -> String {
        let source = source.into();
        let ast = Parser::from_source(&source).parse_expr();
        assert!(ast.is_err());
        source.errors.to_string().trim_end().to_string()
    }

    #[test]
    fn test_literal() {
        assert_eq!(expr("true"), Expr::Literal(Value::Bool(true)));
        assert_eq!(expr("false"), Expr::Literal(Value::Bool(false)));
        assert_eq!(expr("nil"), Expr::Literal(Value::Nil));
        assert_eq!(expr("1"), Expr::Literal(Value::Number(1.0)));
        assert_eq!(expr("2.5"), Expr::Literal(Value::Number(2.5)));
        assert_eq!(expr("\"foo\""), Expr::Literal(Value::from("foo")));
    }

    #[test]
    fn test_binary_expr() {
        assert_snapshot!(prefix(&expr("1 + 2 * 3")), @"(+ 1 (* 2 3))");
        assert_snapshot!(postfix(&expr("1 + 2 * 3")), @"1 2 3 * +");
        assert_snapshot!(prefix(&expr("1 == 2 - 1")), @"(== 1 (- 2 1))");
        assert_snapshot!(prefix(&expr("1 < 2 == 3 >= 4")), @"(== (< 1 2) (>= 3 4))");
        assert_snapshot!(prefix(&expr("6 / 3 - 1")), @"(- (/ 6 3) 1)");
    }

    #[test]
    fn test_associativity() {
        // should be (2 * 2) * 2
        assert_snapshot!(prefix(&expr("2 * 2 * 2")), @"(* (* 2 2) 2)");
        assert_snapshot!(prefix(&expr("1 - 2 - 3")), @"(- (- 1 2) 3)");
        assert_snapshot!(prefix(&expr("1 != 2 == true")), @"(== (!= 1 2) true)");
    }

    #[test]
    fn test_unary_expr() {
        assert_snapshot!(prefix(&expr("-1")), @"(- 1)");
        assert_snapshot!(prefix(&expr("!!true")), @"(! (! true))");
        assert_snapshot!(prefix(&expr("-2 * -3")), @"(* (- 2) (- 3))");
        assert_snapshot!(postfix(&expr("-2 * -3")), @"2 - 3 - *");
    }

    #[test]
    fn test_grouping() {
        assert_snapshot!(prefix(&expr("(1 + 2) * 3")), @"(* (group (+ 1 2)) 3)");
        assert_snapshot!(postfix(&expr("(1 + 2) * 3")), @"1 2 + 3 *");
        assert_snapshot!(prefix(&expr("((nil))")), @"(group (group nil))");
    }

    #[test]
    fn test_operator_tokens() {
        match expr("1 +\n 2") {
            Expr::Binary { op, .. } => {
                assert_eq!(op.kind, TokenType::Plus);
                assert_eq!(op.lexeme, "+");
                assert_eq!(op.line, 1);
            }
            other => panic!("expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_errors() {
        assert_snapshot!(error("(1 + 2"), @"[line 1] Error at end: Expect ')' after expression.");
        assert_snapshot!(error("1 + *"), @"[line 1] Error at '*': Expect expression.");
        assert_snapshot!(error("\n)"), @"[line 2] Error at ')': Expect expression.");
    }

    fn sum(terms: usize) -> String {
        vec!["1"; terms].join(" + ")
    }

    #[test]
    fn test_operator_chain_depth() {
        // n terms fold into a tree n levels high
        assert!(matches!(expr(&sum(DEFAULT_MAX_DEPTH)), Expr::Binary { .. }));
        assert_snapshot!(
            error(&sum(DEFAULT_MAX_DEPTH + 1)),
            @"[line 1] Error at '+': Expression nesting too deep."
        );
        assert_snapshot!(
            error(&format!("({})", sum(DEFAULT_MAX_DEPTH))),
            @"[line 1] Error at ')': Expression nesting too deep."
        );

        let source: Source = "1 + 2 * -3".into();
        let mut parser = Parser::from_source(&source).with_max_depth(3);
        assert!(parser.parse_expr().is_err());
        let source: Source = "1 + 2 * 3".into();
        let mut parser = Parser::from_source(&source).with_max_depth(3);
        assert!(parser.parse_expr().is_ok());
    }

    #[test]
    fn test_very_long_chain_is_rejected() {
        let program = format!("{};", sum(300_000));
        let source: Source = program.as_str().into();
        let program = Parser::from_source(&source).parse_program();
        assert!(program.is_empty());
        assert_eq!(source.errors.len(), 1);
    }
}
