//! Reads the output of [`crate::printer::Prefix`] back into an [`Expr`].

use super::*;

const BINARY_OPS: &[TokenType] = &[
    TokenType::BangEqual,
    TokenType::EqualEqual,
    TokenType::Greater,
    TokenType::GreaterEqual,
    TokenType::Less,
    TokenType::LessEqual,
    TokenType::Minus,
    TokenType::Plus,
    TokenType::Slash,
    TokenType::Star,
];

impl<'a> Parser<'a> {
    /// Parses one expression in prefix notation, e.g. `(* (group (+ 1 2)) (- 3))`.
    /// The whole input must be consumed. Returns `None` on a syntax error.
    pub fn parse_prefix_notation(&mut self) -> Option<Expr> {
        let expr = self.parse_prefix_expr().ok()?;
        if !self.is_at_end() {
            self.unexpected("Expect end of expression.");
            return None;
        }
        Some(expr)
    }

    fn parse_prefix_expr(&mut self) -> ParseResult<Expr> {
        self.nested(|parser| {
            if let Some(val) = parser.literal() {
                parser.next(); // eat literal
                Ok(Expr::Literal(val))
            } else if parser.eat(TokenType::LeftParen) {
                parser.parse_prefix_form()
            } else {
                Err(parser.unexpected("Expect expression."))
            }
        })
    }

    /// Parses the rest of a `( head operand operand? )` form after the `(`.
    fn parse_prefix_form(&mut self) -> ParseResult<Expr> {
        let head = self.next();

        let expr = match head.kind {
            TokenType::Identifier if head.lexeme == "group" => {
                Expr::Grouping(Box::new(self.parse_prefix_expr()?))
            }
            TokenType::Bang => Expr::Unary {
                op: head,
                arg: Box::new(self.parse_prefix_expr()?),
            },
            kind if BINARY_OPS.contains(&kind) => {
                let lhs = self.parse_prefix_expr()?;
                // `-` with a single operand is negation
                if kind == TokenType::Minus && self.check(TokenType::RightParen) {
                    Expr::Unary {
                        op: head,
                        arg: Box::new(lhs),
                    }
                } else {
                    Expr::Binary {
                        lhs: Box::new(lhs),
                        op: head,
                        rhs: Box::new(self.parse_prefix_expr()?),
                    }
                }
            }
            _ => return Err(self.error(head, "Expect operator or 'group'.")),
        };

        self.expect(TokenType::RightParen, "Expect ')' after operands.")?;
        Ok(expr)
    }
}
