use super::*;

impl<'a> Parser<'a> {
    /// Parses a statement.
    pub fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        if self.eat(TokenType::Print) {
            self.parse_print_stmt()
        } else {
            // expression statement
            let expr = self.parse_expr()?;
            self.expect(TokenType::Semicolon, "Expect ';' after expression.")?;
            Ok(Stmt::ExprStmt(expr))
        }
    }

    fn parse_print_stmt(&mut self) -> ParseResult<Stmt> {
        let expr = self.parse_expr()?;
        self.expect(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::PrintStmt(expr))
    }
}
