//! Recursive-descent parser for the service DSL.
//!
//! Validates the token stream against the grammar and nothing else: no
//! tree is built, no types are checked. One token of lookahead, no
//! backtracking, and the first mismatch aborts the whole phase.
//!
//! ```text
//! program    := service* EOF
//! service    := 'service' IDENTIFIER '{' ('route' route)* '}'
//! route      := (STRING | IDENTIFIER
//!               | '/' (IDENTIFIER|AUTH|BODY|PARAMS|QUERY|STATUS|ERROR|RETURN))
//!               '{' methodBlock* '}'
//! methodBlock:= HTTP_METHOD '{' statement* '}'
//! statement  := 'let' IDENTIFIER '=' expression ';'
//!             | 'return' ('error' ';' | expression ';')
//!             | 'if' '(' expression ')' '{' statement* '}' ('else' '{' statement* '}')?
//! expression := term (BINOP term)*        // flat, left-associative
//! term       := IDENTIFIER|INTEGER|FLOAT|STRING|TRUE|FALSE|ERROR
//!             | '(' expression ')'
//! ```

use crate::error::AnalysisError;
use crate::token::{Token, TokenKind};

/// Binary operators accepted in the flat expression chain. There is no
/// precedence table: `a + b == c` groups left-to-right only.
pub const BINARY_OPS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::EqEq,
    TokenKind::NotEq,
    TokenKind::Greater,
    TokenKind::Less,
    TokenKind::GreaterEq,
    TokenKind::LessEq,
    TokenKind::AndAnd,
    TokenKind::OrOr,
];

/// Token kinds allowed as a route name after `/`.
pub const SLASH_ROUTE_NAMES: &[TokenKind] = &[
    TokenKind::Identifier,
    TokenKind::Auth,
    TokenKind::Body,
    TokenKind::Params,
    TokenKind::Query,
    TokenKind::Status,
    TokenKind::Error,
    TokenKind::Return,
];

pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let mut parser = Self { tokens, pos: 0 };
        parser.skip_comments();
        parser
    }

    /// Validate the whole token stream. Success carries no value; the only
    /// output of this phase is accept/reject plus the diagnostic.
    pub fn parse(&mut self) -> Result<(), AnalysisError> {
        if self.tokens.is_empty() {
            return Ok(());
        }
        while self.current().kind != TokenKind::Eof {
            self.service()?;
        }
        Ok(())
    }

    fn current(&self) -> &Token {
        // The lexer terminates every stream with EOF; clamp to it.
        let idx = self.pos.min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.skip_comments();
    }

    /// Comments stay in the raw stream for display; the grammar never
    /// sees them.
    fn skip_comments(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind == TokenKind::Comment {
            self.pos += 1;
        }
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.contains(&self.current().kind) {
            self.advance();
            return true;
        }
        false
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        self.match_any(&[kind])
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<(), AnalysisError> {
        if self.current().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn error(&self, message: &str) -> AnalysisError {
        let t = self.current();
        AnalysisError::syntax(message, t.line, t.lexeme.clone())
    }

    fn service(&mut self) -> Result<(), AnalysisError> {
        self.expect(TokenKind::Service, "Expected 'service'")?;
        self.expect(TokenKind::Identifier, "Expected service name")?;
        self.expect(TokenKind::LBrace, "Expected '{' after service name")?;

        while self.match_kind(TokenKind::Route) {
            self.route()?;
        }

        self.expect(TokenKind::RBrace, "Expected '}' at end of service")
    }

    fn route(&mut self) -> Result<(), AnalysisError> {
        if self.match_any(&[TokenKind::Str, TokenKind::Identifier]) {
            // literal or bare route name
        } else if self.match_kind(TokenKind::Slash) {
            if !self.match_any(SLASH_ROUTE_NAMES) {
                return Err(self.error("Expected route name after '/'"));
            }
        } else {
            return Err(self.error("Expected endpoint name or route"));
        }

        self.expect(TokenKind::LBrace, "Expected '{' after route")?;

        while self.current().kind.is_http_method() {
            self.advance();
            self.method_body()?;
        }

        self.expect(TokenKind::RBrace, "Expected '}' at end of route")
    }

    fn method_body(&mut self) -> Result<(), AnalysisError> {
        self.expect(TokenKind::LBrace, "Expected '{' after HTTP method")?;
        while !self.match_kind(TokenKind::RBrace) {
            self.statement()?;
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<(), AnalysisError> {
        if self.match_kind(TokenKind::Let) {
            self.variable_declaration()?;
            self.expect(TokenKind::Semicolon, "Expected ';' after declaration")
        } else if self.match_kind(TokenKind::Return) {
            if self.match_kind(TokenKind::Error) {
                return self.expect(TokenKind::Semicolon, "Expected ';' after return error");
            }
            self.expression()?;
            self.expect(TokenKind::Semicolon, "Expected ';' after return")
        } else if self.match_kind(TokenKind::If) {
            self.if_statement()
        } else {
            Err(self.error("Unrecognized statement"))
        }
    }

    fn variable_declaration(&mut self) -> Result<(), AnalysisError> {
        self.expect(TokenKind::Identifier, "Expected an identifier after 'let'")?;
        self.expect(TokenKind::Assign, "Expected '=' in assignment")?;
        self.expression()
    }

    fn if_statement(&mut self) -> Result<(), AnalysisError> {
        self.expect(TokenKind::LParen, "Expected '(' after 'if'")?;
        self.expression()?;
        self.expect(TokenKind::RParen, "Expected ')' after if condition")?;
        self.expect(TokenKind::LBrace, "Expected '{' to open if block")?;

        while !self.match_kind(TokenKind::RBrace) {
            self.statement()?;
        }

        if self.match_kind(TokenKind::Else) {
            self.expect(TokenKind::LBrace, "Expected '{' after 'else'")?;
            while !self.match_kind(TokenKind::RBrace) {
                self.statement()?;
            }
        }
        Ok(())
    }

    fn expression(&mut self) -> Result<(), AnalysisError> {
        self.term()?;
        while self.match_any(BINARY_OPS) {
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> Result<(), AnalysisError> {
        if self.match_any(&[
            TokenKind::Identifier,
            TokenKind::Integer,
            TokenKind::Float,
            TokenKind::Str,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Error,
        ]) {
            return Ok(());
        }

        if self.match_kind(TokenKind::LParen) {
            self.expression()?;
            return self.expect(TokenKind::RParen, "Expected ')' after expression");
        }

        Err(self.error("Invalid expression"))
    }
}
