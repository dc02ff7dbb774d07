//! Semantic analysis for the service DSL.
//!
//! A second recursive descent over the same token list the parser
//! validated, structurally identical to [`crate::parser::Parser`], that
//! additionally binds `let` targets into a per-method-body symbol table,
//! resolves identifier references, infers a type for every expression
//! bottom-up, and rejects duplicate routes within a service. No type is
//! ever user-declared; everything is synthesized from literals and
//! identifier history.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::AnalysisError;
use crate::parser::{BINARY_OPS, SLASH_ROUTE_NAMES};
use crate::token::{Token, TokenKind};

/// The inferred type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Int,
    Float,
    Str,
    Bool,
    Error,
}

impl Type {
    fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Str => "string",
            Type::Bool => "bool",
            Type::Error => "error",
        };
        f.write_str(name)
    }
}

pub struct SemanticAnalyzer<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Index of the most recently consumed token; comments are skipped
    /// on advance, so `pos - 1` may point at one.
    last: usize,
    /// Identifier bindings for the method body currently being analyzed.
    /// Replaced wholesale at each method body; if/else blocks share it.
    symbols: FxHashMap<String, Type>,
    /// Route representations seen in the current service.
    routes_seen: FxHashSet<String>,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        let mut analyzer = Self {
            tokens,
            pos: 0,
            last: 0,
            symbols: FxHashMap::default(),
            routes_seen: FxHashSet::default(),
        };
        analyzer.skip_comments();
        analyzer
    }

    pub fn analyze(&mut self) -> Result<(), AnalysisError> {
        if self.tokens.is_empty() {
            return Ok(());
        }
        while self.current().kind != TokenKind::Eof {
            self.service()?;
        }
        Ok(())
    }

    fn current(&self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    fn prev(&self) -> &Token {
        &self.tokens[self.last]
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.last = self.pos;
            self.pos += 1;
        }
        self.skip_comments();
    }

    /// Comments stay in the raw stream for display; this traversal never
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
        AnalysisError::semantic(message, t.line, t.lexeme.clone())
    }

    fn service(&mut self) -> Result<(), AnalysisError> {
        self.expect(TokenKind::Service, "Expected 'service'")?;
        self.expect(TokenKind::Identifier, "Expected service name")?;
        self.expect(TokenKind::LBrace, "Expected '{' after service name")?;

        self.routes_seen.clear();

        while self.match_kind(TokenKind::Route) {
            self.route()?;
        }

        self.expect(TokenKind::RBrace, "Expected '}' at end of service")
    }

    fn route(&mut self) -> Result<(), AnalysisError> {
        let representation = if self.match_any(&[TokenKind::Str, TokenKind::Identifier]) {
            self.prev().lexeme.clone()
        } else if self.match_kind(TokenKind::Slash) {
            if !self.match_any(SLASH_ROUTE_NAMES) {
                return Err(self.error("Expected route name after '/'"));
            }
            format!("/{}", self.prev().lexeme)
        } else {
            return Err(self.error("Expected endpoint name or route"));
        };

        if !self.routes_seen.insert(representation.clone()) {
            return Err(AnalysisError::semantic_rule(
                format!("Duplicate route '{representation}'"),
                self.current().line,
            ));
        }

        self.expect(TokenKind::LBrace, "Expected '{' after route")?;

        while self.current().kind.is_http_method() {
            self.method_body()?;
        }

        self.expect(TokenKind::RBrace, "Expected '}' at end of route")
    }

    fn method_body(&mut self) -> Result<(), AnalysisError> {
        if !self.current().kind.is_http_method() {
            return Err(AnalysisError::semantic_rule(
                "Expected an HTTP method",
                self.current().line,
            ));
        }
        self.advance();

        // Fresh scope for each method body.
        self.symbols = FxHashMap::default();

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
        let id = self.prev().clone();

        if self.symbols.contains_key(&id.lexeme) {
            return Err(AnalysisError::semantic_rule(
                format!("Variable '{}' already declared in this scope", id.lexeme),
                id.line,
            ));
        }

        self.expect(TokenKind::Assign, "Expected '=' in assignment")?;
        let ty = self.expression()?;
        self.symbols.insert(id.lexeme, ty);
        Ok(())
    }

    fn if_statement(&mut self) -> Result<(), AnalysisError> {
        self.expect(TokenKind::LParen, "Expected '(' after 'if'")?;
        let condition = self.expression()?;

        if condition != Type::Bool {
            return Err(AnalysisError::semantic_rule(
                format!("If condition must be boolean (got '{condition}')"),
                self.current().line,
            ));
        }

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

    fn expression(&mut self) -> Result<Type, AnalysisError> {
        let mut left = self.term()?;

        while self.match_any(BINARY_OPS) {
            let op = self.prev().clone();
            let right = self.term()?;
            left = combine_types(left, right, &op)?;
        }

        Ok(left)
    }

    fn term(&mut self) -> Result<Type, AnalysisError> {
        if self.match_kind(TokenKind::Integer) {
            return Ok(Type::Int);
        }
        if self.match_kind(TokenKind::Float) {
            return Ok(Type::Float);
        }
        if self.match_kind(TokenKind::Str) {
            return Ok(Type::Str);
        }
        if self.match_any(&[TokenKind::True, TokenKind::False]) {
            return Ok(Type::Bool);
        }
        if self.match_kind(TokenKind::Error) {
            return Ok(Type::Error);
        }

        if self.match_kind(TokenKind::Identifier) {
            let id = self.prev();
            return match self.symbols.get(&id.lexeme) {
                Some(ty) => Ok(*ty),
                None => Err(AnalysisError::semantic_rule(
                    format!("Variable '{}' not declared in this scope", id.lexeme),
                    id.line,
                )),
            };
        }

        if self.match_kind(TokenKind::LParen) {
            let inner = self.expression()?;
            self.expect(TokenKind::RParen, "Expected ')' after expression")?;
            return Ok(inner);
        }

        Err(self.error("Invalid expression"))
    }
}

/// Synthesize the result type of `left op right`, or reject the
/// combination. Comparison operators are checked before everything else,
/// so `==` on two strings is a comparison, not arithmetic.
pub fn combine_types(left: Type, right: Type, op: &Token) -> Result<Type, AnalysisError> {
    match op.kind {
        TokenKind::EqEq
        | TokenKind::NotEq
        | TokenKind::Greater
        | TokenKind::Less
        | TokenKind::GreaterEq
        | TokenKind::LessEq => {
            // Identical types always compare; int and float mix freely.
            if left == right || (left.is_numeric() && right.is_numeric()) {
                return Ok(Type::Bool);
            }
            Err(AnalysisError::semantic_rule(
                format!(
                    "Invalid comparison '{}' between '{left}' and '{right}'",
                    op.lexeme
                ),
                op.line,
            ))
        }

        TokenKind::AndAnd | TokenKind::OrOr => {
            if left != Type::Bool || right != Type::Bool {
                return Err(AnalysisError::semantic_rule(
                    format!(
                        "Logical operation '{}' requires boolean operands. Got: '{left}' and '{right}'",
                        op.lexeme
                    ),
                    op.line,
                ));
            }
            Ok(Type::Bool)
        }

        TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent => {
            if op.kind == TokenKind::Plus && left == Type::Str && right == Type::Str {
                return Ok(Type::Str);
            }
            if left.is_numeric() && right.is_numeric() {
                let result = if left == Type::Float || right == Type::Float {
                    Type::Float
                } else {
                    Type::Int
                };
                return Ok(result);
            }
            Err(AnalysisError::semantic_rule(
                format!("Invalid arithmetic operation between '{left}' and '{right}'"),
                op.line,
            ))
        }

        _ => Err(AnalysisError::semantic_rule(
            format!("Operator '{}' not supported", op.lexeme),
            op.line,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn analyze(source: &str) -> Result<(), AnalysisError> {
        let tokens = Lexer::new(source).tokenize();
        SemanticAnalyzer::new(&tokens).analyze()
    }

    #[test]
    fn analyze_valid_program() {
        let src = "service api {
            route /users {
                GET {
                    let x = 1;
                    let name = \"bob\";
                    if (x > 0) { return name; } else { return error; }
                }
            }
        }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn analyze_is_comment_transparent() {
        let src = "// header
        service s { // service body
            route /a {
                GET { // handler
                    let x = 1 + // addend
                        2;
                    return x; // done
                }
            }
        }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn route_name_survives_trailing_comment() {
        // prev() must still see the route token, not the comment after it.
        let src = "service s { route /a // first\n { } route /a { } }";
        let err = analyze(src).unwrap_err();
        assert!(err.to_string().contains("Duplicate route '/a'"));
    }

    #[test]
    fn analyze_rejects_duplicate_route() {
        let src = "service s { route /a { GET { let x = 1; return x; } } route /a { GET {} } }";
        let err = analyze(src).unwrap_err();
        assert!(err.to_string().contains("Duplicate route '/a'"));
    }

    #[test]
    fn route_set_is_cleared_between_services() {
        let src = "service a { route /x { } } service b { route /x { } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn slash_route_and_bare_name_are_distinct() {
        let src = "service s { route /a { } route a { } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn analyze_rejects_redeclaration_in_one_body() {
        let src = "service s { route /a { GET { let x = 1; let x = 2; } } }";
        let err = analyze(src).unwrap_err();
        assert!(err
            .to_string()
            .contains("Variable 'x' already declared in this scope"));
    }

    #[test]
    fn scope_is_fresh_per_method_body() {
        let src = "service s { route /a { GET { let x = 1; } POST { let x = 2; } } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn analyze_rejects_undeclared_identifier() {
        let src = "service s { route /a { GET { return y; } } }";
        let err = analyze(src).unwrap_err();
        assert!(err
            .to_string()
            .contains("Variable 'y' not declared in this scope"));
    }

    #[test]
    fn declarations_do_not_leak_across_bodies() {
        let src = "service s { route /a { GET { let x = 1; } POST { return x; } } }";
        let err = analyze(src).unwrap_err();
        assert!(err.to_string().contains("not declared"));
    }

    #[test]
    fn analyze_rejects_non_bool_if_condition() {
        let src = "service s { route /a { GET { if (1 + 2) { } } } }";
        let err = analyze(src).unwrap_err();
        assert!(err
            .to_string()
            .contains("If condition must be boolean (got 'int')"));
    }

    #[test]
    fn string_concatenation_synthesizes_string() {
        let src = "service s { route /a { GET { let x = \"a\" + \"b\"; return x; } } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn mixed_numeric_addition_synthesizes_float() {
        // float contagion: int + float compares equal to a float afterwards
        let src = "service s { route /a { GET { let x = 1 + 2.0; if (x == 0.0) { } } } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn int_plus_string_is_rejected() {
        let src = "service s { route /a { GET { let x = 1 + \"a\"; } } }";
        let err = analyze(src).unwrap_err();
        assert!(err.to_string().contains("Invalid arithmetic operation"));
    }

    #[test]
    fn logical_operators_require_bool() {
        let src = "service s { route /a { GET { let x = 1 && true; } } }";
        let err = analyze(src).unwrap_err();
        assert!(err.to_string().contains("requires boolean operands"));
    }

    #[test]
    fn comparison_mixes_int_and_float() {
        let src = "service s { route /a { GET { if (1 < 2.5) { } } } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn comparison_of_incompatible_types_is_rejected() {
        let src = "service s { route /a { GET { if (1 == \"a\") { } } } }";
        let err = analyze(src).unwrap_err();
        assert!(err.to_string().contains("Invalid comparison '=='"));
    }

    #[test]
    fn identifier_types_flow_through_expressions() {
        let src = "service s { route /a { GET {
            let n = 2;
            let m = n + 3;
            if (m > n) { return m; }
        } } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn return_error_needs_no_type_check() {
        let src = "service s { route /a { DELETE { return error; } } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn parenthesized_expression_keeps_inner_type() {
        let src = "service s { route /a { GET { if ((1 + 2) == 3) { } } } }";
        assert!(analyze(src).is_ok());
    }

    #[test]
    fn unsupported_operator_is_rejected() {
        let op = Token::new(TokenKind::Assign, "=", 1, 1);
        let err = combine_types(Type::Int, Type::Int, &op).unwrap_err();
        assert!(err.to_string().contains("Operator '=' not supported"));
    }

    #[test]
    fn multiplicative_operators_follow_float_contagion() {
        let op = Token::new(TokenKind::Star, "*", 1, 1);
        assert_eq!(combine_types(Type::Int, Type::Float, &op).unwrap(), Type::Float);
        assert_eq!(combine_types(Type::Int, Type::Int, &op).unwrap(), Type::Int);
        let pct = Token::new(TokenKind::Percent, "%", 1, 1);
        assert!(combine_types(Type::Str, Type::Int, &pct).is_err());
    }

    #[test]
    fn left_to_right_chain_without_precedence() {
        // (1 + 2) == 3 synthesizes bool, then `&& true` is legal.
        let src = "service s { route /a { GET { let x = 1 + 2 == 3 && true; } } }";
        assert!(analyze(src).is_ok());
    }
}
