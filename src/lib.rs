//! servlang — compiler front end for a small HTTP service description DSL.
//!
//! Source text goes through three independent stages: lexical analysis
//! (characters → token list via a DFA), syntactic analysis (recursive
//! descent over the token list, accept/reject only) and semantic analysis
//! (a second descent with a scoped symbol table and type inference). The
//! token list is produced once and shared read-only; each later phase
//! traverses it on its own and halts at its first error.

pub mod dfa;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantics;
pub mod token;

pub use error::{AnalysisError, ErrorKind};
pub use lexer::Lexer;
pub use parser::Parser;
pub use semantics::{SemanticAnalyzer, Type};
pub use token::{format_tokens, Token, TokenKind};

/// The analysis pipeline.
///
/// Lexes once, then feeds the same token list to the parser and the
/// semantic analyzer.
pub struct Frontend;

impl Frontend {
    /// Lex source text into a token list ending in one EOF token. Never
    /// fails; lexical anomalies come back as `INVALID` tokens.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize()
    }

    /// Grammar check only.
    pub fn check_syntax(tokens: &[Token]) -> Result<(), AnalysisError> {
        Parser::new(tokens).parse()
    }

    /// Scoping, route uniqueness and type check.
    pub fn check_semantics(tokens: &[Token]) -> Result<(), AnalysisError> {
        SemanticAnalyzer::new(tokens).analyze()
    }

    /// Run every phase. A failure in one phase does not suppress the next,
    /// so the caller sees lexical, syntactic and semantic results in a
    /// single pass; the semantic phase may re-report a structural error
    /// the parser already found.
    pub fn run(source: &str) -> FrontendReport {
        let tokens = Self::tokenize(source);
        let syntax = Self::check_syntax(&tokens);
        let semantics = Self::check_semantics(&tokens);
        FrontendReport {
            tokens,
            syntax,
            semantics,
        }
    }
}

/// Per-phase results of one [`Frontend::run`] invocation.
#[derive(Debug)]
pub struct FrontendReport {
    pub tokens: Vec<Token>,
    pub syntax: Result<(), AnalysisError>,
    pub semantics: Result<(), AnalysisError>,
}

impl FrontendReport {
    pub fn is_clean(&self) -> bool {
        self.syntax.is_ok() && self.semantics.is_ok()
    }

    /// Whether the lexer emitted any `INVALID` token.
    pub fn has_lexical_anomalies(&self) -> bool {
        self.tokens.iter().any(|t| t.kind == TokenKind::Invalid)
    }
}
