//! Error types for the analysis phases.
//!
//! Lexical anomalies never surface here: the lexer represents them as
//! `INVALID` tokens and lets later phases reject them. Each analysis phase
//! halts at its first error; the caller decides whether to run the next
//! phase anyway.

use std::fmt;

/// An error raised by the parser or the semantic analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisError {
    pub kind: ErrorKind,
    pub line: usize,
    pub message: String,
    /// The offending lexeme, when one exists. Rule violations such as a
    /// duplicate route carry no lexeme.
    pub found: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Semantic,
}

impl AnalysisError {
    pub fn syntax(message: impl Into<String>, line: usize, found: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Syntax,
            line,
            message: message.into(),
            found: Some(found.into()),
        }
    }

    pub fn semantic(message: impl Into<String>, line: usize, found: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Semantic,
            line,
            message: message.into(),
            found: Some(found.into()),
        }
    }

    /// A semantic rule violation with no offending lexeme to show.
    pub fn semantic_rule(message: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ErrorKind::Semantic,
            line,
            message: message.into(),
            found: None,
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, &self.found) {
            (ErrorKind::Syntax, Some(found)) => write!(
                f,
                "Syntax error at line {}: {}. Found '{}'",
                self.line, self.message, found
            ),
            (ErrorKind::Syntax, None) => {
                write!(f, "Syntax error at line {}: {}", self.line, self.message)
            }
            (ErrorKind::Semantic, Some(found)) => write!(
                f,
                "[Semantic] Line {}: {}. Found '{}'",
                self.line, self.message, found
            ),
            (ErrorKind::Semantic, None) => {
                write!(f, "[Semantic] Line {}: {}", self.line, self.message)
            }
        }
    }
}

impl std::error::Error for AnalysisError {}
