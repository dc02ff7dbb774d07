//! Lexer for the service DSL.
//!
//! Converts source text into a stream of [`Token`]s by running the
//! automaton in [`crate::dfa`] from each token start until no transition
//! exists. Lexing never fails: input that strands the automaton in a
//! non-accepting state becomes an `INVALID` token and scanning resumes at
//! the position already consumed, so later phases see every character
//! exactly once.

use crate::dfa::{self, State};
use crate::token::{Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Produce the full token list, terminated by exactly one EOF token.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            let c = self.peek();
            if c.is_whitespace() {
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                } else {
                    self.column += 1;
                }
                self.pos += 1;
                continue;
            }
            tokens.push(self.next_token());
        }

        tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
        tokens
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn consume(&mut self) -> char {
        let c = self.chars[self.pos];
        self.pos += 1;
        self.column += 1;
        c
    }

    /// Run the automaton greedily from `Start`; the collected lexeme is
    /// maximal, and the halting state decides the token kind.
    fn next_token(&mut self) -> Token {
        let start_line = self.line;
        let start_column = self.column;
        let mut state = State::Start;
        let mut lexeme = String::new();

        while !self.is_at_end() {
            let c = self.peek();
            let sym = dfa::classify(state, c);
            match dfa::next_state(state, sym) {
                Some(next) => {
                    state = next;
                    lexeme.push(self.consume());
                }
                None => break,
            }
            if dfa::ends_token(state) {
                break;
            }
        }

        if lexeme.is_empty() {
            // No transition out of Start for this character: emit it as a
            // one-character INVALID token so scanning makes progress.
            let c = self.consume();
            return Token::new(TokenKind::Invalid, c.to_string(), start_line, start_column);
        }

        let kind = match dfa::kind_for(state) {
            TokenKind::Identifier => dfa::keyword(&lexeme).unwrap_or(TokenKind::Identifier),
            kind => kind,
        };
        Token::new(kind, lexeme, start_line, start_column)
    }
}
