//! Token types for the service DSL lexer.

use std::fmt;

/// A token produced by the lexer.
///
/// Tokens are produced once and never mutated; later phases share the
/// token list read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({}, '{}', {}:{})",
            self.kind.name(),
            self.lexeme,
            self.line,
            self.column
        )
    }
}

/// The kind of token. One closed enumeration shared by every phase, so a
/// new kind forces every consumer's `match` to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Service keywords
    Service,
    Route,
    Envroute,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Params,
    Query,
    Body,
    Status,
    Return,
    Error,
    Schema,
    Required,
    Optional,
    Default,
    Use,
    Before,
    After,
    Auth,
    Allow,
    Deny,
    Let,
    Const,

    // Traditional keywords
    If,
    Else,
    While,
    For,
    Break,
    Continue,
    Var,
    Int,
    Bool,
    Null,
    True,
    False,
    Function,
    Class,
    Public,
    Private,
    Protected,
    Static,
    Void,
    New,
    This,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    Assign,
    EqEq,
    NotEq,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    AndAnd,
    OrOr,
    Bang,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,
    Colon,

    // Literals
    Integer,
    Float,
    Str,
    Identifier,

    // Structural
    PathParam,
    Comment,
    Invalid,
    Eof,
}

impl TokenKind {
    /// Stable uppercase name, used for token printing and as the raw
    /// display category for kinds outside the collapsed groups.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Service => "SERVICE",
            TokenKind::Route => "ROUTE",
            TokenKind::Envroute => "ENVROUTE",
            TokenKind::Get => "GET",
            TokenKind::Post => "POST",
            TokenKind::Put => "PUT",
            TokenKind::Patch => "PATCH",
            TokenKind::Delete => "DELETE",
            TokenKind::Params => "PARAMS",
            TokenKind::Query => "QUERY",
            TokenKind::Body => "BODY",
            TokenKind::Status => "STATUS",
            TokenKind::Return => "RETURN",
            TokenKind::Error => "ERROR",
            TokenKind::Schema => "SCHEMA",
            TokenKind::Required => "REQUIRED",
            TokenKind::Optional => "OPTIONAL",
            TokenKind::Default => "DEFAULT",
            TokenKind::Use => "USE",
            TokenKind::Before => "BEFORE",
            TokenKind::After => "AFTER",
            TokenKind::Auth => "AUTH",
            TokenKind::Allow => "ALLOW",
            TokenKind::Deny => "DENY",
            TokenKind::Let => "LET",
            TokenKind::Const => "CONST",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Var => "VAR",
            TokenKind::Int => "INT",
            TokenKind::Bool => "BOOL",
            TokenKind::Null => "NULL",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Function => "FUNCTION",
            TokenKind::Class => "CLASS",
            TokenKind::Public => "PUBLIC",
            TokenKind::Private => "PRIVATE",
            TokenKind::Protected => "PROTECTED",
            TokenKind::Static => "STATIC",
            TokenKind::Void => "VOID",
            TokenKind::New => "NEW",
            TokenKind::This => "THIS",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::PlusAssign => "PLUS_ASSIGN",
            TokenKind::MinusAssign => "MINUS_ASSIGN",
            TokenKind::StarAssign => "STAR_ASSIGN",
            TokenKind::SlashAssign => "SLASH_ASSIGN",
            TokenKind::PercentAssign => "PERCENT_ASSIGN",
            TokenKind::Assign => "ASSIGN",
            TokenKind::EqEq => "EQUAL_EQUAL",
            TokenKind::NotEq => "NOT_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::Less => "LESS",
            TokenKind::GreaterEq => "GREATER_EQUAL",
            TokenKind::LessEq => "LESS_EQUAL",
            TokenKind::AndAnd => "AND",
            TokenKind::OrOr => "OR",
            TokenKind::Bang => "NOT",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Dot => "DOT",
            TokenKind::Colon => "COLON",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Str => "STRING",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::PathParam => "PATH_PARAM",
            TokenKind::Comment => "COMMENT",
            TokenKind::Invalid => "INVALID",
            TokenKind::Eof => "EOF",
        }
    }

    pub fn is_delimiter(&self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Dot
                | TokenKind::Colon
        )
    }

    pub fn is_http_method(&self) -> bool {
        matches!(
            self,
            TokenKind::Get
                | TokenKind::Post
                | TokenKind::Put
                | TokenKind::Patch
                | TokenKind::Delete
        )
    }

    /// Collapsed category used by the formatted token view.
    pub fn display_category(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "ID",
            TokenKind::Integer | TokenKind::Float => "NUM",
            TokenKind::Str => "LITERAL",
            TokenKind::Assign => "ASIGNACION",
            k if k.is_delimiter() => "DELIMITADOR",
            k => k.name(),
        }
    }
}

/// Render tokens in the fixed `<CATEGORY, "escaped-lexeme">` display form,
/// dropping COMMENT and EOF. Presentation only; later phases consume the
/// raw stream.
pub fn format_tokens(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !matches!(t.kind, TokenKind::Comment | TokenKind::Eof))
        .map(|t| {
            format!(
                "<{}, \"{}\">",
                t.kind.display_category(),
                escape_lexeme(&t.lexeme)
            )
        })
        .collect()
}

fn escape_lexeme(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
