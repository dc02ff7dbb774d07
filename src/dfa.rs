//! Lexical automaton for the service DSL.
//!
//! The lexer runs a deterministic finite automaton over classified input
//! symbols. The transition table is pure data: built once by
//! [`transitions`], memoized in a `OnceLock`, and shared read-only by
//! every [`crate::lexer::Lexer`] instance.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::token::TokenKind;

/// A state of the lexical automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    Start,

    // Numbers
    Int,
    Float,

    // Single-character operators (each may extend to a compound form)
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Greater,
    Less,
    Bang,
    AmpStart,
    PipeStart,

    // Compound operators
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    EqEq,
    NotEq,
    GreaterEq,
    LessEq,
    AndAnd,
    OrOr,

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

    // Comments
    CommentStart,
    CommentBody,

    // String literals
    StringStart,
    StringBody,
    StringEnd,

    // Path parameters `{name}`
    PathStart,
    PathBody,
    PathEnd,

    // Identifiers and keywords
    Ident,
}

/// A classified input symbol.
///
/// Classification happens before table lookup and is what keeps the table
/// small despite the large alphabet: letters collapse to [`Sym::Letter`],
/// string and comment interiors collapse to [`Sym::Body`], digits and the
/// special-character set pass through literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sym {
    Letter,
    Body,
    Ch(char),
}

const SPECIALS: &[char] = &[
    '[', ']', '(', ')', '{', '}', ',', ';', ':', '.', '+', '-', '*', '/', '%', '>', '<', '=', '!',
    '&', '|', '"',
];

/// Classify one input character relative to the current state.
pub fn classify(state: State, c: char) -> Sym {
    // String and comment interiors swallow almost anything.
    match state {
        State::StringStart | State::StringBody => {
            return if c == '"' { Sym::Ch('"') } else { Sym::Body };
        }
        State::CommentStart | State::CommentBody => {
            return if c == '\n' { Sym::Ch('\n') } else { Sym::Body };
        }
        _ => {}
    }

    if c.is_ascii_digit() || SPECIALS.contains(&c) {
        Sym::Ch(c)
    } else if c.is_ascii_alphabetic() || c == '_' {
        Sym::Letter
    } else {
        Sym::Ch(c)
    }
}

/// The immutable transition table, built on first use and shared by all
/// lexer instances.
pub fn transitions() -> &'static FxHashMap<(State, Sym), State> {
    static TABLE: OnceLock<FxHashMap<(State, Sym), State>> = OnceLock::new();
    TABLE.get_or_init(build_transitions)
}

/// Look up the successor state, if any. No transition means the current
/// token ends.
pub fn next_state(state: State, sym: Sym) -> Option<State> {
    transitions().get(&(state, sym)).copied()
}

/// States that end the token immediately even though further transitions
/// exist in the table: a closed string literal and a closed path-parameter
/// brace. Comments end naturally because no transition consumes the newline.
pub fn ends_token(state: State) -> bool {
    matches!(state, State::StringEnd | State::PathEnd)
}

fn build_transitions() -> FxHashMap<(State, Sym), State> {
    use State::*;

    let mut t = FxHashMap::default();
    let mut add = |from: State, sym: Sym, to: State| {
        t.insert((from, sym), to);
    };

    // Numbers: digits pass through the classifier literally.
    for d in '0'..='9' {
        add(Start, Sym::Ch(d), Int);
        add(Int, Sym::Ch(d), Int);
        add(Float, Sym::Ch(d), Float);
        add(Ident, Sym::Ch(d), Ident);
        add(PathBody, Sym::Ch(d), PathBody);
    }
    add(Int, Sym::Ch('.'), Float);

    // Single-character operators
    add(Start, Sym::Ch('+'), Plus);
    add(Start, Sym::Ch('-'), Minus);
    add(Start, Sym::Ch('*'), Star);
    add(Start, Sym::Ch('/'), Slash);
    add(Start, Sym::Ch('%'), Percent);
    add(Start, Sym::Ch('='), Assign);
    add(Start, Sym::Ch('>'), Greater);
    add(Start, Sym::Ch('<'), Less);
    add(Start, Sym::Ch('!'), Bang);
    add(Start, Sym::Ch('&'), AmpStart);
    add(Start, Sym::Ch('|'), PipeStart);

    // Compound operators
    add(Plus, Sym::Ch('='), PlusAssign);
    add(Minus, Sym::Ch('='), MinusAssign);
    add(Star, Sym::Ch('='), StarAssign);
    add(Slash, Sym::Ch('='), SlashAssign);
    add(Percent, Sym::Ch('='), PercentAssign);
    add(Assign, Sym::Ch('='), EqEq);
    add(Greater, Sym::Ch('='), GreaterEq);
    add(Less, Sym::Ch('='), LessEq);
    add(Bang, Sym::Ch('='), NotEq);
    add(AmpStart, Sym::Ch('&'), AndAnd);
    add(PipeStart, Sym::Ch('|'), OrOr);

    // Delimiters
    add(Start, Sym::Ch('('), LParen);
    add(Start, Sym::Ch(')'), RParen);
    add(Start, Sym::Ch('{'), LBrace);
    add(Start, Sym::Ch('}'), RBrace);
    add(Start, Sym::Ch('['), LBracket);
    add(Start, Sym::Ch(']'), RBracket);
    add(Start, Sym::Ch(','), Comma);
    add(Start, Sym::Ch(';'), Semicolon);
    add(Start, Sym::Ch('.'), Dot);
    add(Start, Sym::Ch(':'), Colon);

    // Comments: `//` then body characters to end of line.
    add(Slash, Sym::Ch('/'), CommentStart);
    add(CommentStart, Sym::Body, CommentBody);
    add(CommentBody, Sym::Body, CommentBody);

    // Strings: body characters between double quotes.
    add(Start, Sym::Ch('"'), StringStart);
    add(StringStart, Sym::Body, StringBody);
    add(StringBody, Sym::Body, StringBody);
    add(StringBody, Sym::Ch('"'), StringEnd);

    // Path parameters: `{` followed by a word, closed by `}`.
    add(LBrace, Sym::Letter, PathStart);
    add(PathStart, Sym::Letter, PathBody);
    add(PathBody, Sym::Letter, PathBody);
    add(PathBody, Sym::Ch('}'), PathEnd);

    // Identifiers
    add(Start, Sym::Letter, Ident);
    add(Ident, Sym::Letter, Ident);

    t
}

/// Map a halting state to the kind of the collected lexeme. Halting in a
/// non-accepting state yields [`TokenKind::Invalid`]; identifiers are
/// reclassified against the keyword table afterwards by the lexer.
pub fn kind_for(state: State) -> TokenKind {
    use State::*;

    match state {
        Int => TokenKind::Integer,
        Float => TokenKind::Float,

        Plus => TokenKind::Plus,
        Minus => TokenKind::Minus,
        Star => TokenKind::Star,
        Slash => TokenKind::Slash,
        Percent => TokenKind::Percent,
        Assign => TokenKind::Assign,
        Greater => TokenKind::Greater,
        Less => TokenKind::Less,
        Bang => TokenKind::Bang,
        PlusAssign => TokenKind::PlusAssign,
        MinusAssign => TokenKind::MinusAssign,
        StarAssign => TokenKind::StarAssign,
        SlashAssign => TokenKind::SlashAssign,
        PercentAssign => TokenKind::PercentAssign,
        EqEq => TokenKind::EqEq,
        NotEq => TokenKind::NotEq,
        GreaterEq => TokenKind::GreaterEq,
        LessEq => TokenKind::LessEq,
        AndAnd => TokenKind::AndAnd,
        OrOr => TokenKind::OrOr,

        LParen => TokenKind::LParen,
        RParen => TokenKind::RParen,
        LBrace => TokenKind::LBrace,
        RBrace => TokenKind::RBrace,
        LBracket => TokenKind::LBracket,
        RBracket => TokenKind::RBracket,
        Comma => TokenKind::Comma,
        Semicolon => TokenKind::Semicolon,
        Dot => TokenKind::Dot,
        Colon => TokenKind::Colon,

        CommentBody => TokenKind::Comment,
        StringEnd => TokenKind::Str,
        PathEnd => TokenKind::PathParam,
        Ident => TokenKind::Identifier,

        // Dead ends: a lone `&` or `|`, an unopened comment, an
        // unterminated string or path parameter, or no progress at all.
        Start | AmpStart | PipeStart | CommentStart | StringStart | StringBody | PathStart
        | PathBody => TokenKind::Invalid,
    }
}

/// Keyword lookup applied to identifier lexemes after maximal munch.
pub fn keyword(lexeme: &str) -> Option<TokenKind> {
    let kind = match lexeme {
        "service" => TokenKind::Service,
        "route" => TokenKind::Route,
        "envroute" => TokenKind::Envroute,
        "GET" => TokenKind::Get,
        "POST" => TokenKind::Post,
        "PUT" => TokenKind::Put,
        "PATCH" => TokenKind::Patch,
        "DELETE" => TokenKind::Delete,
        "params" => TokenKind::Params,
        "query" => TokenKind::Query,
        "body" => TokenKind::Body,
        "status" => TokenKind::Status,
        "return" => TokenKind::Return,
        "error" => TokenKind::Error,
        "schema" => TokenKind::Schema,
        "required" => TokenKind::Required,
        "optional" => TokenKind::Optional,
        "default" => TokenKind::Default,
        "use" => TokenKind::Use,
        "before" => TokenKind::Before,
        "after" => TokenKind::After,
        "auth" => TokenKind::Auth,
        "allow" => TokenKind::Allow,
        "deny" => TokenKind::Deny,
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "var" => TokenKind::Var,
        "int" => TokenKind::Int,
        "bool" => TokenKind::Bool,
        "null" => TokenKind::Null,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "function" => TokenKind::Function,
        "class" => TokenKind::Class,
        "public" => TokenKind::Public,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "static" => TokenKind::Static,
        "void" => TokenKind::Void,
        "new" => TokenKind::New,
        "this" => TokenKind::This,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_transitions_pass_through_literally() {
        assert_eq!(next_state(State::Start, Sym::Ch('7')), Some(State::Int));
        assert_eq!(next_state(State::Int, Sym::Ch('0')), Some(State::Int));
        assert_eq!(next_state(State::Int, Sym::Ch('.')), Some(State::Float));
        assert_eq!(next_state(State::Float, Sym::Ch('5')), Some(State::Float));
        // A second dot has no transition: the float ends there.
        assert_eq!(next_state(State::Float, Sym::Ch('.')), None);
    }

    #[test]
    fn string_interior_collapses_to_body() {
        assert_eq!(classify(State::StringBody, 'x'), Sym::Body);
        assert_eq!(classify(State::StringBody, '{'), Sym::Body);
        assert_eq!(classify(State::StringBody, '"'), Sym::Ch('"'));
    }

    #[test]
    fn comment_interior_collapses_except_newline() {
        assert_eq!(classify(State::CommentBody, '!'), Sym::Body);
        assert_eq!(classify(State::CommentBody, '\n'), Sym::Ch('\n'));
        assert_eq!(next_state(State::CommentBody, Sym::Ch('\n')), None);
    }

    #[test]
    fn lone_amp_and_pipe_are_dead_ends() {
        assert_eq!(next_state(State::AmpStart, Sym::Ch('=')), None);
        assert_eq!(next_state(State::PipeStart, Sym::Letter), None);
        assert_eq!(kind_for(State::AmpStart), TokenKind::Invalid);
        assert_eq!(kind_for(State::PipeStart), TokenKind::Invalid);
    }

    #[test]
    fn path_param_needs_closing_brace() {
        assert_eq!(next_state(State::LBrace, Sym::Letter), Some(State::PathStart));
        assert_eq!(next_state(State::PathStart, Sym::Letter), Some(State::PathBody));
        assert_eq!(next_state(State::PathBody, Sym::Ch('}')), Some(State::PathEnd));
        assert!(ends_token(State::PathEnd));
        assert_eq!(kind_for(State::PathBody), TokenKind::Invalid);
    }

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(keyword("GET"), Some(TokenKind::Get));
        assert_eq!(keyword("get"), None);
        assert_eq!(keyword("service"), Some(TokenKind::Service));
        assert_eq!(keyword("Service"), None);
        assert_eq!(keyword("GETx"), None);
    }

    #[test]
    fn table_is_shared() {
        let a = transitions() as *const _;
        let b = transitions() as *const _;
        assert_eq!(a, b);
    }
}
