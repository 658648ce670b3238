use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Integer,
    Identifier,

    // Keywords
    Program,
    Var,
    Procedure,
    Begin,
    End,
    IntegerType,
    RealType,
    IntDiv, // div

    // Operators
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Assign, // :=

    // Delimiters
    LParen, // (
    RParen, // )
    Comma,  // ,
    Dot,    // .
    Semi,   // ;
    Colon,  // :

    // Structural
    EOF,
}

/// Reserved words, keyed by their lower-case spelling.
///
/// The key doubles as the canonical lexeme of the produced token, so `BEGIN`
/// and `Begin` both lex to a `Begin` token whose lexeme is `begin`.
const KEYWORDS: [(&str, TokenKind); 8] = [
    ("program", TokenKind::Program),
    ("var", TokenKind::Var),
    ("procedure", TokenKind::Procedure),
    ("begin", TokenKind::Begin),
    ("end", TokenKind::End),
    ("integer", TokenKind::IntegerType),
    ("real", TokenKind::RealType),
    ("div", TokenKind::IntDiv),
];

pub fn keyword(word: &str) -> Option<(&'static str, TokenKind)> {
    KEYWORDS
        .iter()
        .find(|(spelling, _)| spelling.eq_ignore_ascii_case(word))
        .copied()
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Integer => "INT",
            TokenKind::Identifier => "VARIABLE",
            TokenKind::Program => "PROGRAM",
            TokenKind::Var => "VAR",
            TokenKind::Procedure => "PROCEDURE",
            TokenKind::Begin => "BEGIN",
            TokenKind::End => "END",
            TokenKind::IntegerType => "INTEGER",
            TokenKind::RealType => "REAL",
            TokenKind::IntDiv => "INT_DIV",
            TokenKind::Plus => "ADD",
            TokenKind::Minus => "SUB",
            TokenKind::Star => "MUL",
            TokenKind::Slash => "DIV",
            TokenKind::Assign => "ASSIGN",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Semi => "SEMI",
            TokenKind::Colon => "COLON",
            TokenKind::EOF => "EOF",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, lexeme: &'a str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_ignores_case() {
        assert_eq!(keyword("BeGiN"), Some(("begin", TokenKind::Begin)));
        assert_eq!(keyword("DIV"), Some(("div", TokenKind::IntDiv)));
        assert_eq!(keyword("beginning"), None);
    }

    #[test]
    fn kinds_display_grammar_names() {
        assert_eq!(TokenKind::Assign.to_string(), "ASSIGN");
        assert_eq!(TokenKind::IntDiv.to_string(), "INT_DIV");
        assert_eq!(TokenKind::Identifier.to_string(), "VARIABLE");
    }
}
