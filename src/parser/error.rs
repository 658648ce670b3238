use thiserror::Error;

use crate::lexer::LexError;
use crate::token::{Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Expected {expected}, got {found} '{lexeme}' at line {line}, column {column}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
    },
    #[error("Expected an expression, got {found} '{lexeme}' at line {line}, column {column}")]
    InvalidFactor {
        found: TokenKind,
        lexeme: String,
        line: usize,
        column: usize,
    },
    #[error("Missing 'END' before end of input at line {line}, column {column}")]
    MissingEnd { line: usize, column: usize },
    #[error("Invalid integer literal '{literal}' at line {line}, column {column}")]
    InvalidIntegerLiteral {
        literal: String,
        line: usize,
        column: usize,
    },
    #[error("Nesting deeper than {limit} levels at line {line}, column {column}")]
    NestingTooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    pub(super) fn unexpected(expected: TokenKind, token: &Token<'_>) -> Self {
        ParseError::UnexpectedToken {
            expected,
            found: token.kind,
            lexeme: token.lexeme.to_string(),
            line: token.span.line,
            column: token.span.column,
        }
    }

    pub(super) fn invalid_factor(token: &Token<'_>) -> Self {
        ParseError::InvalidFactor {
            found: token.kind,
            lexeme: token.lexeme.to_string(),
            line: token.span.line,
            column: token.span.column,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
