use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unexpected character '{character}' at line {line}, column {column}")]
    UnexpectedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
    #[error("Unterminated comment starting at line {line}, column {column}")]
    UnterminatedComment { line: usize, column: usize },
}

pub type LexResult<T> = Result<T, LexError>;
