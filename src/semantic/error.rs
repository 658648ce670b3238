use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Undeclared identifier '{name}' at line {line}, column {column}")]
    UndeclaredIdentifier {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("Duplicate identifier '{name}' at line {line}, column {column}")]
    DuplicateIdentifier {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("Duplicate procedure '{name}' at line {line}, column {column}")]
    DuplicateProcedure {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("'{name}' is not a procedure at line {line}, column {column}")]
    NotAProcedure {
        name: String,
        line: usize,
        column: usize,
    },
    #[error("'{name}' is a {kind}, not a variable, at line {line}, column {column}")]
    NotAVariable {
        name: String,
        kind: &'static str,
        line: usize,
        column: usize,
    },
    #[error(
        "Procedure '{name}' expected {expected} arguments, got {found} at line {line}, column {column}"
    )]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
        column: usize,
    },
}

pub type SemanticResult<T> = Result<T, SemanticError>;
