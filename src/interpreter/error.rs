use thiserror::Error;

/// Typed errors produced while walking a program.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Variable '{name}' is not bound in frame '{frame}' at line {line}, column {column}")]
    UnboundVariable {
        name: String,
        frame: String,
        line: usize,
        column: usize,
    },
    #[error("Division by zero in '{left} {operator} 0' at line {line}, column {column}")]
    DivisionByZero {
        left: i64,
        operator: &'static str,
        line: usize,
        column: usize,
    },
    #[error("Integer overflow in '{operation}' at line {line}, column {column}")]
    Overflow {
        operation: String,
        line: usize,
        column: usize,
    },
    #[error("Undefined procedure '{name}' at line {line}, column {column}")]
    UndefinedProcedure {
        name: String,
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
    #[error(
        "Call to '{name}' exceeds the maximum call depth of {limit} at line {line}, column {column}"
    )]
    CallDepthExceeded {
        name: String,
        limit: usize,
        line: usize,
        column: usize,
    },
    #[error("Interpreter invariant violated: {message}")]
    InvariantViolation { message: &'static str },
}

pub type EvaluationResult<T> = Result<T, EvaluationError>;
