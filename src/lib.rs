//! Lexer, parser, semantic analyzer and tree-walking interpreter for a small
//! Pascal subset.
//!
//! The stages can be used one by one (`parser::parse`, `semantic::analyze`,
//! `interpreter::evaluate`) or all at once through [`run_source`].

use thiserror::Error;

pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod semantic;
pub mod token;

use ast::Program;
use interpreter::{Bindings, EvaluationError, Interpreter, InterpreterConfig};
use lexer::LexError;
use parser::ParseError;
use semantic::{SemanticError, SymbolTable};

/// Pipeline stage an [`Error`] was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Semantic,
    Evaluation,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Lexer error: {0}")]
    Lex(LexError),
    #[error("Parser error: {0}")]
    Parse(ParseError),
    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),
    #[error("Evaluation error: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl Error {
    pub fn stage(&self) -> Stage {
        match self {
            Error::Lex(_) => Stage::Lex,
            Error::Parse(_) => Stage::Parse,
            Error::Semantic(_) => Stage::Semantic,
            Error::Evaluation(_) => Stage::Evaluation,
        }
    }
}

impl From<LexError> for Error {
    fn from(error: LexError) -> Self {
        Error::Lex(error)
    }
}

impl From<ParseError> for Error {
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::Lex(error) => Error::Lex(error),
            other => Error::Parse(other),
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct Run {
    pub program: Program,
    pub symbols: SymbolTable,
    pub bindings: Bindings,
}

/// Parses, analyzes and evaluates `source`, stopping at the first error.
///
/// Evaluation only starts once semantic analysis has succeeded.
pub fn run_source(source: &str, config: InterpreterConfig) -> Result<Run, Error> {
    let program = parser::parse(source)?;
    let symbols = semantic::analyze(&program)?;
    let bindings = Interpreter::with_config(config).evaluate(&program)?;
    Ok(Run {
        program,
        symbols,
        bindings,
    })
}
