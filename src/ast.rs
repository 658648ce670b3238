//! Syntax tree shared by the semantic analyzer, the interpreter and the
//! printer.
//!
//! The parser builds these nodes once; every later pass walks them by shared
//! reference and never mutates them. Each node owns its children outright.

use std::fmt;

use crate::token::Span;

#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub name: String,
    pub span: Span,
    pub block: Block,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub declarations: Vec<VarDecl>,
    pub procedures: Vec<ProcedureDecl>,
    pub body: Compound,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ProcedureDecl {
    pub name: String,
    pub span: Span,
    pub params: Vec<ParamDecl>,
    pub block: Block,
}

#[derive(Debug, PartialEq, Clone)]
pub struct VarDecl {
    pub variable: Variable,
    pub type_spec: TypeSpec,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ParamDecl {
    pub variable: Variable,
    pub type_spec: TypeSpec,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TypeSpec {
    Integer,
    Real,
}

impl TypeSpec {
    /// Name of the builtin type symbol this marker refers to.
    pub fn name(self) -> &'static str {
        match self {
            TypeSpec::Integer => "INTEGER",
            TypeSpec::Real => "REAL",
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named occurrence of a variable: a declaration, a read or an assignment
/// target. The span points at the identifier in the source.
#[derive(Debug, PartialEq, Clone)]
pub struct Variable {
    pub name: String,
    pub span: Span,
}

impl Variable {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Compound {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    Compound(Compound),
    Assign {
        target: Variable,
        value: Expression,
    },
    Call {
        name: String,
        span: Span,
        args: Vec<Expression>,
    },
    Empty,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    Number(i64),
    Variable(Variable),
    /// `span` is the operator token.
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        span: Span,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOperator,
        span: Span,
        operand: Box<Expression>,
    },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::IntDiv => "div",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
        }
    }
}
