use std::fmt;

use crate::ast::TypeSpec;

use super::scope::ScopeId;

/// Non-owning link to a symbol stored in some scope of a `SymbolTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRef {
    pub scope: ScopeId,
    pub slot: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    BuiltinType(TypeSpec),
    Variable { name: String, type_ref: SymbolRef },
    Procedure { name: String, params: Vec<String> },
    Program { name: String },
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::BuiltinType(type_spec) => type_spec.name(),
            Symbol::Variable { name, .. }
            | Symbol::Procedure { name, .. }
            | Symbol::Program { name } => name,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Symbol::BuiltinType(_) => "type",
            Symbol::Variable { .. } => "variable",
            Symbol::Procedure { .. } => "procedure",
            Symbol::Program { .. } => "program",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::BuiltinType(type_spec) => write!(f, "<BuiltinTypeSymbol(name='{type_spec}')>"),
            Symbol::Variable { name, .. } => write!(f, "<VarSymbol(name='{name}')>"),
            Symbol::Procedure { name, params } => {
                write!(f, "<ProcedureSymbol(name='{name}', params=[{}])>", params.join(", "))
            }
            Symbol::Program { name } => write!(f, "<ProgramSymbol(name='{name}')>"),
        }
    }
}
