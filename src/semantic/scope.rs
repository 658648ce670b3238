use indexmap::IndexMap;

use crate::ast::TypeSpec;

use super::symbol::{Symbol, SymbolRef};

pub const BUILTIN_LEVEL: usize = 0;
pub const GLOBAL_LEVEL: usize = 1;

/// Index of a scope inside its `SymbolTable` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const BUILTIN: ScopeId = ScopeId(0);
    pub const GLOBAL: ScopeId = ScopeId(1);
}

#[derive(Debug, Clone)]
pub struct Scope {
    name: String,
    level: usize,
    enclosing: Option<ScopeId>,
    symbols: IndexMap<String, Symbol>,
}

impl Scope {
    fn new(name: impl Into<String>, level: usize, enclosing: Option<ScopeId>) -> Self {
        Self {
            name: name.into(),
            level,
            enclosing,
            symbols: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn enclosing(&self) -> Option<ScopeId> {
        self.enclosing
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Arena of nested scopes.
///
/// Scopes are only ever left in the reverse order they were entered, so the
/// arena behaves like a stack: the innermost scope is always the last one and
/// every `enclosing` link points further down.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl SymbolTable {
    /// Builtin scope seeded with `INTEGER` and `REAL`, plus an empty global
    /// scope chained to it.
    pub fn new() -> Self {
        let mut builtins = Scope::new("builtins", BUILTIN_LEVEL, None);
        for type_spec in [TypeSpec::Integer, TypeSpec::Real] {
            builtins
                .symbols
                .insert(type_spec.name().to_string(), Symbol::BuiltinType(type_spec));
        }
        let global = Scope::new("global", GLOBAL_LEVEL, Some(ScopeId::BUILTIN));
        Self {
            scopes: vec![builtins, global],
        }
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn builtins(&self) -> &Scope {
        self.scope(ScopeId::BUILTIN)
    }

    pub fn global(&self) -> &Scope {
        self.scope(ScopeId::GLOBAL)
    }

    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Opens a scope nested one level below `parent`.
    pub fn push(&mut self, name: impl Into<String>, parent: ScopeId) -> ScopeId {
        let level = self.scope(parent).level + 1;
        self.scopes.push(Scope::new(name, level, Some(parent)));
        ScopeId(self.scopes.len() - 1)
    }

    /// Closes the innermost scope. The builtin and global scopes are never
    /// removed.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() > 2 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Defines `symbol` in `scope`, replacing any symbol of the same name.
    pub fn define(&mut self, scope: ScopeId, symbol: Symbol) -> SymbolRef {
        let symbols = &mut self.scopes[scope.0].symbols;
        let (slot, _) = symbols.insert_full(symbol.name().to_string(), symbol);
        SymbolRef { scope, slot }
    }

    /// Looks `name` up in `scope` only.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<(SymbolRef, &Symbol)> {
        let (slot, _, symbol) = self.scope(scope).symbols.get_full(name)?;
        Some((SymbolRef { scope, slot }, symbol))
    }

    /// Looks `name` up in `scope`, then in each enclosing scope in turn.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(SymbolRef, &Symbol)> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(found) = self.lookup_local(id, name) {
                return Some(found);
            }
            current = self.scope(id).enclosing;
        }
        None
    }

    pub fn resolve(&self, symbol: SymbolRef) -> Option<&Symbol> {
        self.scopes
            .get(symbol.scope.0)?
            .symbols
            .get_index(symbol.slot)
            .map(|(_, symbol)| symbol)
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable(table: &SymbolTable, name: &str) -> Symbol {
        let (type_ref, _) = table
            .lookup(ScopeId::GLOBAL, "INTEGER")
            .expect("builtin INTEGER missing");
        Symbol::Variable {
            name: name.to_string(),
            type_ref,
        }
    }

    #[test]
    fn seeds_builtin_types_below_global() {
        let table = SymbolTable::new();
        assert_eq!(table.builtins().level(), BUILTIN_LEVEL);
        assert_eq!(table.global().level(), GLOBAL_LEVEL);
        assert_eq!(table.global().enclosing(), Some(ScopeId::BUILTIN));
        assert!(table.global().is_empty());

        let (found, symbol) = table
            .lookup(ScopeId::GLOBAL, "REAL")
            .expect("REAL should resolve from global");
        assert_eq!(found.scope, ScopeId::BUILTIN);
        assert_eq!(symbol, &Symbol::BuiltinType(TypeSpec::Real));
    }

    #[test]
    fn inner_definitions_shadow_outer_ones() {
        let mut table = SymbolTable::new();
        let outer = variable(&table, "x");
        table.define(ScopeId::GLOBAL, outer);
        let inner_scope = table.push("inner", ScopeId::GLOBAL);
        let inner = variable(&table, "x");
        table.define(inner_scope, inner);

        let (from_inner, _) = table.lookup(inner_scope, "x").expect("x from inner");
        assert_eq!(from_inner.scope, inner_scope);
        assert_eq!(table.scope(inner_scope).level(), 2);

        let (from_global, _) = table.lookup(ScopeId::GLOBAL, "x").expect("x from global");
        assert_eq!(from_global.scope, ScopeId::GLOBAL);

        table.pop();
        assert_eq!(table.depth(), 2);
    }

    #[test]
    fn variable_type_links_resolve_to_builtins() {
        let mut table = SymbolTable::new();
        let symbol = variable(&table, "count");
        let defined = table.define(ScopeId::GLOBAL, symbol);
        let Some(Symbol::Variable { type_ref, .. }) = table.resolve(defined) else {
            panic!("expected a variable symbol");
        };
        assert_eq!(
            table.resolve(*type_ref),
            Some(&Symbol::BuiltinType(TypeSpec::Integer))
        );
    }

    #[test]
    fn never_pops_global_or_builtin_scopes() {
        let mut table = SymbolTable::new();
        assert!(table.pop().is_none());
        assert_eq!(table.depth(), 2);
    }
}
