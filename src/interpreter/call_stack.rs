use std::fmt;

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Program,
    Procedure,
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameKind::Program => f.write_str("PROGRAM"),
            FrameKind::Procedure => f.write_str("PROCEDURE"),
        }
    }
}

/// Local bindings of one live program or procedure invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationRecord {
    name: String,
    kind: FrameKind,
    level: usize,
    members: IndexMap<String, i64>,
}

impl ActivationRecord {
    pub fn new(name: impl Into<String>, kind: FrameKind, level: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            level,
            members: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.members.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: i64) {
        self.members.insert(name.into(), value);
    }

    pub fn members(&self) -> &IndexMap<String, i64> {
        &self.members
    }

    pub fn into_members(self) -> IndexMap<String, i64> {
        self.members
    }
}

impl fmt::Display for ActivationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.level, self.kind, self.name)?;
        for (name, value) in &self.members {
            write!(f, "\n   {name:<20}: {value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CallStack {
    records: Vec<ActivationRecord>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ActivationRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<ActivationRecord> {
        self.records.pop()
    }

    pub fn peek(&self) -> Option<&ActivationRecord> {
        self.records.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut ActivationRecord> {
        self.records.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.records.len()
    }
}
