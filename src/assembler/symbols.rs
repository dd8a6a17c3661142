use super::phases::types::LabelName;
use crate::isa::hw::Addr;
use std::collections::HashMap;
use std::fmt::Display;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    DuplicateLabel(LabelName),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DuplicateLabel(label) => write!(f, "Symbol '{}' defined before", label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub label: LabelName,
    pub address: Addr,
}

/// Labels in order of definition, indexed for exact-match lookup. Symbols
/// are never changed or removed once defined.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<LabelName, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, label: &str, address: Addr) -> Result<(), Error> {
        if self.index.contains_key(label) {
            return Err(Error::DuplicateLabel(label.to_owned()));
        }

        self.index.insert(label.to_owned(), self.symbols.len());
        self.symbols.push(Symbol {
            label: label.to_owned(),
            address,
        });
        Ok(())
    }

    pub fn lookup(&self, label: &str) -> Option<Addr> {
        self.index.get(label).map(|&idx| self.symbols[idx].address)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
