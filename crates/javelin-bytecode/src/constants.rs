//! Per-class constant pool for `ldc` operands

use rustc_hash::FxHashMap;
use std::fmt;

/// A loadable constant
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// CONSTANT_Integer
    Integer(i32),
    /// CONSTANT_String
    String(String),
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Integer(v) => write!(f, "{}", v),
            Constant::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// The pool already holds as many entries as a `u16` index can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Constant pool is full ({} entries)", ConstantPool::CAPACITY)]
pub struct PoolOverflow;

/// Constant pool containing literal values.
///
/// Indices start at 1 as in the class file format. Adding the same
/// constant twice returns the existing index.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    entries: Vec<Constant>,
    index: FxHashMap<Constant, u16>,
}

impl ConstantPool {
    /// Largest number of entries; index 0 is never used
    pub const CAPACITY: usize = u16::MAX as usize;

    /// Create a new empty constant pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an integer constant and return its index
    pub fn add_integer(&mut self, value: i32) -> Result<u16, PoolOverflow> {
        self.add(Constant::Integer(value))
    }

    /// Add a string constant and return its index
    pub fn add_string(&mut self, value: impl Into<String>) -> Result<u16, PoolOverflow> {
        self.add(Constant::String(value.into()))
    }

    fn add(&mut self, constant: Constant) -> Result<u16, PoolOverflow> {
        if let Some(&index) = self.index.get(&constant) {
            return Ok(index);
        }
        let index = u16::try_from(self.entries.len() + 1).map_err(|_| PoolOverflow)?;
        self.entries.push(constant.clone());
        self.index.insert(constant, index);
        Ok(index)
    }

    /// Get a constant by index
    pub fn get(&self, index: u16) -> Option<&Constant> {
        if index == 0 {
            return None;
        }
        self.entries.get(index as usize - 1)
    }

    /// Get an integer constant by index
    pub fn get_integer(&self, index: u16) -> Option<i32> {
        match self.get(index)? {
            Constant::Integer(v) => Some(*v),
            Constant::String(_) => None,
        }
    }

    /// Get a string constant by index
    pub fn get_string(&self, index: u16) -> Option<&str> {
        match self.get(index)? {
            Constant::String(s) => Some(s),
            Constant::Integer(_) => None,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, c)| (i as u16 + 1, c))
    }
}
