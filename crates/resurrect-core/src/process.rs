//! Read-only view of the OS process table.

use std::collections::HashMap;

use crate::error::ProcessLookupError;

/// One live process as seen at inspection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessNode {
    pub pid: u32,
    /// Executable name as the OS reports it (`comm` on Linux).
    pub name: String,
    /// Full argument vector, argv[0] included. May be empty for processes
    /// whose command line is unreadable.
    pub argv: Vec<String>,
}

/// Source of process subtrees.
///
/// Implementations return descendants in whatever order the OS enumerates
/// them. Callers must not assume the order is sorted or stable across calls.
pub trait ProcessTable {
    /// Every recursive descendant of `pid`, excluding `pid` itself.
    ///
    /// Returns [`ProcessLookupError::Vanished`] if `pid` no longer exists.
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessNode>, ProcessLookupError>;
}

impl<T: ProcessTable + ?Sized> ProcessTable for &T {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessNode>, ProcessLookupError> {
        (**self).descendants(pid)
    }
}

/// A fixed process table, built up front from (parent, node) pairs.
///
/// A process's children are listed together, in insertion order, when the
/// walk reaches it; their own children follow later. For `1 -> {2, 5}`,
/// `2 -> 3`, `3 -> 4` the order is 2, 5, 3, 4. This lets tests pin down an
/// enumeration order the OS would otherwise choose.
#[derive(Debug, Clone, Default)]
pub struct MemoryProcessTable {
    roots: Vec<u32>,
    children: HashMap<u32, Vec<ProcessNode>>,
}

impl MemoryProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live process with no parent of interest.
    pub fn with_root(mut self, pid: u32) -> Self {
        self.roots.push(pid);
        self
    }

    /// Register `child` as a direct child of `parent`.
    pub fn with_child(mut self, parent: u32, child: ProcessNode) -> Self {
        self.children.entry(parent).or_default().push(child);
        self
    }

    fn exists(&self, pid: u32) -> bool {
        self.roots.contains(&pid)
            || self
                .children
                .values()
                .flatten()
                .any(|node| node.pid == pid)
    }
}

impl ProcessTable for MemoryProcessTable {
    fn descendants(&self, pid: u32) -> Result<Vec<ProcessNode>, ProcessLookupError> {
        if !self.exists(pid) {
            return Err(ProcessLookupError::Vanished { pid });
        }

        let mut found = Vec::new();
        let mut stack = vec![pid];
        while let Some(current) = stack.pop() {
            if let Some(kids) = self.children.get(&current) {
                found.extend(kids.iter().cloned());
                stack.extend(kids.iter().rev().map(|kid| kid.pid));
            }
        }
        Ok(found)
    }
}
