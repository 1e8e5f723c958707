//! Workbook-wide shared string table.

use indexmap::IndexSet;

/// Insertion-ordered set of cell texts; a string's index is its position.
#[derive(Debug, Default, Clone)]
pub struct SharedStringTable {
    strings: IndexSet<String>,
}

impl SharedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index of `value`, appending it on first sight.
    pub fn intern(&mut self, value: &str) -> usize {
        if let Some(idx) = self.strings.get_index_of(value) {
            return idx;
        }
        self.strings.insert_full(value.to_string()).0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get_index(index).map(String::as_str)
    }

    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.strings.get_index_of(value)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Strings in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}
