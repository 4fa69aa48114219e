#[cfg(test)]
#[path = "./table_tests.rs"]
mod tests;

use crate::value::{Item, Key, Value};
use foldhash::HashMap;
use std::fmt;

/// Tables at or above this many entries get a hash index for lookups.
pub(crate) const INDEXED_TABLE_THRESHOLD: usize = 6;

/// How a table came into existence, which decides what may extend it later.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TableKind {
    /// Created as a parent of a header path, may still get its own header.
    Implicit,
    /// Defined by a `[header]` or `[[header]]`.
    Header,
    /// Created by a dotted key of a key-value pair.
    Dotted,
    /// An inline table, closed to any extension.
    Inline,
}

/// A TOML table: key-value entries in insertion order.
///
/// Small tables are searched linearly, once a table reaches a handful of
/// entries lookups go through a hash index instead.
#[derive(Clone)]
pub struct Table {
    entries: Vec<(Key, Item)>,
    index: HashMap<String, usize>,
    kind: TableKind,
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Table {
        Table::with_kind(TableKind::Implicit)
    }

    pub(crate) fn with_kind(kind: TableKind) -> Table {
        Table {
            entries: Vec::new(),
            index: HashMap::default(),
            kind,
        }
    }

    #[inline]
    pub(crate) fn kind(&self) -> TableKind {
        self.kind
    }

    #[inline]
    pub(crate) fn set_kind(&mut self, kind: TableKind) {
        self.kind = kind;
    }

    /// Whether this is an inline table, `{ k = v }`.
    pub fn is_inline(&self) -> bool {
        self.kind == TableKind::Inline
    }

    /// Appends an entry and returns its position. Does **not** check for
    /// duplicates.
    pub(crate) fn insert(&mut self, key: Key, item: Item) -> usize {
        let at = self.entries.len();
        self.entries.push((key, item));
        let len = self.entries.len();
        if len == INDEXED_TABLE_THRESHOLD {
            for (i, (key, _)) in self.entries.iter().enumerate() {
                self.index.insert(key.name.clone(), i);
            }
        } else if len > INDEXED_TABLE_THRESHOLD {
            self.index.insert(self.entries[at].0.name.clone(), at);
        }
        at
    }

    /// Position of the entry named `name`.
    pub(crate) fn find_index(&self, name: &str) -> Option<usize> {
        if self.entries.len() >= INDEXED_TABLE_THRESHOLD {
            return self.index.get(name).copied();
        }
        self.entries.iter().position(|(key, _)| key.name == name)
    }

    #[inline]
    pub(crate) fn entry_at(&self, at: usize) -> &(Key, Item) {
        &self.entries[at]
    }

    #[inline]
    pub(crate) fn item_at_mut(&mut self, at: usize) -> &mut Item {
        &mut self.entries[at].1
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns references to both key and value for `name`.
    pub fn get_key_value(&self, name: &str) -> Option<(&Key, &Item)> {
        let (key, item) = self.entry_at(self.find_index(name)?);
        Some((key, item))
    }

    /// Returns a reference to the item for `name`.
    pub fn get(&self, name: &str) -> Option<&Item> {
        Some(&self.entry_at(self.find_index(name)?).1)
    }

    /// Returns a mutable reference to the item for `name`.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Item> {
        let at = self.find_index(name)?;
        Some(self.item_at_mut(at))
    }

    /// Returns `true` if the table contains the key.
    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.find_index(name).is_some()
    }

    /// Returns the value for `name` if it was assigned with `key = value`.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.get(name)?.as_value()
    }

    /// Returns the table for `name`, standard or inline.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.get(name)?.as_table()
    }

    /// Returns the elements of the array value for `name`.
    pub fn get_array(&self, name: &str) -> Option<&[Value]> {
        self.get(name)?.as_array()
    }

    /// Returns the tables of the array of tables for `name`.
    pub fn get_array_of_tables(&self, name: &str) -> Option<&[Table]> {
        self.get(name)?.as_array_of_tables()
    }

    /// Iterates the keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Key> + '_ {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterates the entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Key, Item)> {
        self.entries.iter()
    }

    /// Returns a slice of all entries.
    #[inline]
    pub fn entries(&self) -> &[(Key, Item)] {
        &self.entries
    }
}

impl PartialEq for Table {
    /// Entry order and spans are not compared.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(key, item)| other.get(&key.name) == Some(item))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a (Key, Item);
    type IntoIter = std::slice::Iter<'a, (Key, Item)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Table {
    type Item = (Key, Item);
    type IntoIter = std::vec::IntoIter<(Key, Item)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
