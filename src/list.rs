//! ListSymTable: bindings on a single singly linked chain.
//!
//! Every operation walks the chain, so lookups are O(n). New bindings are
//! prepended, which makes traversal insertion-reverse. This variant is the
//! reference the hash table is checked against.

use crate::binding::{alloc_binding, reserve_slot, Arena, Binding, Chain, ChainIter, SlotReserve};
use crate::symtable::{AllocError, PutError, SymTable};
use core::fmt;

pub struct ListSymTable<V> {
    first: Chain,
    nodes: Arena<V>,
    slot_reserve: SlotReserve<V>,
}

impl<V> ListSymTable<V> {
    pub fn new() -> Self {
        Self {
            first: Chain::EMPTY,
            nodes: Arena::new(),
            slot_reserve: reserve_slot,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate bindings, most recently inserted first.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.first.iter(&self.nodes),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_slot_reserve(&mut self, slot_reserve: SlotReserve<V>) {
        self.slot_reserve = slot_reserve;
    }
}

impl<V> Default for ListSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SymTable<V> for ListSymTable<V> {
    fn try_new() -> Result<Self, AllocError> {
        // Nothing is allocated until the first put.
        Ok(Self::new())
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn put(&mut self, key: &str, value: V) -> Result<(), PutError<V>> {
        if self.first.find(&self.nodes, key).is_some() {
            return Err(PutError::DuplicateKey(value));
        }
        let node = alloc_binding(&mut self.nodes, self.slot_reserve, key, value)
            .map_err(PutError::OutOfMemory)?;
        self.first.push_front(&mut self.nodes, node);
        Ok(())
    }

    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let node = self.first.find(&self.nodes, key)?;
        Some(core::mem::replace(&mut self.nodes[node].value, value))
    }

    fn contains(&self, key: &str) -> bool {
        self.first.find(&self.nodes, key).is_some()
    }

    fn get(&self, key: &str) -> Option<&V> {
        let node = self.first.find(&self.nodes, key)?;
        Some(&self.nodes[node].value)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let node = self.first.find(&self.nodes, key)?;
        Some(&mut self.nodes[node].value)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        self.first
            .unlink(&mut self.nodes, key)
            .map(Binding::into_value)
    }

    fn map<C, F>(&self, mut visit: F, extra: &mut C)
    where
        F: FnMut(&str, &V, &mut C),
    {
        for (k, v) in self.iter() {
            visit(k, v, extra);
        }
    }

    fn map_mut<C, F>(&mut self, mut visit: F, extra: &mut C)
    where
        F: FnMut(&str, &mut V, &mut C),
    {
        self.first
            .for_each_mut(&mut self.nodes, |k, v| visit(k, v, extra));
    }
}

/// Iterator over the bindings of a [`ListSymTable`].
pub struct Iter<'a, V> {
    inner: ChainIter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a, V> IntoIterator for &'a ListSymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for ListSymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
