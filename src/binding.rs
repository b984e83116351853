//! Bindings and the singly linked chains both tables are built from.
//!
//! Nodes live in a `SlotMap` arena owned by the table; a chain is only a
//! head link, and each binding carries the link to its successor. Moving a
//! binding between chains rewrites links and never touches the key or value.

use crate::symtable::AllocError;
use slotmap::{DefaultKey, SlotMap};

pub(crate) type NodeKey = DefaultKey;
pub(crate) type Arena<V> = SlotMap<NodeKey, Binding<V>>;

/// Makes room for one more node. Replaced in tests to simulate exhaustion.
pub(crate) type SlotReserve<V> = fn(&mut Arena<V>) -> Result<(), AllocError>;

#[derive(Debug)]
pub(crate) struct Binding<V> {
    key: Box<str>,
    pub(crate) value: V,
    next: Option<NodeKey>,
}

impl<V> Binding<V> {
    pub(crate) fn new(key: Box<str>, value: V) -> Self {
        Self {
            key,
            value,
            next: None,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn into_value(self) -> V {
        self.value
    }
}

/// Make the table's own copy of a caller key, reporting allocation failure
/// instead of aborting.
pub(crate) fn copy_key(key: &str) -> Result<Box<str>, AllocError> {
    let mut owned = String::new();
    owned.try_reserve_exact(key.len()).map_err(|_| AllocError)?;
    owned.push_str(key);
    Ok(owned.into_boxed_str())
}

pub(crate) fn reserve_slot<V>(nodes: &mut Arena<V>) -> Result<(), AllocError> {
    nodes.try_reserve(1).map_err(|_| AllocError)
}

/// Store a new unlinked binding for `key`. On allocation failure the value
/// is handed back and `nodes` holds the same bindings as before.
pub(crate) fn alloc_binding<V>(
    nodes: &mut Arena<V>,
    reserve: SlotReserve<V>,
    key: &str,
    value: V,
) -> Result<NodeKey, V> {
    let owned = match reserve(nodes).and_then(|()| copy_key(key)) {
        Ok(owned) => owned,
        Err(AllocError) => {
            log::warn!("could not allocate binding for key of {} bytes; not inserted", key.len());
            return Err(value);
        }
    };
    // The slot is reserved, so this insert does not allocate.
    Ok(nodes.insert(Binding::new(owned, value)))
}

/// Head of a singly linked chain of bindings stored in an [`Arena`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Chain {
    head: Option<NodeKey>,
}

impl Chain {
    pub(crate) const EMPTY: Chain = Chain { head: None };

    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub(crate) fn find<V>(&self, nodes: &Arena<V>, key: &str) -> Option<NodeKey> {
        let mut cursor = self.head;
        while let Some(node) = cursor {
            let binding = &nodes[node];
            if binding.key() == key {
                return Some(node);
            }
            cursor = binding.next;
        }
        None
    }

    /// Link `node` in front of the current head. The node must not be
    /// reachable from any chain.
    pub(crate) fn push_front<V>(&mut self, nodes: &mut Arena<V>, node: NodeKey) {
        nodes[node].next = self.head;
        self.head = Some(node);
    }

    /// Unlink the binding whose key equals `key` and release its node.
    pub(crate) fn unlink<V>(&mut self, nodes: &mut Arena<V>, key: &str) -> Option<Binding<V>> {
        let mut prev: Option<NodeKey> = None;
        let mut cursor = self.head;
        while let Some(node) = cursor {
            let next = nodes[node].next;
            if nodes[node].key() == key {
                match prev {
                    Some(p) => nodes[p].next = next,
                    None => self.head = next,
                }
                return nodes.remove(node);
            }
            prev = Some(node);
            cursor = next;
        }
        None
    }

    /// Detach every node of this chain, yielding them head first. The
    /// chain is empty afterwards; the nodes stay in the arena.
    pub(crate) fn take_nodes(&mut self) -> Detach {
        Detach {
            cursor: self.head.take(),
        }
    }

    pub(crate) fn iter<'a, V>(&self, nodes: &'a Arena<V>) -> ChainIter<'a, V> {
        ChainIter {
            cursor: self.head,
            nodes,
        }
    }

    /// Visit every binding with mutable access to its value.
    pub(crate) fn for_each_mut<V, F>(&self, nodes: &mut Arena<V>, mut f: F)
    where
        F: FnMut(&str, &mut V),
    {
        let mut cursor = self.head;
        while let Some(node) = cursor {
            let binding = &mut nodes[node];
            cursor = binding.next;
            f(&*binding.key, &mut binding.value);
        }
    }
}

/// Borrowing iterator over the bindings of one chain, head first.
pub(crate) struct ChainIter<'a, V> {
    cursor: Option<NodeKey>,
    nodes: &'a Arena<V>,
}

impl<'a, V> ChainIter<'a, V> {
    pub(crate) fn empty(nodes: &'a Arena<V>) -> Self {
        Self {
            cursor: None,
            nodes,
        }
    }
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (&'a str, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        let nodes = self.nodes;
        let binding = &nodes[node];
        self.cursor = binding.next;
        Some((binding.key(), &binding.value))
    }
}

/// Yields node keys of a detached chain. The successor is read before the
/// node is handed out, so the caller may relink it into another chain.
pub(crate) struct Detach {
    cursor: Option<NodeKey>,
}

impl Detach {
    /// Relinking a yielded node needs `&mut Arena`, so this steps with a
    /// short shared borrow instead of implementing `Iterator`.
    pub(crate) fn next_in<V>(&mut self, nodes: &Arena<V>) -> Option<NodeKey> {
        let node = self.cursor?;
        self.cursor = nodes[node].next;
        Some(node)
    }
}
