//! HashSymTable: separate chaining over a prime-sized bucket array.
//!
//! Buckets are chain heads; bindings live in one arena shared by all
//! chains. Growth is checked at the start of every `put` (see
//! [`crate::growth`]). Rehashing relinks existing nodes into a fresh bucket
//! array, so keys are never copied again and values are never touched.

use crate::binding::{alloc_binding, reserve_slot, Arena, Binding, Chain, ChainIter, SlotReserve};
use crate::growth::{self, Growth, PRIMES};
use crate::hash::bucket_index;
use crate::symtable::{AllocError, PutError, SymTable};
use core::fmt;

/// Source of bucket arrays. Replaced in tests to simulate exhaustion.
pub(crate) type BucketAlloc = fn(usize) -> Result<Vec<Chain>, AllocError>;

pub(crate) fn alloc_buckets(len: usize) -> Result<Vec<Chain>, AllocError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(len).map_err(|_| AllocError)?;
    buckets.resize(len, Chain::EMPTY);
    Ok(buckets)
}

pub struct HashSymTable<V> {
    buckets: Vec<Chain>,
    nodes: Arena<V>,
    prime_index: usize,
    bucket_alloc: BucketAlloc,
    slot_reserve: SlotReserve<V>,
}

impl<V> HashSymTable<V> {
    /// An empty table with `PRIMES[0]` buckets.
    ///
    /// Aborts if the bucket array cannot be allocated; use
    /// [`SymTable::try_new`] to observe that instead.
    pub fn new() -> Self {
        Self::from_buckets(vec![Chain::EMPTY; PRIMES[0]], alloc_buckets)
    }

    pub(crate) fn with_bucket_allocator(bucket_alloc: BucketAlloc) -> Result<Self, AllocError> {
        let buckets = bucket_alloc(PRIMES[0])?;
        Ok(Self::from_buckets(buckets, bucket_alloc))
    }

    fn from_buckets(buckets: Vec<Chain>, bucket_alloc: BucketAlloc) -> Self {
        debug_assert_eq!(buckets.len(), PRIMES[0]);
        Self {
            buckets,
            nodes: Arena::new(),
            prime_index: 0,
            bucket_alloc,
            slot_reserve: reserve_slot,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Current length of the bucket array; always `PRIMES[prime_index()]`.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn prime_index(&self) -> usize {
        self.prime_index
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.bucket_count() as f64
    }

    /// Iterate bindings bucket by bucket, each chain head first.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: ChainIter::empty(&self.nodes),
            nodes: &self.nodes,
            remaining: self.nodes.len(),
        }
    }

    /// Every binding sits in the bucket its key hashes to under the current
    /// bucket count, and the chains hold exactly `len()` bindings.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.bucket_count(), PRIMES[self.prime_index]);
        let mut reachable = 0;
        for (i, chain) in self.buckets.iter().enumerate() {
            for (k, _) in chain.iter(&self.nodes) {
                assert_eq!(bucket_index(k.as_bytes(), self.bucket_count()), i);
                reachable += 1;
            }
        }
        assert_eq!(reachable, self.len());
    }

    #[cfg(test)]
    pub(crate) fn set_bucket_allocator(&mut self, bucket_alloc: BucketAlloc) {
        self.bucket_alloc = bucket_alloc;
    }

    #[cfg(test)]
    pub(crate) fn set_slot_reserve(&mut self, slot_reserve: SlotReserve<V>) {
        self.slot_reserve = slot_reserve;
    }

    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(key.as_bytes(), self.buckets.len())
    }

    fn maybe_grow(&mut self) {
        match growth::plan(self.len(), self.bucket_count(), self.prime_index) {
            Growth::Stay => {}
            Growth::Saturated => {
                log::trace!(
                    "load factor {:.3} over threshold at maximum of {} buckets",
                    self.load_factor(),
                    self.bucket_count()
                );
            }
            Growth::Grow {
                prime_index,
                bucket_count,
            } => match (self.bucket_alloc)(bucket_count) {
                Ok(fresh) => {
                    let old = self.bucket_count();
                    self.rehash_into(fresh);
                    self.prime_index = prime_index;
                    log::debug!(
                        "grew bucket array from {} to {} buckets ({} bindings)",
                        old,
                        bucket_count,
                        self.len()
                    );
                }
                Err(AllocError) => {
                    log::warn!(
                        "could not allocate {} buckets; continuing with {}",
                        bucket_count,
                        self.bucket_count()
                    );
                }
            },
        }
    }

    /// Move every node into `fresh`, which becomes the bucket array.
    fn rehash_into(&mut self, fresh: Vec<Chain>) {
        debug_assert!(fresh.iter().all(Chain::is_empty));
        let mut old = core::mem::replace(&mut self.buckets, fresh);
        let count = self.buckets.len();
        for chain in old.iter_mut() {
            let mut detached = chain.take_nodes();
            while let Some(node) = detached.next_in(&self.nodes) {
                let index = bucket_index(self.nodes[node].key().as_bytes(), count);
                self.buckets[index].push_front(&mut self.nodes, node);
            }
        }
    }
}

impl<V> Default for HashSymTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SymTable<V> for HashSymTable<V> {
    fn try_new() -> Result<Self, AllocError> {
        Self::with_bucket_allocator(alloc_buckets)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn put(&mut self, key: &str, value: V) -> Result<(), PutError<V>> {
        self.maybe_grow();
        let index = self.bucket_of(key);
        if self.buckets[index].find(&self.nodes, key).is_some() {
            return Err(PutError::DuplicateKey(value));
        }
        let node = alloc_binding(&mut self.nodes, self.slot_reserve, key, value)
            .map_err(PutError::OutOfMemory)?;
        self.buckets[index].push_front(&mut self.nodes, node);
        Ok(())
    }

    fn replace(&mut self, key: &str, value: V) -> Option<V> {
        let node = self.buckets[self.bucket_of(key)].find(&self.nodes, key)?;
        Some(core::mem::replace(&mut self.nodes[node].value, value))
    }

    fn contains(&self, key: &str) -> bool {
        self.buckets[self.bucket_of(key)]
            .find(&self.nodes, key)
            .is_some()
    }

    fn get(&self, key: &str) -> Option<&V> {
        let node = self.buckets[self.bucket_of(key)].find(&self.nodes, key)?;
        Some(&self.nodes[node].value)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let node = self.buckets[self.bucket_of(key)].find(&self.nodes, key)?;
        Some(&mut self.nodes[node].value)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_of(key);
        self.buckets[index]
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
        for chain in &self.buckets {
            chain.for_each_mut(&mut self.nodes, |k, v| visit(k, v, extra));
        }
    }
}

/// Iterator over the bindings of a [`HashSymTable`].
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Chain>,
    chain: ChainIter<'a, V>,
    nodes: &'a Arena<V>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.next() {
                self.remaining -= 1;
                return Some(item);
            }
            if self.remaining == 0 {
                return None;
            }
            self.chain = self.buckets.next()?.iter(self.nodes);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

impl<'a, V> IntoIterator for &'a HashSymTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for HashSymTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
