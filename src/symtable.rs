//! SymTable: the contract shared by the linked-list and hash table variants.

use core::fmt;

/// The allocator could not provide memory for a table, a key copy, or a
/// bucket array. The table that reported it is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")
    }
}

impl std::error::Error for AllocError {}

/// Why `put` did not insert. Both variants hand the rejected value back.
#[derive(Debug, PartialEq, Eq)]
pub enum PutError<V> {
    /// A binding with an equal key already exists; its value is untouched.
    DuplicateKey(V),
    /// The key could not be copied.
    OutOfMemory(V),
}

impl<V> PutError<V> {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, PutError::DuplicateKey(_))
    }

    /// Recover the value that was not inserted.
    pub fn into_value(self) -> V {
        match self {
            PutError::DuplicateKey(v) | PutError::OutOfMemory(v) => v,
        }
    }
}

impl<V> fmt::Display for PutError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PutError::DuplicateKey(_) => f.write_str("a binding with this key already exists"),
            PutError::OutOfMemory(_) => f.write_str("out of memory while copying the key"),
        }
    }
}

impl<V: fmt::Debug> std::error::Error for PutError<V> {}

/// A table of bindings from string keys to values.
///
/// Keys are compared by exact byte equality. The table stores its own copy
/// of every key; values are stored as given. To keep a value owned by the
/// caller, instantiate `V` with a reference (`&'a T`): the table then only
/// ever holds and returns that reference.
///
/// Traversal order is an implementation detail. Every binding is visited
/// exactly once per traversal.
pub trait SymTable<V>: Sized {
    /// An empty table, or `AllocError` if its initial storage could not be
    /// obtained.
    fn try_new() -> Result<Self, AllocError>;

    /// Number of bindings. O(1).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a binding for `key` unless one already exists.
    fn put(&mut self, key: &str, value: V) -> Result<(), PutError<V>>;

    /// Swap the value bound to `key`, returning the previous one. Returns
    /// `None` and drops `value` if `key` is absent.
    fn replace(&mut self, key: &str, value: V) -> Option<V>;

    fn contains(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<&V>;

    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Unlink the binding for `key`, release its key copy, and return its
    /// value.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Call `visit(key, value, extra)` once per binding.
    fn map<C, F>(&self, visit: F, extra: &mut C)
    where
        F: FnMut(&str, &V, &mut C);

    /// Like [`SymTable::map`], with mutable access to each value.
    fn map_mut<C, F>(&mut self, visit: F, extra: &mut C)
    where
        F: FnMut(&str, &mut V, &mut C);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_error_returns_value() {
        let e = PutError::DuplicateKey(7);
        assert!(e.is_duplicate());
        assert_eq!(e.into_value(), 7);

        let e = PutError::OutOfMemory("v");
        assert!(!e.is_duplicate());
        assert_eq!(e.into_value(), "v");
    }

    #[test]
    fn errors_display() {
        assert_eq!(AllocError.to_string(), "memory allocation failed");
        assert_eq!(
            PutError::DuplicateKey(()).to_string(),
            "a binding with this key already exists"
        );
    }
}
