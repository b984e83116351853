//! symtable: a string-keyed symbol table with two interchangeable
//! implementations behind one trait.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one contract ([`SymTable`]) and two implementations that can be
//!   checked against each other.
//! - Layers:
//!   - `binding`: owned key copies, values, and singly linked chains whose
//!     nodes live in a `slotmap` arena. Chains only hold a head link.
//!   - [`ListSymTable`]: a single chain. O(n) per operation; the reference
//!     implementation.
//!   - [`HashSymTable`]: a prime-sized array of chains with incremental
//!     growth ([`growth`]) driven by a fixed byte hash ([`hash`]).
//!
//! Constraints
//! - Keys are compared by exact byte equality. The table owns a copy of
//!   every key; nothing the caller holds is aliased.
//! - Values are stored as given and never inspected. Use `V = &'a T` to
//!   keep a value owned by the caller; the borrow checker then proves it
//!   outlives the table.
//! - Duplicate puts fail and leave the existing binding untouched.
//! - Traversal visits every binding exactly once; the order is an
//!   implementation detail (insertion-reverse for the list, bucket then
//!   chain for the hash table).
//!
//! Growth
//! - Before every `put` (duplicate or not) the hash table asks
//!   [`growth::plan`] whether `len / bucket_count > 0.75`. If so it steps
//!   to the next entry of [`growth::PRIMES`], rehashing by relinking nodes.
//! - At the last prime growth is skipped and the table keeps working with
//!   longer chains.
//! - If the new bucket array cannot be allocated, growth is abandoned and
//!   the table is left exactly as it was.
//!
//! Failure semantics
//! - Every allocation made by `try_new` and `put` is fallible; failure is
//!   reported as [`AllocError`] / [`PutError::OutOfMemory`]. A node slot is
//!   reserved before the key is copied, so a failed `put` leaves every
//!   binding and `len()` as they were and hands the value back.
//! - Missing keys are not errors: `get`, `replace`, and `remove` return
//!   `None`, `contains` returns `false`.
//! - Null tables, keys, or values and double teardown cannot be
//!   expressed: references are never null and teardown is `Drop`, which
//!   runs once.
//!
//! Threading
//! - No internal synchronization. A table is `Send`/`Sync` exactly when its
//!   values are, and every mutation takes `&mut self`. Callers sharing a
//!   table across threads wrap the whole table in a `Mutex`.
//!
//! Logging
//! - Growth, skipped growth, and allocation failures are reported through
//!   the `log` facade. The crate never installs a logger.

mod binding;
pub mod growth;
pub mod hash;
mod hash_table;
mod hash_table_proptest;
mod list;
mod symtable;

// Public surface
pub use hash_table::HashSymTable;
pub use list::ListSymTable;
pub use symtable::{AllocError, PutError, SymTable};

pub mod iter {
    //! Borrowing iterators returned by `iter()` on each table.
    pub use crate::hash_table::Iter as HashIter;
    pub use crate::list::Iter as ListIter;
}
