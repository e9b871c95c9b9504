//! simple-hashtable: a single-threaded, separate-chaining hash table with
//! a detached, fail-fast cursor that supports in-place removal.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small open-hashing table whose chain order, growth points and
//!   iteration order are fully determined by key hashes, plus a cursor that
//!   can remove while walking and detects any other structural change.
//! - Pieces:
//!   - `SimpleHashtable<K, V, S>`: bucket array of chain heads over an entry
//!     arena; owns a modification counter.
//!   - `Cursor`: position plus a snapshot of the counter; borrows the table
//!     only for the duration of each call.
//!   - `Processor` / `Tester`: function-object capabilities accepted by
//!     `for_each` and `remove_if`.
//!
//! Storage
//! - Entries live in a `SlotMap`; chains link entries by slot key instead of
//!   by pointer. Buckets hold the slot key of their head entry.
//! - New keys are appended at the tail of their chain.
//! - Each entry stores its `u64` hash; growth relinks entries using the
//!   stored hash and never calls back into `K: Hash`.
//! - Bucket index is `abs(hash) mod capacity` with capacity a power of two.
//!
//! Growth
//! - Before inserting a new key, the table doubles while
//!   `(len + 1) / capacity >= 3/4`. Overwriting an existing key never grows.
//! - Capacity never shrinks, including on `clear`.
//!
//! Fail-fast iteration
//! - The counter is bumped on new-key insert, removal, growth and `clear`.
//!   Value overwrites are not structural.
//! - A cursor compares its snapshot on every `has_next`, `next` and
//!   `remove`. After its own `remove` it adopts the table's new value.
//! - Generational slot keys let `remove` report an entry that disappeared
//!   behind the cursor instead of touching an unrelated one.
//! - Each counter carries a process-unique owner id. A cursor given a table
//!   other than its own fails with `IllegalState`.
//!
//! Constraints and non-goals
//! - Single-threaded; no locking and no guarantees under real concurrency.
//! - No serialization, no ordering beyond bucket/chain order.
//! - `get` returns `None` only for absent keys. Tables that need nullable
//!   values use `V = Option<T>`, and `get` then yields `Some(&None)`.
//!   Such values render as `null` through `RenderValue`.

pub mod callbacks;
pub mod cursor;
mod error;
mod mod_count;
pub mod render;
pub mod simple_hashtable;
mod simple_hashtable_proptest;

// Public surface
pub use callbacks::{Processor, Tester};
pub use cursor::{Cursor, CursorState};
pub use error::TableError;
pub use render::RenderValue;
pub use simple_hashtable::{Iter, SimpleHashtable, TableEntry, DEFAULT_CAPACITY};
