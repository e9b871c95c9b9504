//! SimpleHashtable: separate-chaining table over an entry arena.
//!
//! Buckets hold the slot key of their first entry; each entry links to the
//! next one in the same bucket. New keys are appended at the chain tail, so
//! iteration order is bucket index first, then insertion order within the
//! chain (as rearranged by the last growth).

use crate::callbacks::{Processor, Tester};
use crate::cursor::Cursor;
use crate::error::TableError;
use crate::mod_count::ModCount;
use crate::render::RenderValue;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

/// Bucket count used by `SimpleHashtable::new`.
pub const DEFAULT_CAPACITY: usize = 16;

// Growth happens before a new key would bring size/capacity to 3/4.
const LOAD_FACTOR_NUMERATOR: usize = 3;
const LOAD_FACTOR_DENOMINATOR: usize = 4;

/// One key/value pair stored in the table.
#[derive(Debug)]
pub struct TableEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) next: Option<DefaultKey>,
}

impl<K, V> TableEntry<K, V> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<K: fmt::Display, V: RenderValue> fmt::Display for TableEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.key)?;
        self.value.render(f)
    }
}

pub struct SimpleHashtable<K, V, S = RandomState> {
    hasher: S,
    pub(crate) buckets: Vec<Option<DefaultKey>>,
    pub(crate) slots: SlotMap<DefaultKey, TableEntry<K, V>>,
    pub(crate) mod_count: ModCount,
}

/// `abs(hash) mod capacity`; capacity is always a power of two.
#[inline]
pub(crate) fn bucket_index(hash: u64, capacity: usize) -> usize {
    ((hash as i64).unsigned_abs() as usize) & (capacity - 1)
}

fn checked_capacity(requested: usize) -> Result<usize, TableError> {
    if requested < 1 {
        return Err(TableError::InvalidArgument { requested });
    }
    Ok(requested.next_power_of_two())
}

impl<K, V> SimpleHashtable<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Table with at least `capacity` buckets, rounded up to a power of two.
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for SimpleHashtable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowing iterator in bucket-then-chain order.
pub struct Iter<'a, K, V, S> {
    table: &'a SimpleHashtable<K, V, S>,
    bucket: usize,
    next: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = &'a TableEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(k) = self.next {
            let entry = &self.table.slots[k];
            self.next = match entry.next {
                Some(n) => Some(n),
                None => self
                    .table
                    .first_entry_from(self.bucket + 1)
                    .map(|(b, n)| {
                        self.bucket = b;
                        n
                    }),
            };
            self.remaining -= 1;
            return Some(entry);
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, S> ExactSizeIterator for Iter<'a, K, V, S> {}

impl<'a, K, V, S> IntoIterator for &'a SimpleHashtable<K, V, S> {
    type Item = &'a TableEntry<K, V>;
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Operations that never hash a key.
impl<K, V, S> SimpleHashtable<K, V, S> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Drops every entry; the bucket count is kept.
    pub fn clear(&mut self) {
        log::trace!(
            "clearing {} entries from {} buckets at modification {}",
            self.len(),
            self.capacity(),
            self.mod_count.get()
        );
        self.slots.clear();
        self.buckets.fill(None);
        self.mod_count.bump();
    }

    pub fn iter(&self) -> Iter<'_, K, V, S> {
        let (bucket, next) = match self.first_entry_from(0) {
            Some((b, k)) => (b, Some(k)),
            None => (self.buckets.len(), None),
        };
        Iter {
            table: self,
            bucket,
            next,
            remaining: self.len(),
        }
    }

    /// Snapshot of the live entries in iteration order.
    pub fn to_vec(&self) -> Vec<&TableEntry<K, V>> {
        self.iter().collect()
    }

    /// Fail-fast cursor positioned before the first entry.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self)
    }

    pub fn for_each<P>(&self, processor: &mut P)
    where
        P: Processor<TableEntry<K, V>> + ?Sized,
    {
        for entry in self.iter() {
            processor.process(entry);
        }
    }

    /// Removes every entry accepted by `tester`, returning how many went.
    pub fn remove_if<T>(&mut self, tester: T) -> usize
    where
        T: Tester<TableEntry<K, V>>,
    {
        let mut cursor = self.cursor();
        let mut removed = 0;
        loop {
            let hit = match cursor.next(self) {
                Ok(entry) => tester.test(entry),
                Err(TableError::Exhausted) => break,
                Err(e) => {
                    debug_assert!(false, "remove_if cursor failed: {e}");
                    log::error!("remove_if stopped early: {}", e);
                    break;
                }
            };
            if hit {
                match cursor.remove(self) {
                    Ok(_) => removed += 1,
                    Err(e) => {
                        debug_assert!(false, "remove_if removal failed: {e}");
                        log::error!("remove_if skipped an entry: {}", e);
                    }
                }
            }
        }
        removed
    }

    /// First non-empty bucket at or after `bucket`, with its chain head.
    pub(crate) fn first_entry_from(&self, bucket: usize) -> Option<(usize, DefaultKey)> {
        self.buckets
            .iter()
            .enumerate()
            .skip(bucket)
            .find_map(|(i, head)| head.map(|k| (i, k)))
    }

    /// Splices the entry at `slot` out of its chain and frees it.
    pub(crate) fn unlink(&mut self, slot: DefaultKey) -> Option<(K, V)> {
        let entry = self.slots.get(slot)?;
        let (hash, next) = (entry.hash, entry.next);
        let idx = bucket_index(hash, self.buckets.len());

        if self.buckets[idx] == Some(slot) {
            self.buckets[idx] = next;
        } else {
            let mut prev = self.buckets[idx]?;
            loop {
                match self.slots[prev].next {
                    Some(n) if n == slot => break,
                    Some(n) => prev = n,
                    None => return None,
                }
            }
            self.slots[prev].next = next;
        }

        let removed = self.slots.remove(slot)?;
        self.mod_count.bump();
        Some((removed.key, removed.value))
    }

    fn link_tail(&mut self, slot: DefaultKey, hash: u64) {
        let idx = bucket_index(hash, self.buckets.len());
        match self.buckets[idx] {
            None => self.buckets[idx] = Some(slot),
            Some(mut tail) => {
                while let Some(n) = self.slots[tail].next {
                    tail = n;
                }
                self.slots[tail].next = Some(slot);
            }
        }
    }

    fn needs_growth(&self) -> bool {
        (self.len() + 1) * LOAD_FACTOR_DENOMINATOR >= self.buckets.len() * LOAD_FACTOR_NUMERATOR
    }

    /// Doubles the bucket array and relinks every entry under the new mask,
    /// walking the old buckets in iteration order.
    fn grow(&mut self) {
        let new_cap = self.buckets.len() * 2;
        log::debug!(
            "growing table from {} to {} buckets at {} entries",
            self.buckets.len(),
            new_cap,
            self.len()
        );

        let old = std::mem::replace(&mut self.buckets, vec![None; new_cap]);
        let mut tails: Vec<Option<DefaultKey>> = vec![None; new_cap];
        for head in old {
            let mut cur = head;
            while let Some(k) = cur {
                let entry = &mut self.slots[k];
                cur = entry.next.take();
                let idx = bucket_index(entry.hash, new_cap);
                match tails[idx] {
                    Some(t) => self.slots[t].next = Some(k),
                    None => self.buckets[idx] = Some(k),
                }
                tails[idx] = Some(k);
            }
        }
        self.mod_count.bump();
    }
}

impl<K, V, S> SimpleHashtable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            buckets: vec![None; DEFAULT_CAPACITY],
            slots: SlotMap::with_key(),
            mod_count: ModCount::new(),
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, TableError> {
        let capacity = checked_capacity(capacity)?;
        Ok(Self {
            hasher,
            buckets: vec![None; capacity],
            slots: SlotMap::with_key(),
            mod_count: ModCount::new(),
        })
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find_hashed<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.buckets[bucket_index(hash, self.buckets.len())];
        while let Some(k) = cur {
            let entry = &self.slots[k];
            if entry.hash == hash && entry.key.borrow() == q {
                return Some(k);
            }
            cur = entry.next;
        }
        None
    }

    fn find<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_hashed(self.make_hash(q), q)
    }

    /// Maps `key` to `value`, returning the value it replaced.
    ///
    /// Overwriting an existing key is not a structural change: size,
    /// capacity and live cursors are unaffected.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        if let Some(k) = self.find_hashed(hash, &key) {
            return Some(std::mem::replace(&mut self.slots[k].value, value));
        }

        while self.needs_growth() {
            self.grow();
        }
        let slot = self.slots.insert(TableEntry {
            key,
            value,
            hash,
            next: None,
        });
        self.link_tail(slot, hash);
        self.mod_count.bump();
        None
    }

    /// `put` for keys coming from an optional source.
    pub fn try_put(&mut self, key: Option<K>, value: V) -> Result<Option<V>, TableError> {
        let key = key.ok_or(TableError::InvalidKey)?;
        Ok(self.put(key, value))
    }

    /// `None` only when the key is absent; a stored `V` is always returned,
    /// even when `V` is itself an empty `Option`.
    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|k| &self.slots[k].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.find(q)?;
        Some(&mut self.slots[k].value)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// Linear scan in iteration order.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|e| e.value == *value)
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let k = self.find(q)?;
        self.unlink(k).map(|(_, v)| v)
    }
}

impl<K, V, S> fmt::Display for SimpleHashtable<K, V, S>
where
    K: fmt::Display,
    V: RenderValue,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str("]")
    }
}

impl<K, V, S> fmt::Debug for SimpleHashtable<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

impl<K, V, S> Extend<(K, V)> for SimpleHashtable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for SimpleHashtable<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::with_hasher(S::default());
        table.extend(iter);
        table
    }
}
