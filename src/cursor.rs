//! Cursor: detached, fail-fast walk over a `SimpleHashtable`.
//!
//! A cursor does not borrow the table. Each call takes the table as an
//! argument, which leaves the caller free to mutate the table between
//! calls; the cursor notices through the modification counter and
//! refuses to continue. The counter also names the table it came from, so
//! a cursor handed a different table fails with `IllegalState`.

use crate::error::TableError;
use crate::mod_count::Snapshot;
use crate::simple_hashtable::{SimpleHashtable, TableEntry};
use slotmap::DefaultKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// No entry returned yet.
    Fresh,
    /// At least one entry returned and more remain.
    Advancing,
    /// Every entry has been returned.
    Exhausted,
}

#[derive(Clone, Debug)]
pub struct Cursor {
    expected: Snapshot,
    // Bucket index and slot of the next entry to hand out.
    upcoming: Option<(usize, DefaultKey)>,
    // Entry returned by the last `next`, cleared by `remove`.
    last: Option<DefaultKey>,
    state: CursorState,
}

impl Cursor {
    pub(crate) fn new<K, V, S>(table: &SimpleHashtable<K, V, S>) -> Self {
        Self {
            expected: table.mod_count.snapshot(),
            upcoming: table.first_entry_from(0),
            last: None,
            state: CursorState::Fresh,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    fn check<K, V, S>(&self, table: &SimpleHashtable<K, V, S>) -> Result<(), TableError> {
        table.mod_count.verify(self.expected).inspect_err(|e| {
            log::debug!("cursor invalidated: {}", e);
        })
    }

    pub fn has_next<K, V, S>(&self, table: &SimpleHashtable<K, V, S>) -> Result<bool, TableError> {
        self.check(table)?;
        Ok(self.upcoming.is_some())
    }

    /// Returns the next entry in bucket-then-chain order.
    pub fn next<'t, K, V, S>(
        &mut self,
        table: &'t SimpleHashtable<K, V, S>,
    ) -> Result<&'t TableEntry<K, V>, TableError> {
        self.check(table)?;
        let Some((bucket, slot)) = self.upcoming else {
            self.state = CursorState::Exhausted;
            return Err(TableError::Exhausted);
        };
        let entry = table
            .slots
            .get(slot)
            .ok_or(TableError::IllegalState("cursor position is not in this table"))?;

        self.upcoming = match entry.next {
            Some(n) => Some((bucket, n)),
            None => table.first_entry_from(bucket + 1),
        };
        self.last = Some(slot);
        self.state = if self.upcoming.is_some() {
            CursorState::Advancing
        } else {
            CursorState::Exhausted
        };
        Ok(entry)
    }

    /// Removes the entry returned by the last `next` from `table`.
    ///
    /// Allowed once per `next`. The cursor adopts the table's new counter
    /// value, so its own removals never look like outside interference.
    pub fn remove<K, V, S>(
        &mut self,
        table: &mut SimpleHashtable<K, V, S>,
    ) -> Result<(K, V), TableError> {
        self.check(table)?;
        let slot = self
            .last
            .take()
            .ok_or(TableError::IllegalState("remove requires a preceding next"))?;
        let removed = table
            .unlink(slot)
            .ok_or(TableError::IllegalState("entry is no longer in the table"))?;
        self.expected = table.mod_count.snapshot();
        Ok(removed)
    }
}
