//! Structural modification counter.
//!
//! Every structural change to a table (new key, removal, growth, clear)
//! bumps the counter. Cursors keep a `Snapshot` and compare it on each
//! call; a mismatch means the chains they were walking may have moved.
//! Each counter also carries the id of the table it lives in, so a
//! snapshot taken from one table never verifies against another.

use crate::error::TableError;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Per-table counter. Embed it in the table and call `bump()` from every
/// structural mutation path.
#[derive(Debug)]
pub(crate) struct ModCount {
    owner: u64,
    value: u64,
}

/// Value of a `ModCount` captured at some point in time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Snapshot {
    owner: u64,
    value: u64,
}

impl Default for ModCount {
    fn default() -> Self {
        Self::new()
    }
}

impl ModCount {
    pub(crate) fn new() -> Self {
        Self {
            owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
            value: 0,
        }
    }

    #[inline]
    pub(crate) fn bump(&mut self) {
        self.value = self.value.wrapping_add(1);
    }

    #[inline]
    pub(crate) fn get(&self) -> u64 {
        self.value
    }

    #[inline]
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            owner: self.owner,
            value: self.value,
        }
    }

    /// Ok if `snap` was taken from this counter and nothing structural
    /// happened since.
    #[inline]
    pub(crate) fn verify(&self, snap: Snapshot) -> Result<(), TableError> {
        if snap.owner != self.owner {
            return Err(TableError::IllegalState("cursor belongs to another table"));
        }
        if snap.value == self.value {
            Ok(())
        } else {
            Err(TableError::ConcurrentStructuralChange {
                expected: snap.value,
                found: self.value,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_snapshot_verifies() {
        let c = ModCount::new();
        let s = c.snapshot();
        assert!(c.verify(s).is_ok());
        assert_eq!(c.get(), 0);
    }

    #[test]
    fn bump_invalidates_older_snapshots() {
        let mut c = ModCount::new();
        let s = c.snapshot();
        c.bump();
        assert_eq!(
            c.verify(s),
            Err(TableError::ConcurrentStructuralChange {
                expected: 0,
                found: 1
            })
        );
        // Still failing after more bumps; snapshots never catch up on their own.
        c.bump();
        assert!(c.verify(s).is_err());
        assert!(c.verify(c.snapshot()).is_ok());
    }

    #[test]
    fn snapshot_from_another_counter_is_rejected() {
        let a = ModCount::new();
        let b = ModCount::new();
        assert_eq!(a.get(), b.get());
        assert_eq!(
            b.verify(a.snapshot()),
            Err(TableError::IllegalState("cursor belongs to another table"))
        );
        assert!(a.verify(a.snapshot()).is_ok());
    }
}
