// SPDX-License-Identifier: MIT OR Apache-2.0
//! Compacting id pool.
//!
//! Maps small integer ids onto values so callers across a process boundary
//! can hold an id instead of a live reference. Slots are addressed by
//! `id - base_id`; releasing the base id drops every contiguous released
//! slot at the front, so the backing storage only covers ids from the oldest
//! live one up to the newest.

use serde::Serialize;
use std::collections::VecDeque;

/// Error raised by [`IdPool`] lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Id was never issued or has already been released
    #[error("invalid pool id: {0}")]
    InvalidId(u64),
}

/// Dense id-to-value pool with a shifting base
#[derive(Debug, Clone)]
pub struct IdPool<T> {
    slots: VecDeque<Option<T>>,
    base_id: u64,
    next_id: u64,
}

impl<T> IdPool<T> {
    /// Create an empty pool. The first id issued is 1 so an id is never zero.
    pub fn new() -> Self {
        Self {
            slots: VecDeque::new(),
            base_id: 1,
            next_id: 1,
        }
    }

    /// Issue the next id and store the value built for it
    pub fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push_back(Some(build(id)));
        id
    }

    fn index(&self, id: u64) -> Option<usize> {
        if id < self.base_id || id >= self.next_id {
            return None;
        }
        usize::try_from(id - self.base_id).ok()
    }

    /// Look up a live value
    pub fn get(&self, id: u64) -> Result<&T, PoolError> {
        self.index(id)
            .and_then(|i| self.slots.get(i))
            .and_then(Option::as_ref)
            .ok_or(PoolError::InvalidId(id))
    }

    /// Look up a live value mutably
    pub fn get_mut(&mut self, id: u64) -> Result<&mut T, PoolError> {
        let index = self.index(id).ok_or(PoolError::InvalidId(id))?;
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(PoolError::InvalidId(id))
    }

    /// Release an id, returning its value
    pub fn release(&mut self, id: u64) -> Result<T, PoolError> {
        let index = self.index(id).ok_or(PoolError::InvalidId(id))?;
        let value = self
            .slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(PoolError::InvalidId(id))?;

        // Shift out the released run at the front
        while matches!(self.slots.front(), Some(None)) {
            self.slots.pop_front();
            self.base_id += 1;
        }
        Ok(value)
    }

    /// Whether the id refers to a live value
    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_ok()
    }

    /// Number of live values
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of slots currently backed, live or pending release
    pub fn backing_len(&self) -> usize {
        self.slots.len()
    }

    /// Id of the zeroth slot
    pub fn base_id(&self) -> u64 {
        self.base_id
    }

    /// Id that the next insert will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Drop every value. Ids keep increasing so stale ids stay invalid.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.base_id = self.next_id;
    }

    /// Iterate live values in id order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> {
        let base = self.base_id;
        self.slots
            .iter()
            .zip(base..)
            .filter_map(|(slot, id)| slot.as_ref().map(|value| (id, value)))
    }
}

impl<T> Default for IdPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnostic view of a pool
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot<'a, T> {
    /// Slots from the base id, `None` for released ids
    pub pool: &'a VecDeque<Option<T>>,
    /// Id of the zeroth slot
    pub pool_base_id: u64,
    /// Id the next insert will receive
    pub next_id: u64,
}

impl<T: Serialize> IdPool<T> {
    /// Borrow the pool as a serializable snapshot
    pub fn snapshot(&self) -> PoolSnapshot<'_, T> {
        PoolSnapshot {
            pool: &self.slots,
            pool_base_id: self.base_id,
            next_id: self.next_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut pool = IdPool::new();
        let a = pool.insert_with(|id| id * 10);
        let b = pool.insert_with(|id| id * 10);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(*pool.get(b).unwrap(), 20);
    }

    #[test]
    fn test_lookup_fails_for_unissued_and_released() {
        let mut pool = IdPool::new();
        let a = pool.insert_with(|_| "a");
        assert_eq!(pool.get(0), Err(PoolError::InvalidId(0)));
        assert_eq!(pool.get(2), Err(PoolError::InvalidId(2)));

        assert_eq!(pool.release(a), Ok("a"));
        assert_eq!(pool.get(a), Err(PoolError::InvalidId(a)));
        assert_eq!(pool.release(a), Err(PoolError::InvalidId(a)));
    }

    #[test]
    fn test_release_in_order_stays_compact() {
        let mut pool = IdPool::new();
        let mut live = std::collections::VecDeque::new();
        for n in 0..1000 {
            live.push_back(pool.insert_with(|_| n));
            if live.len() > 3 {
                let oldest = live.pop_front().unwrap();
                pool.release(oldest).unwrap();
            }
            assert!(pool.backing_len() <= 3 + 1);
        }
        assert_eq!(pool.live_count(), 3);
        assert_eq!(pool.backing_len(), 3);
        assert_eq!(pool.next_id(), 1001);
    }

    #[test]
    fn test_out_of_order_release_shifts_when_base_goes() {
        let mut pool = IdPool::new();
        let a = pool.insert_with(|_| 'a');
        let b = pool.insert_with(|_| 'b');
        let c = pool.insert_with(|_| 'c');

        pool.release(b).unwrap();
        assert_eq!(pool.backing_len(), 3);
        assert_eq!(pool.base_id(), a);

        pool.release(a).unwrap();
        assert_eq!(pool.backing_len(), 1);
        assert_eq!(pool.base_id(), c);
        assert_eq!(pool.iter().collect::<Vec<_>>(), vec![(c, &'c')]);
    }

    #[test]
    fn test_reset_keeps_ids_unique() {
        let mut pool = IdPool::new();
        let a = pool.insert_with(|_| ());
        pool.reset();
        assert!(!pool.contains(a));
        let b = pool.insert_with(|_| ());
        assert!(b > a);
        assert!(pool.contains(b));
    }
}
