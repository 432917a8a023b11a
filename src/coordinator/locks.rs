//! Per-order and per-table guards.
//!
//! Every mutating unit of work on an order holds that order's guard from its first read
//! to its last write. The order guard is try-locked: a second unit of work on the same
//! order fails at once with [`PosError::ConcurrencyConflict`] instead of queueing.
//!
//! Table guards serialise the read-then-write steps on one table's occupancy (placing
//! an order on it, releasing it once its last active order is done). They are awaited,
//! never try-locked, and are only taken while no table guard is already held.
//!
//! A slot lives in the map only while someone holds or waits on it; the last guard to
//! drop removes it.

use crate::error::PosError;
use crate::model::{OrderId, TableId};
use dashmap::DashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

type Slots<K> = Arc<DashMap<K, Arc<Mutex<()>>>>;

/// One mutex per key, created on first use.
pub struct KeyedLocks<K: Eq + Hash> {
    slots: Slots<K>,
}

pub type OrderLocks = KeyedLocks<OrderId>;
pub type OrderGuard = KeyGuard<OrderId>;
pub type TableLocks = KeyedLocks<TableId>;
pub type TableGuard = KeyGuard<TableId>;

impl<K: Eq + Hash> Clone for KeyedLocks<K> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<K: Eq + Hash> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
        }
    }
}

/// Held for the duration of one unit of work. Released on drop.
#[must_use = "the key is only guarded while this value is alive"]
pub struct KeyGuard<K: Eq + Hash> {
    key: K,
    held: Option<OwnedMutexGuard<()>>,
    slots: Slots<K>,
}

impl<K: Eq + Hash> KeyGuard<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

impl<K: Eq + Hash> Drop for KeyGuard<K> {
    fn drop(&mut self) {
        // The held guard owns a reference to the slot; unlock before counting.
        drop(self.held.take());
        self.slots
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl<K: Eq + Hash + Clone + Display> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &K) -> Arc<Mutex<()>> {
        self.slots.entry(key.clone()).or_default().clone()
    }

    fn guard(&self, key: &K, held: OwnedMutexGuard<()>) -> KeyGuard<K> {
        KeyGuard {
            key: key.clone(),
            held: Some(held),
            slots: Arc::clone(&self.slots),
        }
    }

    /// Takes the guard if it is free.
    pub fn try_lock(&self, key: &K) -> Option<KeyGuard<K>> {
        match self.slot(key).try_lock_owned() {
            Ok(held) => Some(self.guard(key, held)),
            Err(_) => {
                debug!(%key, "Guard contended");
                None
            }
        }
    }

    /// Waits for the guard.
    pub async fn lock(&self, key: &K) -> KeyGuard<K> {
        let held = self.slot(key).lock_owned().await;
        self.guard(key, held)
    }

    /// Keys with a live slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl OrderLocks {
    pub fn try_acquire(&self, order: &OrderId) -> Result<OrderGuard, PosError> {
        self.try_lock(order)
            .ok_or_else(|| PosError::ConcurrencyConflict(order.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_conflicts_until_release() {
        let locks = OrderLocks::new();
        let guard = locks.try_acquire(&OrderId(1)).unwrap();
        assert_eq!(
            locks.try_acquire(&OrderId(1)).err(),
            Some(PosError::ConcurrencyConflict(OrderId(1)))
        );
        assert!(locks.try_acquire(&OrderId(2)).is_ok());

        drop(guard);
        assert!(locks.try_acquire(&OrderId(1)).is_ok());
    }

    #[test]
    fn test_slots_are_removed_when_the_last_guard_drops() {
        let locks = OrderLocks::new();
        let guard = locks.try_acquire(&OrderId(1)).unwrap();
        assert!(locks.try_acquire(&OrderId(1)).is_err());
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert!(locks.is_empty());

        for id in 1..=100 {
            drop(locks.try_acquire(&OrderId(id)).unwrap());
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_waiter_keeps_the_slot_alive() {
        let locks = TableLocks::new();
        let first = locks.lock(&TableId(1)).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let guard = locks.lock(&TableId(1)).await;
                *guard.key() == TableId(1)
            })
        };
        tokio::task::yield_now().await;
        assert!(locks.try_lock(&TableId(1)).is_none());

        drop(first);
        assert!(waiter.await.unwrap());
        assert!(locks.is_empty());
    }
}
