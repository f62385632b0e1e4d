//! Thread-safe in-memory balance storage
//!
//! This module provides the `InMemoryBalanceStore` struct, which stores
//! per-user balances using concurrent data structures to enable safe
//! multi-threaded access.
//!
//! # Design
//!
//! The store uses `DashMap` (a concurrent HashMap) to provide thread-safe
//! balance storage with fine-grained locking. Individual reads and writes
//! are atomic single-value operations; the read-modify-write sequence of
//! a charge or use is serialized above this layer by the service's
//! per-user lock, never here.
//!
//! # Thread Safety
//!
//! All operations are thread-safe and prevent data races through
//! DashMap's internal synchronization. Concurrent access to different
//! users never blocks; concurrent writes to the same user are applied
//! last-writer-wins.

use crate::core::traits::BalanceStore;
use crate::types::clock::now_millis;
use crate::types::{Balance, PointError, UserId};
use dashmap::DashMap;

/// Thread-safe in-memory balance store
///
/// Balances are keyed by user ID. Unknown users read as a zero balance
/// without creating an entry, so lookups never grow the map; only `put`
/// inserts.
#[derive(Debug)]
pub struct InMemoryBalanceStore {
    /// Concurrent HashMap storing balances by user ID
    ///
    /// DashMap provides fine-grained locking through internal sharding,
    /// allowing concurrent access to different users without global locks.
    balances: DashMap<UserId, Balance>,
}

impl InMemoryBalanceStore {
    /// Create a new empty InMemoryBalanceStore
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }
}

impl Default for InMemoryBalanceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceStore for InMemoryBalanceStore {
    /// Get a user's balance (read-only, thread-safe)
    ///
    /// The stored balance is cloned to avoid holding shard locks longer
    /// than necessary. A user with no stored balance reads as a freshly
    /// materialized zero balance; the map is not modified.
    fn get(&self, user_id: UserId) -> Result<Balance, PointError> {
        Ok(self
            .balances
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| Balance::empty(user_id, now_millis())))
    }

    /// Overwrite a user's balance (thread-safe)
    ///
    /// Stores the given amount with a current timestamp, creating the
    /// entry if absent. Returns the record as stored.
    fn put(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError> {
        let stored = Balance {
            user_id,
            amount,
            last_updated: now_millis(),
        };
        self.balances.insert(user_id, stored.clone());
        Ok(stored)
    }

    /// Snapshot all stored balances (thread-safe)
    ///
    /// Entries are cloned shard by shard; the snapshot is consistent per
    /// user but not across users while writers are active.
    fn all(&self) -> Result<Vec<Balance>, PointError> {
        Ok(self
            .balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_unknown_user_returns_zero_balance() {
        let store = InMemoryBalanceStore::new();

        let balance = store.get(42).unwrap();
        assert_eq!(balance.user_id, 42);
        assert_eq!(balance.amount, 0);
        assert!(balance.last_updated > 0);
    }

    #[test]
    fn test_get_does_not_insert() {
        let store = InMemoryBalanceStore::new();

        store.get(42).unwrap();
        store.get(43).unwrap();

        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let store = InMemoryBalanceStore::new();

        let stored = store.put(1, 1000).unwrap();
        assert_eq!(stored.user_id, 1);
        assert_eq!(stored.amount, 1000);

        let read = store.get(1).unwrap();
        assert_eq!(read, stored);
    }

    #[test]
    fn test_put_overwrites_existing_balance() {
        let store = InMemoryBalanceStore::new();

        store.put(1, 1000).unwrap();
        store.put(1, 700).unwrap();

        assert_eq!(store.get(1).unwrap().amount, 700);
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn test_all_returns_every_stored_balance() {
        let store = InMemoryBalanceStore::new();

        store.put(1, 100).unwrap();
        store.put(2, 200).unwrap();
        store.put(3, 300).unwrap();

        let mut balances = store.all().unwrap();
        balances.sort_by_key(|balance| balance.user_id);

        assert_eq!(balances.len(), 3);
        assert_eq!(balances[0].amount, 100);
        assert_eq!(balances[1].amount, 200);
        assert_eq!(balances[2].amount, 300);
    }

    #[test]
    fn test_concurrent_puts_to_different_users() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryBalanceStore::new());

        let mut handles = vec![];
        for i in 1u64..=10u64 {
            let store_clone = Arc::clone(&store);
            let handle = thread::spawn(move || {
                store_clone.put(i, i as i64 * 100).unwrap();
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        for i in 1u64..=10u64 {
            assert_eq!(store.get(i).unwrap().amount, i as i64 * 100);
        }
    }
}
