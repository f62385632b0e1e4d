//! Thread-safe append-only transaction history storage
//!
//! This module provides the `InMemoryHistoryStore` struct, which keeps
//! every committed charge and use as an immutable record in a per-user
//! sequence.
//!
//! # Design
//!
//! Records live in a `DashMap` keyed by user ID, each entry holding the
//! user's records in append order. Identifiers come from a single atomic
//! counter, so ids are unique and monotonically increasing across the
//! whole store. Records are validated before an id is assigned; an
//! invalid record is rejected without consuming an id.
//!
//! # Thread Safety
//!
//! All operations are thread-safe. Appends for the same user are
//! serialized by the map's per-entry locking; appends for different
//! users proceed concurrently.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::core::traits::HistoryStore;
use crate::types::{PointError, TransactionRecord, UserId};
use dashmap::DashMap;

/// Thread-safe append-only history store
///
/// Assigns store-local sequence numbers starting at 1 and keeps records
/// in per-user append order. Records are never mutated or removed.
#[derive(Debug)]
pub struct InMemoryHistoryStore {
    /// Concurrent HashMap storing record sequences by user ID
    records: DashMap<UserId, Vec<TransactionRecord>>,

    /// Next id to assign, shared across all users
    next_id: AtomicI64,
}

impl InMemoryHistoryStore {
    /// Create a new empty InMemoryHistoryStore
    ///
    /// The first appended record receives id 1.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    /// Validate, number, and append a record (thread-safe)
    ///
    /// # Returns
    ///
    /// The stored record with its assigned id, or the validation error
    /// if the record's user id, amount, or timestamp is invalid. Nothing
    /// is appended and no id is consumed on rejection.
    fn append(&self, record: TransactionRecord) -> Result<TransactionRecord, PointError> {
        record.validate()?;

        let stored = TransactionRecord {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            ..record
        };

        self.records
            .entry(stored.user_id)
            .or_default()
            .push(stored.clone());

        Ok(stored)
    }

    /// All records for a user in append order (read-only, thread-safe)
    ///
    /// The sequence is cloned to avoid holding shard locks longer than
    /// necessary. A user with no records yields an empty vector.
    fn list_by_user(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError> {
        Ok(self
            .records
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_append_assigns_increasing_ids() {
        let store = InMemoryHistoryStore::new();

        let first = store
            .append(TransactionRecord::credit(1, 1000, NOW))
            .unwrap();
        let second = store
            .append(TransactionRecord::debit(1, 300, NOW + 1))
            .unwrap();
        let third = store
            .append(TransactionRecord::credit(2, 500, NOW + 2))
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        // Ids are store-local, not per-user
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_list_by_user_preserves_append_order() {
        let store = InMemoryHistoryStore::new();

        store
            .append(TransactionRecord::credit(1, 1000, NOW))
            .unwrap();
        store
            .append(TransactionRecord::debit(1, 300, NOW + 1))
            .unwrap();
        store
            .append(TransactionRecord::credit(2, 999, NOW + 2))
            .unwrap();

        let records = store.list_by_user(1).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_credit());
        assert_eq!(records[0].amount, 1000);
        assert!(records[1].is_debit());
        assert_eq!(records[1].amount, 300);
    }

    #[test]
    fn test_list_unknown_user_is_empty() {
        let store = InMemoryHistoryStore::new();
        assert!(store.list_by_user(999).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_record_is_rejected_without_append() {
        let store = InMemoryHistoryStore::new();

        let result = store.append(TransactionRecord::credit(1, 0, NOW));
        assert_eq!(result, Err(PointError::InvalidAmount { amount: 0 }));

        let result = store.append(TransactionRecord::credit(0, 100, NOW));
        assert_eq!(result, Err(PointError::InvalidUserId { user_id: 0 }));

        let result = store.append(TransactionRecord::credit(1, 100, 0));
        assert_eq!(result, Err(PointError::InvalidTimestamp { timestamp: 0 }));

        assert!(store.list_by_user(1).unwrap().is_empty());

        // Rejections must not consume ids
        let stored = store
            .append(TransactionRecord::credit(1, 100, NOW))
            .unwrap();
        assert_eq!(stored.id, 1);
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryHistoryStore::new());

        let mut handles = vec![];
        for i in 1u64..=10u64 {
            let store_clone = Arc::clone(&store);
            let handle = thread::spawn(move || {
                for j in 0..20 {
                    store_clone
                        .append(TransactionRecord::credit(i, 100 + j, NOW + j))
                        .unwrap();
                }
            });
            handles.push(handle);
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let mut ids = vec![];
        for i in 1u64..=10u64 {
            let records = store.list_by_user(i).unwrap();
            assert_eq!(records.len(), 20);
            ids.extend(records.iter().map(|record| record.id));
        }

        // Every id assigned exactly once
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}
