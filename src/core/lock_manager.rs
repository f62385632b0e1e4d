//! Per-user lock management
//!
//! This module provides the `LockManager` struct, which hands out one
//! mutual-exclusion handle per user ID so the service can serialize the
//! read-modify-write sequence of a charge or use.
//!
//! # Design
//!
//! Handles are `Arc<Mutex<()>>` values stored in a `DashMap`. Handle
//! creation goes through the map's entry API, which makes first access
//! atomic: two threads racing to create the lock for the same user
//! always observe the same handle, never two. Requesting a handle for
//! one user never blocks requests for another.
//!
//! Handles live for the lifetime of the manager. The map grows with the
//! set of users ever touched and entries are not evicted; bounding it
//! would require reference counting before removal and is out of scope.
//!
//! # Poisoning
//!
//! The mutex guards no data of its own. All protected state lives in
//! the stores, so a handle poisoned by a panicking holder carries no
//! torn state; callers recover the guard with `PoisonError::into_inner`
//! instead of propagating the poison.

use std::sync::{Arc, Mutex};

use crate::types::UserId;
use dashmap::DashMap;

/// Per-user mutual-exclusion handle registry
///
/// One handle per user ID, created on demand and reused for every
/// subsequent operation on that user.
#[derive(Debug)]
pub struct LockManager {
    /// Concurrent HashMap storing lock handles by user ID
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl LockManager {
    /// Create a new LockManager with no handles
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock handle for a user, creating it on first access
    ///
    /// The returned handle is shared: every caller asking for the same
    /// user receives a clone of the same `Arc`, so locking it gives
    /// mutual exclusion across all holders.
    ///
    /// # Thread Safety
    ///
    /// Safe to call from multiple threads concurrently, including for
    /// the same user's first access. The entry API serializes creation,
    /// so exactly one handle is ever created per user.
    pub fn get_or_create(&self, user_id: UserId) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

impl Default for LockManager {
    fn default() -> Self {
        Self::new()
    }
}
