//! Core traits for balance storage and transaction history
//!
//! This module defines the storage abstractions the service is built
//! against, so the in-memory backends can be swapped for a persistent
//! store without touching the orchestration logic.

use crate::types::{Balance, PointError, TransactionRecord, UserId};

/// Trait for keyed balance storage
///
/// Provides point lookup and point replacement of a user's balance.
/// Implementations supply their own synchronization for single reads
/// and writes; read-modify-write sequences are serialized externally
/// by the service's per-user lock.
pub trait BalanceStore: Send + Sync {
    /// Get the stored balance for a user
    ///
    /// Returns a freshly materialized zero balance when none exists;
    /// nothing is inserted by a read.
    fn get(&self, user_id: UserId) -> Result<Balance, PointError>;

    /// Unconditionally overwrite a user's balance with the given amount
    ///
    /// Last-writer-wins. Returns the stored record with its new
    /// `last_updated` timestamp.
    fn put(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError>;

    /// Snapshot every stored balance for final output
    fn all(&self) -> Result<Vec<Balance>, PointError>;
}

/// Trait for append-only transaction history storage
///
/// Records are validated and receive a store-local sequence number on
/// append; they are never mutated or removed afterwards.
pub trait HistoryStore: Send + Sync {
    /// Validate a record, assign its id, and append it to the owning
    /// user's sequence
    ///
    /// Returns the stored record with the id populated. Append order
    /// reflects commit order.
    fn append(&self, record: TransactionRecord) -> Result<TransactionRecord, PointError>;

    /// All records for a user in append order (empty if none)
    fn list_by_user(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError>;
}
