//! Charge and use orchestration
//!
//! This module provides the `PointService` struct, which composes the
//! per-user lock manager, the balance store, and the history store into
//! operations that are atomic from the caller's perspective.
//!
//! # Design
//!
//! Every mutation runs the same sequence under the user's lock: read
//! the current balance, compute the new balance with the pure domain
//! logic, write it back, then append a history record. The lock is an
//! RAII guard, so it is released on every exit path, including domain
//! rejections and store failures.
//!
//! The balance write and the history append are two separate store
//! calls with no transaction spanning them. The balance write commits
//! first and is the source of truth; a failure between the two calls
//! surfaces as an error with the balance already updated and the
//! history record missing.
//!
//! # Architecture
//!
//! ```text
//! PointService
//!     ├── Arc<LockManager>   (per-user mutual exclusion)
//!     ├── Arc<B: BalanceStore>  (current balance per user)
//!     └── Arc<H: HistoryStore>  (append-only transaction records)
//! ```
//!
//! # Thread Safety
//!
//! The service is cloneable and safe to share across threads and tasks.
//! Operations on the same user are totally ordered by that user's lock;
//! operations on different users never contend. Reads take no lock and
//! observe only committed state.

use std::sync::{Arc, PoisonError};

use tracing::debug;

use crate::core::balance_store::InMemoryBalanceStore;
use crate::core::history_store::InMemoryHistoryStore;
use crate::core::lock_manager::LockManager;
use crate::core::traits::{BalanceStore, HistoryStore};
use crate::types::clock::now_millis;
use crate::types::{
    Balance, OperationRecord, PointError, TransactionKind, TransactionRecord, UserId,
};

/// Charge and use orchestrator
///
/// Generic over its storage backends so tests can inject failing stores
/// and a persistent backend can slot in later. The lock manager is
/// created at construction and owned by the service.
///
/// # Thread Safety
///
/// Safe to clone and use from multiple threads concurrently. Clones
/// share the same stores and the same lock map, so mutual exclusion
/// holds across all of them.
#[derive(Debug)]
pub struct PointService<B, H> {
    /// Current balance per user
    balances: Arc<B>,

    /// Append-only transaction records per user
    history: Arc<H>,

    /// Per-user mutual-exclusion handles
    ///
    /// Created here and shared by every clone of the service, so all
    /// callers serialize on the same handles.
    locks: Arc<LockManager>,

    /// Optional balance ceiling applied to charges (disabled when None)
    max_balance: Option<i64>,
}

/// The service over the in-memory stores, the composition the binary runs
pub type InMemoryPointService = PointService<InMemoryBalanceStore, InMemoryHistoryStore>;

impl InMemoryPointService {
    /// Create a service backed by fresh in-memory stores
    ///
    /// # Arguments
    ///
    /// * `max_balance` - Balance ceiling for charges, or None to disable
    pub fn in_memory(max_balance: Option<i64>) -> Self {
        PointService::new(
            Arc::new(InMemoryBalanceStore::new()),
            Arc::new(InMemoryHistoryStore::new()),
            max_balance,
        )
    }
}

impl<B, H> Clone for PointService<B, H> {
    fn clone(&self) -> Self {
        Self {
            balances: Arc::clone(&self.balances),
            history: Arc::clone(&self.history),
            locks: Arc::clone(&self.locks),
            max_balance: self.max_balance,
        }
    }
}

impl<B: BalanceStore, H: HistoryStore> PointService<B, H> {
    /// Create a new PointService over the given stores
    ///
    /// # Arguments
    ///
    /// * `balances` - Arc-wrapped balance store
    /// * `history` - Arc-wrapped history store
    /// * `max_balance` - Balance ceiling for charges, or None to disable
    pub fn new(balances: Arc<B>, history: Arc<H>, max_balance: Option<i64>) -> Self {
        Self {
            balances,
            history,
            locks: Arc::new(LockManager::new()),
            max_balance,
        }
    }

    /// Add points to a user's balance
    ///
    /// Runs read, compute, write, and history append under the user's
    /// lock. The appended record carries the same timestamp as the
    /// stored balance.
    ///
    /// # Returns
    ///
    /// * `Ok(Balance)` - The committed balance after the charge
    /// * `Err(PointError::InvalidUserId)` - If the user id is zero
    /// * `Err(PointError::InvalidAmount)` - If the amount is not positive
    /// * `Err(PointError::LimitExceeded)` - If a ceiling is configured and
    ///   the new total would exceed it
    /// * `Err(PointError::ArithmeticOverflow)` - If the addition would wrap
    /// * `Err(PointError::StoreUnavailable)` - If a store call fails
    pub fn charge(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError> {
        Self::validate_user(user_id)?;

        let lock = self.locks.get_or_create(user_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.balances.get(user_id)?;
        let credited = current.credit(amount, self.max_balance, now_millis())?;

        let stored = self.balances.put(user_id, credited.amount)?;
        self.history.append(TransactionRecord::credit(
            user_id,
            amount,
            stored.last_updated,
        ))?;

        debug!(user_id, amount, balance = stored.amount, "charge committed");
        Ok(stored)
    }

    /// Spend points from a user's balance
    ///
    /// Runs read, compute, write, and history append under the user's
    /// lock. A balance that cannot cover the amount rejects the use
    /// without touching either store.
    ///
    /// # Returns
    ///
    /// * `Ok(Balance)` - The committed balance after the use
    /// * `Err(PointError::InvalidUserId)` - If the user id is zero
    /// * `Err(PointError::InvalidAmount)` - If the amount is not positive
    /// * `Err(PointError::InsufficientBalance)` - If the balance cannot
    ///   cover the amount
    /// * `Err(PointError::StoreUnavailable)` - If a store call fails
    pub fn use_points(&self, user_id: UserId, amount: i64) -> Result<Balance, PointError> {
        Self::validate_user(user_id)?;

        let lock = self.locks.get_or_create(user_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.balances.get(user_id)?;
        let debited = current.debit(amount, now_millis())?;

        let stored = self.balances.put(user_id, debited.amount)?;
        self.history.append(TransactionRecord::debit(
            user_id,
            amount,
            stored.last_updated,
        ))?;

        debug!(user_id, amount, balance = stored.amount, "use committed");
        Ok(stored)
    }

    /// Get a user's current balance without locking
    ///
    /// Unknown users read as a zero balance. The read observes the last
    /// committed write; it never blocks behind in-flight mutations.
    pub fn get_balance(&self, user_id: UserId) -> Result<Balance, PointError> {
        Self::validate_user(user_id)?;
        self.balances.get(user_id)
    }

    /// Get a user's transaction history in commit order without locking
    pub fn get_history(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, PointError> {
        Self::validate_user(user_id)?;
        self.history.list_by_user(user_id)
    }

    /// Process an operation record by routing to charge or use
    pub fn process_operation(&self, op: OperationRecord) -> Result<Balance, PointError> {
        match op.kind {
            TransactionKind::Credit => self.charge(op.user_id, op.amount),
            TransactionKind::Debit => self.use_points(op.user_id, op.amount),
        }
    }

    /// Snapshot every stored balance for final output
    pub fn all_balances(&self) -> Result<Vec<Balance>, PointError> {
        self.balances.all()
    }

    fn validate_user(user_id: UserId) -> Result<(), PointError> {
        if user_id == 0 {
            return Err(PointError::invalid_user_id(user_id));
        }
        Ok(())
    }
}
