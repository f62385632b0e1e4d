//! Points Engine Library
//! # Overview
//!
//! This library provides a concurrency-safe per-user point balance system with
//! an append-only transaction history and a batch replay pipeline over CSV
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Balance, TransactionRecord, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::service`] - Charge/use orchestration with per-user locking
//!   - [`core::balance_store`] - Current balance state per user
//!   - [`core::history_store`] - Append-only transaction history
//!   - [`core::lock_manager`] - Per-user mutex registry
//!   - [`core::replay`] - Batch replay pipeline over CSV operation files
//! - [`io`] - CSV reading and output
//!
//! # Operations
//!
//! The service supports four operations:
//!
//! - **Charge**: Credit points to a user's balance
//! - **Use**: Debit points from a user's balance (requires sufficient balance)
//! - **Get balance**: Read a user's current balance
//! - **Get history**: Read a user's transaction records in append order
//!
//! # Concurrency Model
//!
//! Every mutating operation runs under that user's lock: acquire the lock,
//! read the balance, compute the new balance, write it back, append a history
//! record, release the lock. Operations for different users never contend,
//! and reads do not take the lock at all.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use crate::core::{BalanceStore, HistoryStore, InMemoryPointService, PointService};
pub use crate::io::write_balances_csv;
pub use crate::types::{
    Balance, OperationRecord, PointError, TransactionKind, TransactionRecord, UserId,
};
