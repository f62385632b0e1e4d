//! Core business logic module
//!
//! This module contains the point management components:
//! - `traits` - Trait abstractions for interchangeable store implementations
//! - `service` - Charge/use orchestration with per-user locking
//! - `balance_store` - Current balance state per user
//! - `history_store` - Append-only transaction history
//! - `lock_manager` - Per-user mutex registry
//! - `replay` - Batch replay pipeline over CSV operation files

pub mod balance_store;
pub mod history_store;
pub mod lock_manager;
pub mod replay;
pub mod service;
pub mod traits;

pub use balance_store::InMemoryBalanceStore;
pub use history_store::InMemoryHistoryStore;
pub use lock_manager::LockManager;
pub use replay::{replay_file, ReplayConfig, ReplayOutcome, ReplayProcessor};
pub use service::{InMemoryPointService, PointService};
pub use traits::{BalanceStore, HistoryStore};
