//! Batch replay with user-based partitioning
//!
//! This module provides the `ReplayProcessor` struct, which manages concurrent
//! batch processing with user-based partitioning, and the `replay_file` pipeline
//! that drives a full CSV replay through a `PointService`.
//!
//! # Design
//!
//! The `ReplayProcessor` partitions batches by user ID, allowing operations for
//! different users to be processed concurrently while maintaining sequential
//! ordering for each individual user's operations. Batches are processed
//! sequentially so that per-user ordering holds across the entire file.
//!
//! # Architecture
//!
//! ```text
//! replay_file
//!     ├── ReplayConfig    (batch_size, max_concurrent_users, max_balance)
//!     ├── OperationReader (batch CSV reading)
//!     ├── ReplayProcessor (user partitioning + task spawning)
//!     └── PointService    (per-user locking, balance + history stores)
//! ```
//!
//! # Thread Safety
//!
//! The processor is cloneable and can be safely shared across async tasks.
//! All internal state is protected by Arc, and the underlying service uses
//! thread-safe components.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tracing::{error, warn};

use crate::core::service::InMemoryPointService;
use crate::io::csv_format::write_balances_csv;
use crate::io::reader::OperationReader;
use crate::types::{Balance, OperationRecord, PointError, UserId};

/// Result of replaying a single operation
///
/// Contains the original operation record and the result of applying it.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// The operation record that was applied
    pub record: OperationRecord,

    /// The result of applying it (updated balance or error)
    pub result: Result<Balance, PointError>,
}

/// Configuration for batch replay
///
/// Controls how operations are batched, the number of worker threads for
/// parallel processing within each batch, and the optional balance ceiling
/// enforced on charges.
#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Number of operations per batch
    pub batch_size: usize,
    /// Maximum number of users processing concurrently
    pub max_concurrent_users: usize,
    /// Balance ceiling applied to charges, or None for no ceiling
    pub max_balance: Option<i64>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_users: num_cpus::get(),
            max_balance: None,
        }
    }
}

impl ReplayConfig {
    /// Create a new ReplayConfig with custom values
    ///
    /// Zero values for `batch_size` and `max_concurrent_users` fall back to
    /// the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_users: usize, max_balance: Option<i64>) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_users = if max_concurrent_users == 0 {
            warn!(
                "Invalid max_concurrent_users ({}), using default ({})",
                max_concurrent_users, default.max_concurrent_users
            );
            default.max_concurrent_users
        } else {
            max_concurrent_users
        };

        Self {
            batch_size,
            max_concurrent_users,
            max_balance,
        }
    }
}

/// Batch replay processor with user-based partitioning
///
/// `ReplayProcessor` manages concurrent batch replay by partitioning
/// operations by user ID. This enables parallel processing of operations
/// for different users while maintaining sequential ordering for each user.
#[derive(Debug, Clone)]
pub struct ReplayProcessor {
    /// Thread-safe point service
    ///
    /// Wrapped in Arc to enable sharing across async tasks.
    service: Arc<InMemoryPointService>,
}

impl ReplayProcessor {
    /// Create a new ReplayProcessor
    ///
    /// # Arguments
    ///
    /// * `service` - Arc-wrapped PointService that applies the operations
    ///
    /// # Returns
    ///
    /// A new `ReplayProcessor` that can be cloned and shared across async tasks.
    pub fn new(service: Arc<InMemoryPointService>) -> Self {
        Self { service }
    }

    /// Partition a batch of operations by user ID
    ///
    /// This method partitions a batch into sub-batches where each sub-batch
    /// contains only operations for a single user. This enables parallel
    /// processing of operations for different users while maintaining
    /// sequential ordering for each user.
    ///
    /// # Arguments
    ///
    /// * `batch` - A vector of operation records to partition
    ///
    /// # Returns
    ///
    /// A HashMap where:
    /// - Keys are user IDs
    /// - Values are vectors of operations for that user (in original order)
    ///
    /// # Guarantees
    ///
    /// - Each operation appears in exactly one sub-batch
    /// - No operations are lost or duplicated
    /// - Operations for each user maintain their original order
    pub fn partition_by_user(
        &self,
        batch: Vec<OperationRecord>,
    ) -> HashMap<UserId, Vec<OperationRecord>> {
        let mut user_batches: HashMap<UserId, Vec<OperationRecord>> = HashMap::new();

        for record in batch {
            user_batches.entry(record.user_id).or_default().push(record);
        }

        user_batches
    }

    /// Apply all operations for a single user sequentially
    ///
    /// This method applies all operations for a single user in the order they
    /// appear in the input vector. This ensures that per-user operation
    /// ordering is maintained even when multiple users are being processed
    /// concurrently.
    ///
    /// # Arguments
    ///
    /// * `operations` - A vector of operations for one user (in order)
    ///
    /// # Returns
    ///
    /// A vector of `ReplayOutcome` containing the result of each operation.
    /// Outcomes are in the same order as the input operations.
    ///
    /// # Guarantees
    ///
    /// - Operations are applied in the order they appear in the input vector
    /// - All operations are applied, even if some fail
    /// - Errors are captured in the outcome and don't stop processing
    pub async fn process_user_operations(
        &self,
        operations: Vec<OperationRecord>,
    ) -> Vec<ReplayOutcome> {
        let mut outcomes = Vec::with_capacity(operations.len());

        for record in operations {
            let result = self.service.process_operation(record.clone());
            outcomes.push(ReplayOutcome { record, result });
        }

        outcomes
    }

    /// Process a batch of operations with user-based partitioning
    ///
    /// This method processes a batch of operations by:
    /// 1. Partitioning the batch by user ID
    /// 2. Spawning tokio tasks to process each user's operations concurrently
    /// 3. Waiting for all tasks to complete
    /// 4. Collecting and returning all outcomes
    ///
    /// # Arguments
    ///
    /// * `batch` - A vector of operation records to process
    ///
    /// # Returns
    ///
    /// A vector of `ReplayOutcome` containing the result of each operation.
    /// Outcomes may be in a different order than the input due to concurrent
    /// processing.
    ///
    /// # Guarantees
    ///
    /// - Operations for different users are processed concurrently
    /// - Operations for the same user are processed sequentially in order
    /// - All operations are processed, even if some fail
    /// - Errors are captured in outcomes and don't stop processing
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<ReplayOutcome> {
        // Partition batch by user ID
        let user_batches = self.partition_by_user(batch);

        // Spawn tokio tasks for each user's operations
        let mut tasks = Vec::new();
        for (_user_id, operations) in user_batches {
            let processor = self.clone();
            let task = tokio::spawn(async move {
                processor.process_user_operations(operations).await
            });
            tasks.push(task);
        }

        // Wait for all tasks to complete and collect outcomes
        let mut outcomes = Vec::new();
        for task in tasks {
            match task.await {
                Ok(user_outcomes) => outcomes.extend(user_outcomes),
                Err(e) => {
                    error!("Replay task panicked: {:?}", e);
                }
            }
        }

        outcomes
    }
}

/// Replay a CSV operation file and write final balances to output
///
/// This function implements the complete batch replay pipeline:
/// 1. Creates a fresh in-memory `PointService` with the configured ceiling
/// 2. Creates a `ReplayProcessor` for user-based partitioning
/// 3. Creates a tokio multi-threaded runtime
/// 4. Reads operations in batches from CSV using `OperationReader`
/// 5. Processes each batch sequentially (waits for completion before next batch)
/// 6. Within each batch, processes different users in parallel
/// 7. Collects final balances
/// 8. Writes balances to output using the csv_format module
///
/// # Arguments
///
/// * `input_path` - Path to the input CSV file
/// * `config` - Replay configuration
/// * `output` - Mutable reference to a writer for the final balances
///
/// # Returns
///
/// * `Ok(())` if the replay completed successfully
/// * `Err(String)` if a fatal error occurred
///
/// # Error Handling
///
/// Fatal errors (file not found, I/O errors, runtime errors) are returned
/// immediately. Individual operation rejections are logged and the replay
/// continues.
pub fn replay_file(
    input_path: &Path,
    config: &ReplayConfig,
    output: &mut dyn Write,
) -> Result<(), String> {
    // Multi-threaded runtime with the configured number of worker threads
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.max_concurrent_users)
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

    runtime.block_on(async {
        let service = Arc::new(InMemoryPointService::in_memory(config.max_balance));
        let processor = ReplayProcessor::new(Arc::clone(&service));

        let mut reader = OperationReader::new(input_path)?;

        // Process batches sequentially to maintain per-user ordering across
        // the entire file. Each batch still runs different users in parallel.
        loop {
            let batch = reader.read_batch(config.batch_size);

            if batch.is_empty() {
                break;
            }

            let outcomes = processor.process_batch(batch).await;

            for outcome in outcomes {
                if let Err(error) = &outcome.result {
                    warn!(
                        user_id = outcome.record.user_id,
                        %error,
                        "operation rejected"
                    );
                }
            }
        }

        let balances = service
            .all_balances()
            .map_err(|e| format!("Failed to collect balances: {}", e))?;

        write_balances_csv(&balances, output)?;

        Ok(())
    })
}
