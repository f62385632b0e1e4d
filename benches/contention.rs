//! Benchmark suite for lock contention on the point service
//!
//! This benchmark compares charge throughput when every thread targets the
//! same user (full serialization behind one lock) against threads spread
//! across distinct users (no contention), using the divan benchmarking
//! framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```

use points_engine::core::service::InMemoryPointService;
use std::sync::Arc;
use std::thread;

fn main() {
    divan::main();
}

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 100;

/// Benchmark charges from many threads all targeting the same user
///
/// Every operation serializes behind one user lock, so this measures the
/// worst case for contention.
#[divan::bench]
fn same_user_charges() {
    let service = Arc::new(InMemoryPointService::in_memory(None));

    let mut handles = Vec::new();
    for _ in 0..THREADS {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for _ in 0..OPS_PER_THREAD {
                service.charge(1, 10).expect("charge failed");
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}

/// Benchmark charges from many threads each targeting a distinct user
///
/// Operations for different users take different locks, so this measures
/// the uncontended parallel case.
#[divan::bench]
fn distinct_user_charges() {
    let service = Arc::new(InMemoryPointService::in_memory(None));

    let mut handles = Vec::new();
    for thread_id in 0..THREADS {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            let user_id = thread_id as u64 + 1;
            for _ in 0..OPS_PER_THREAD {
                service.charge(user_id, 10).expect("charge failed");
            }
        }));
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}

/// Benchmark a single thread alternating charge and use on one user
#[divan::bench]
fn single_thread_charge_use() {
    let service = InMemoryPointService::in_memory(None);

    for _ in 0..OPS_PER_THREAD {
        service.charge(1, 100).expect("charge failed");
        service.use_points(1, 100).expect("use failed");
    }
}
