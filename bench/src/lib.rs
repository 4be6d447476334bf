//! Benchmark utilities for Rusty Events.
//!
//! This crate builds reproducible dispatcher workloads for the criterion benchmarks in
//! `benches/`:
//!
//! - **Tag trees**: a registry filled with a seeded random hierarchy of tags
//! - **Subscriptions**: listeners with a mix of exact, hierarchical, and catch-all
//!   filters, some constrained to a payload type
//! - **Events**: a seeded stream of events drawn from the same tag tree
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_bench -- publish
//! ```
//!
//! # Benchmark Results
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod workload;

pub use workload::{Workload, WorkloadConfig};
