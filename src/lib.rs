//! Latency benchmarking for HTTP(S) forward proxies.
//!
//! A run sends a fixed number of GET requests for one target URL, each routed
//! through the proxy under test, strictly one at a time. Every request yields
//! a [`probe::RequestRecord`] with its connect, first-byte and total-time
//! phases; [`report::aggregate`] reduces the records to per-phase averages
//! and P95s, a status-code table and an error rate.

pub mod config;
pub mod probe;
pub mod report;
pub mod runner;
