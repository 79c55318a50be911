//! Lightweight in-process metrics (dependency-free).
//!
//! Counters are stored as atomics and rendered in Prometheus text format; the
//! console binary logs them on shutdown.

pub mod metrics;

pub use metrics::{ClientMetrics, CounterVec};
