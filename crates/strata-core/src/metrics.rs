//! Operation counters and elapsed time recorded by every algorithm run.
//!
//! Algorithms are generic over [`Metrics`] so the sink is resolved at compile
//! time. [`OperationCounter`] is the in-memory implementation callers read
//! after a run; [`NullMetrics`] discards everything and is used for internal
//! sub-runs whose counts must not leak into the caller's sink.
//!
//! A sink is mutated only by the run it is passed to. Resetting between runs
//! is the caller's job.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;

/// Counter: vertices entered by a depth-first traversal.
pub const DFS_VISITS: &str = "dfs_visits";
/// Counter: outgoing edges inspected.
pub const EDGES_EXAMINED: &str = "edges_examined";
/// Counter: vertices enqueued on Kahn's frontier after their in-degree hit zero.
pub const PUSHES: &str = "pushes";
/// Counter: vertices dequeued from Kahn's frontier.
pub const POPS: &str = "pops";
/// Counter: edge relaxations attempted by the DAG path engine.
pub const RELAXATIONS: &str = "relaxations";

/// Sink for operation counts and run duration.
pub trait Metrics {
    /// Add one to the counter named `op`.
    fn increment(&mut self, op: &str) {
        self.add(op, 1);
    }

    /// Add `value` to the counter named `op`.
    fn add(&mut self, op: &str, value: u64);

    /// Current value of `op`; zero if it was never touched.
    fn counter(&self, op: &str) -> u64;

    /// Record the elapsed time of the run.
    fn set_elapsed(&mut self, elapsed: Duration);

    /// Elapsed time recorded by the last run.
    fn elapsed(&self) -> Duration;
}

/// In-memory counting sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationCounter {
    counters: BTreeMap<String, u64>,
    #[serde(rename = "elapsed_ns", serialize_with = "serialize_nanos")]
    elapsed: Duration,
}

impl OperationCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time in fractional milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }

    /// All counters in name order.
    #[must_use]
    pub fn counters(&self) -> &BTreeMap<String, u64> {
        &self.counters
    }

    /// Clear every counter and the elapsed time.
    pub fn reset(&mut self) {
        self.counters.clear();
        self.elapsed = Duration::ZERO;
    }

    /// Render counters and elapsed time as a small aligned table.
    #[must_use]
    pub fn summary(&self) -> String {
        let width = self
            .counters
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("elapsed".len());

        let mut out = String::new();
        for (name, value) in &self.counters {
            let _ = writeln!(out, "{name:<width$}  {value}");
        }
        let _ = writeln!(out, "{:<width$}  {:.3} ms", "elapsed", self.elapsed_millis());
        out
    }
}

impl Metrics for OperationCounter {
    fn add(&mut self, op: &str, value: u64) {
        if let Some(slot) = self.counters.get_mut(op) {
            *slot += value;
        } else {
            self.counters.insert(op.to_string(), value);
        }
    }

    fn counter(&self, op: &str) -> u64 {
        self.counters.get(op).copied().unwrap_or(0)
    }

    fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Sink that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetrics;

impl Metrics for NullMetrics {
    fn add(&mut self, _op: &str, _value: u64) {}

    fn counter(&self, _op: &str) -> u64 {
        0
    }

    fn set_elapsed(&mut self, _elapsed: Duration) {}

    fn elapsed(&self) -> Duration {
        Duration::ZERO
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_nanos<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_nanos()).unwrap_or(u64::MAX))
}
