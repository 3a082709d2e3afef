//! Runtime Metrics & Instrumentation
//!
//! Lightweight counters and a latency history for the SEQMEM engine.
//!
//! Design: Lock-free `AtomicU64` counters, shareable behind an `Arc` so an
//! exporter thread can read them while the owning session keeps running.
//! The latency history uses `parking_lot::Mutex` for rare reads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::warn;

// ---------------------------------------------------------------------------
// Counters (lock-free)
// ---------------------------------------------------------------------------

/// Atomic counters for engine events.
pub struct SeqMemCounters {
    /// Dial tics.
    pub tics: AtomicU64,
    /// Stale-cell allocations requested through `seed`.
    pub seeds: AtomicU64,
    /// Feature vectors written into the store.
    pub memorized: AtomicU64,
    /// Recognition calls that matched an existing cell.
    pub recognized: AtomicU64,
    /// Recognition calls that allocated a fresh cell.
    pub novel: AtomicU64,
    /// Replay steps taken along the transition graph.
    pub replay_steps: AtomicU64,
    /// `forget_trail` calls.
    pub trails_forgotten: AtomicU64,
    /// Stored vectors removed by trail erasure.
    pub cells_erased: AtomicU64,
}

impl SeqMemCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tics: AtomicU64::new(0),
            seeds: AtomicU64::new(0),
            memorized: AtomicU64::new(0),
            recognized: AtomicU64::new(0),
            novel: AtomicU64::new(0),
            replay_steps: AtomicU64::new(0),
            trails_forgotten: AtomicU64::new(0),
            cells_erased: AtomicU64::new(0),
        }
    }

    /// Bump a counter by one.
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters for export.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            tics: self.tics.load(Ordering::Relaxed),
            seeds: self.seeds.load(Ordering::Relaxed),
            memorized: self.memorized.load(Ordering::Relaxed),
            recognized: self.recognized.load(Ordering::Relaxed),
            novel: self.novel.load(Ordering::Relaxed),
            replay_steps: self.replay_steps.load(Ordering::Relaxed),
            trails_forgotten: self.trails_forgotten.load(Ordering::Relaxed),
            cells_erased: self.cells_erased.load(Ordering::Relaxed),
        }
    }
}

impl Default for SeqMemCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Dial tics.
    pub tics: u64,
    /// Stale-cell allocations.
    pub seeds: u64,
    /// Feature vectors memorized.
    pub memorized: u64,
    /// Recognized (déjà vu) lookups.
    pub recognized: u64,
    /// Novel lookups.
    pub novel: u64,
    /// Replay steps.
    pub replay_steps: u64,
    /// Trail erasures.
    pub trails_forgotten: u64,
    /// Stored vectors erased.
    pub cells_erased: u64,
}

impl CounterSnapshot {
    /// Format as Prometheus-compatible text.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP seqmem_tics_total Dial tics\n\
             # TYPE seqmem_tics_total counter\n\
             seqmem_tics_total {}\n\
             # HELP seqmem_seeds_total Stale-cell allocations\n\
             # TYPE seqmem_seeds_total counter\n\
             seqmem_seeds_total {}\n\
             # HELP seqmem_memorized_total Feature vectors memorized\n\
             # TYPE seqmem_memorized_total counter\n\
             seqmem_memorized_total {}\n\
             # HELP seqmem_recognitions_total Recognition lookups by outcome\n\
             # TYPE seqmem_recognitions_total counter\n\
             seqmem_recognitions_total{{outcome=\"familiar\"}} {}\n\
             seqmem_recognitions_total{{outcome=\"novel\"}} {}\n\
             # HELP seqmem_replay_steps_total Replay steps along learned transitions\n\
             # TYPE seqmem_replay_steps_total counter\n\
             seqmem_replay_steps_total {}\n\
             # HELP seqmem_trails_forgotten_total Trail erasures\n\
             # TYPE seqmem_trails_forgotten_total counter\n\
             seqmem_trails_forgotten_total {}\n\
             # HELP seqmem_cells_erased_total Stored vectors erased\n\
             # TYPE seqmem_cells_erased_total counter\n\
             seqmem_cells_erased_total {}\n",
            self.tics,
            self.seeds,
            self.memorized,
            self.recognized,
            self.novel,
            self.replay_steps,
            self.trails_forgotten,
            self.cells_erased,
        )
    }
}

// ---------------------------------------------------------------------------
// Latency Monitor
// ---------------------------------------------------------------------------

/// Number of recent timings kept.
const HISTORY_LEN: usize = 256;

/// Tracks how long engine operations take.
///
/// ```rust
/// # use seqmem_core::metrics::LatencyMonitor;
/// let monitor = LatencyMonitor::new(500);
/// {
///     let _guard = monitor.begin("recognize");
///     // ... engine work ...
/// }
/// assert_eq!(monitor.sample_count(), 1);
/// ```
pub struct LatencyMonitor {
    /// Operations slower than this (microseconds) are logged.
    slow_us: u64,
    history: Mutex<LatencyHistory>,
}

struct LatencyHistory {
    /// Ring buffer of recent timings (microseconds).
    timings: Vec<f64>,
    write_idx: usize,
    count: u64,
}

impl LatencyMonitor {
    /// Create a monitor that warns above `slow_us` microseconds.
    #[must_use]
    pub fn new(slow_us: u64) -> Self {
        Self {
            slow_us,
            history: Mutex::new(LatencyHistory {
                timings: vec![0.0; HISTORY_LEN],
                write_idx: 0,
                count: 0,
            }),
        }
    }

    /// Begin timing `operation`. The guard records on drop.
    pub fn begin(&self, operation: &'static str) -> LatencyGuard<'_> {
        LatencyGuard {
            monitor: self,
            operation,
            start: Instant::now(),
        }
    }

    /// Record a timing manually (microseconds).
    #[allow(clippy::cast_precision_loss)]
    pub fn record(&self, operation: &str, us: f64) {
        {
            let mut h = self.history.lock();
            let idx = h.write_idx;
            h.timings[idx] = us;
            h.write_idx = (idx + 1) % HISTORY_LEN;
            h.count += 1;
        }
        if us > self.slow_us as f64 {
            warn!(operation, elapsed_us = us, budget_us = self.slow_us, "Slow SEQMEM operation");
        }
    }

    /// Total number of timings recorded.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.history.lock().count
    }

    /// The slow-operation threshold in microseconds.
    #[must_use]
    pub fn slow_us(&self) -> u64 {
        self.slow_us
    }

    /// P50, P95, P99 and max over the retained history.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn percentiles(&self) -> LatencyPercentiles {
        let h = self.history.lock();
        let n = usize::try_from(h.count).unwrap_or(usize::MAX).min(HISTORY_LEN);
        if n == 0 {
            return LatencyPercentiles::default();
        }

        let mut sorted = h.timings[..n].to_vec();
        sorted.sort_by(f64::total_cmp);

        let slow = sorted.iter().filter(|&&t| t > self.slow_us as f64).count();
        LatencyPercentiles {
            p50: sorted[n / 2],
            p95: sorted[((n as f64 * 0.95) as usize).min(n - 1)],
            p99: sorted[((n as f64 * 0.99) as usize).min(n - 1)],
            max: sorted[n - 1],
            slow_ratio: slow as f64 / n as f64,
        }
    }
}

/// RAII guard that records elapsed time when dropped.
pub struct LatencyGuard<'a> {
    monitor: &'a LatencyMonitor,
    operation: &'static str,
    start: Instant,
}

impl Drop for LatencyGuard<'_> {
    fn drop(&mut self) {
        let us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.monitor.record(self.operation, us);
    }
}

/// Percentile statistics for operation timings (microseconds).
#[derive(Debug, Clone, Default)]
pub struct LatencyPercentiles {
    /// Median.
    pub p50: f64,
    /// 95th percentile.
    pub p95: f64,
    /// 99th percentile.
    pub p99: f64,
    /// Maximum observed.
    pub max: f64,
    /// Fraction of samples above the slow threshold.
    pub slow_ratio: f64,
}

impl LatencyPercentiles {
    /// Format as a human-readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "P50={:.1}us  P95={:.1}us  P99={:.1}us  Max={:.1}us  Slow={:.1}%",
            self.p50,
            self.p95,
            self.p99,
            self.max,
            self.slow_ratio * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
