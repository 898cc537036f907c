//! Run counters for the simulation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub struct Metrics {
    tick_count: AtomicU64,
    generations: AtomicU64,
    cell_count: AtomicU64,
    counters: Mutex<HashMap<&'static str, u64>>,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("tick_count", &self.tick_count())
            .field("generations", &self.generations())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// `log_interval` ticks pass between debug-level timing lines; zero
    /// disables them.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            generations: AtomicU64::new(0),
            cell_count: AtomicU64::new(0),
            counters: Mutex::new(HashMap::new()),
            log_interval,
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, changed_cells: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        if self.log_interval > 0 && tick % self.log_interval == 0 {
            tracing::debug!(
                tick = tick,
                changed_cells = changed_cells,
                cells = self.cell_count(),
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    /// Records a freshly generated map and restarts the tick count.
    pub fn record_generation(&self, cells: usize) {
        self.generations.fetch_add(1, Ordering::Relaxed);
        self.cell_count.store(cells as u64, Ordering::Relaxed);
        self.tick_count.store(0, Ordering::Relaxed);
    }

    /// Adds `amount` to a named counter.
    pub fn add_to_counter(&self, name: &'static str, amount: u64) {
        if amount == 0 {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(name).or_insert(0) += amount;
    }

    #[must_use]
    pub fn counter(&self, name: &str) -> u64 {
        let counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        counters.get(name).copied().unwrap_or(0)
    }

    /// Ticks since the last generation.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn generations(&self) -> u64 {
        self.generations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.cell_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
