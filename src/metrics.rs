use std::time::Instant;

use crate::error::InsertError;

/// Running totals for one table variant over one run.
///
/// Averages are cumulative: total divided by every insertion attempted so far,
/// never a trailing window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    total_probes: u64,
    total_time_ms: f64,
    insertions: u64,
    overflows: u64,
    max_probes: usize,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one insertion, timing exactly the `insert` call when `timed` is set.
    ///
    /// Overflowed insertions still count their probes and time. An allocation
    /// failure is not counted as an insertion.
    pub fn measure<F>(&mut self, timed: bool, insert: F) -> Result<usize, InsertError>
    where
        F: FnOnce() -> Result<usize, InsertError>,
    {
        let outcome = if timed {
            let _timer = ScopedTimer::start(&mut self.total_time_ms);
            insert()
        } else {
            insert()
        };

        let probes = match &outcome {
            Ok(probes) => Some(*probes),
            Err(InsertError::Overflow { probes, .. }) => {
                self.overflows += 1;
                Some(*probes)
            }
            Err(InsertError::Allocation { .. }) => None,
        };
        if let Some(probes) = probes {
            self.total_probes += probes as u64;
            self.max_probes = self.max_probes.max(probes);
            self.insertions += 1;
        }
        outcome
    }

    pub fn total_probes(&self) -> u64 {
        self.total_probes
    }

    pub fn total_time_ms(&self) -> f64 {
        self.total_time_ms
    }

    pub fn insertions(&self) -> u64 {
        self.insertions
    }

    pub fn overflows(&self) -> u64 {
        self.overflows
    }

    /// Longest single probe sequence seen.
    pub fn max_probes(&self) -> usize {
        self.max_probes
    }

    pub fn average_probes(&self) -> f64 {
        if self.insertions == 0 {
            return 0.0;
        }
        self.total_probes as f64 / self.insertions as f64
    }

    pub fn average_time_ms(&self) -> f64 {
        if self.insertions == 0 {
            return 0.0;
        }
        self.total_time_ms / self.insertions as f64
    }
}

/// Adds the time between `start` and drop, in milliseconds, to a running total.
pub struct ScopedTimer<'a> {
    start: Instant,
    total_ms: &'a mut f64,
}

impl<'a> ScopedTimer<'a> {
    pub fn start(total_ms: &'a mut f64) -> Self {
        ScopedTimer {
            start: Instant::now(),
            total_ms,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        *self.total_ms += self.start.elapsed().as_secs_f64() * 1000.0;
    }
}
