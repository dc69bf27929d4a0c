use log::{debug, info, warn};
use rand::Rng;

use crate::config::{RunConfig, SimConfig};
use crate::error::{InsertError, SimError};
use crate::hash::HashFunctions;
use crate::keygen::{Distribution, KeyGenerator};
use crate::metrics::Metrics;
use crate::probe::ProbeStrategy;
use crate::report::{Observation, ObservationSink};
use crate::table::{ChainingTable, CollisionTable, OpenAddressingTable};

/// Final state of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub distribution: Distribution,
    pub scale: String,
    pub records: usize,
    /// Keys handed to the open-addressing variants before the fill gate closed.
    pub offered_to_open: usize,
    pub chaining: Metrics,
    /// Indexed like `ProbeStrategy::ALL`.
    pub open: [Metrics; 3],
}

impl RunSummary {
    pub fn overflows(&self) -> u64 {
        self.open.iter().map(Metrics::overflows).sum()
    }

    pub fn open_metrics(&self, strategy: ProbeStrategy) -> &Metrics {
        &self.open[strategy_index(strategy)]
    }
}

fn strategy_index(strategy: ProbeStrategy) -> usize {
    match strategy {
        ProbeStrategy::Linear => 0,
        ProbeStrategy::Quadratic => 1,
        ProbeStrategy::DoubleHash => 2,
    }
}

/// One run: four tables fed from the same key stream.
///
/// Chaining receives every key. The open-addressing tables receive keys only
/// until `RunConfig::fill_limit` keys have been offered to them.
#[derive(Debug)]
pub struct Simulation {
    config: RunConfig,
    generator: KeyGenerator,
    fill_limit: usize,
    chaining: ChainingTable,
    open: [OpenAddressingTable; 3],
    chaining_metrics: Metrics,
    open_metrics: [Metrics; 3],
    processed: usize,
    offered_to_open: usize,
    records: usize,
}

impl Simulation {
    pub fn new(config: RunConfig) -> Result<Self, SimError> {
        let hashes = config.validate()?;
        let chaining = ChainingTable::new(hashes).map_err(|source| SimError::Allocation {
            what: "chaining table",
            source,
        })?;
        let open = [
            new_open_table(hashes, ProbeStrategy::Linear)?,
            new_open_table(hashes, ProbeStrategy::Quadratic)?,
            new_open_table(hashes, ProbeStrategy::DoubleHash)?,
        ];

        Ok(Simulation {
            generator: KeyGenerator::for_run(config.distribution, config.capacity),
            fill_limit: config.fill_limit(),
            config,
            chaining,
            open,
            chaining_metrics: Metrics::new(),
            open_metrics: [Metrics::new(); 3],
            processed: 0,
            offered_to_open: 0,
            records: 0,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn offered_to_open(&self) -> usize {
        self.offered_to_open
    }

    pub fn is_open_gate_closed(&self) -> bool {
        self.offered_to_open >= self.fill_limit
    }

    pub fn chaining(&self) -> &ChainingTable {
        &self.chaining
    }

    pub fn open_table(&self, strategy: ProbeStrategy) -> &OpenAddressingTable {
        &self.open[strategy_index(strategy)]
    }

    /// Generates the next key and inserts it into every variant that still takes keys.
    ///
    /// Returns the probe counts: chaining first, then one per open-addressing
    /// variant in `ProbeStrategy::ALL` order, `None` when gated or overflowed.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<(usize, [Option<usize>; 3]), SimError> {
        let key = self.generator.next_key(self.processed as u64, rng);

        let chaining = &mut self.chaining;
        let chained = self
            .chaining_metrics
            .measure(self.config.time_chaining, || chaining.insert(key));
        let chaining_probes = check(chained, self.chaining.label())?.unwrap_or_default();

        let mut open_probes = [None; 3];
        if !self.is_open_gate_closed() {
            for ((table, metrics), probes) in self
                .open
                .iter_mut()
                .zip(self.open_metrics.iter_mut())
                .zip(open_probes.iter_mut())
            {
                let label = table.label();
                *probes = check(metrics.measure(true, || table.insert(key)), label)?;
            }
            self.offered_to_open += 1;
            if self.is_open_gate_closed() {
                debug!(
                    "open addressing gate closed after {} keys (M = {})",
                    self.offered_to_open, self.config.capacity
                );
            }
        }

        self.processed += 1;
        Ok((chaining_probes, open_probes))
    }

    /// Snapshot of the cumulative averages after the current insertion.
    pub fn observe(&self) -> Observation {
        let capacity = self.config.capacity as f64;
        Observation {
            distribution: self.config.distribution,
            scale: self.config.scale.clone(),
            insertions: self.processed,
            load_factor: self.processed as f64 / capacity,
            open_load_factor: self.offered_to_open as f64 / capacity,
            chaining_probes: self.chaining_metrics.average_probes(),
            open_probes: self.open_metrics.map(|m| m.average_probes()),
            chaining_time_ms: self
                .config
                .time_chaining
                .then(|| self.chaining_metrics.average_time_ms()),
            open_time_ms: self.open_metrics.map(|m| m.average_time_ms()),
        }
    }

    /// Drives all N insertions, emitting an observation at every sampling boundary.
    pub fn run<R, S>(mut self, rng: &mut R, sink: &mut S) -> Result<RunSummary, SimError>
    where
        R: Rng + ?Sized,
        S: ObservationSink + ?Sized,
    {
        info!(
            "starting run {} / {} (M = {}, N = {}, gate at {} keys)",
            self.config.distribution.label(),
            self.config.scale,
            self.config.capacity,
            self.config.insertions,
            self.fill_limit
        );

        for n in 1..=self.config.insertions {
            self.step(rng)?;
            if self.config.is_sample(n) {
                let observation = self.observe();
                debug!("{:?}", observation);
                sink.record(&observation)?;
                self.records += 1;
            }
        }

        let summary = self.summary();
        info!(
            "finished run {} / {}: {} records, chaining avg {:.3} (longest chain {}), \
             linear avg {:.3} (max {}), quadratic avg {:.3} (max {}), double avg {:.3} (max {})",
            summary.distribution.label(),
            summary.scale,
            summary.records,
            summary.chaining.average_probes(),
            self.chaining.longest_chain(),
            summary.open[0].average_probes(),
            summary.open[0].max_probes(),
            summary.open[1].average_probes(),
            summary.open[1].max_probes(),
            summary.open[2].average_probes(),
            summary.open[2].max_probes(),
        );
        if summary.overflows() > 0 {
            warn!(
                "run {} / {} dropped {} keys to open-addressing overflow",
                summary.distribution.label(),
                summary.scale,
                summary.overflows()
            );
        }
        Ok(summary)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            distribution: self.config.distribution,
            scale: self.config.scale.clone(),
            records: self.records,
            offered_to_open: self.offered_to_open,
            chaining: self.chaining_metrics,
            open: self.open_metrics,
        }
    }
}

fn new_open_table(
    hashes: HashFunctions,
    strategy: ProbeStrategy,
) -> Result<OpenAddressingTable, SimError> {
    OpenAddressingTable::new(hashes, strategy).map_err(|source| SimError::Allocation {
        what: "open addressing table",
        source,
    })
}

/// Overflow drops the key for one variant and the run goes on; allocation failure ends it.
///
/// Overflows are counted by `Metrics` and reported once per run.
fn check(outcome: Result<usize, InsertError>, label: &str) -> Result<Option<usize>, SimError> {
    match outcome {
        Ok(probes) => Ok(Some(probes)),
        Err(InsertError::Overflow { key, probes }) => {
            debug!(
                "{} overflow: key {} dropped after {} probes",
                label, key, probes
            );
            Ok(None)
        }
        Err(InsertError::Allocation { source, .. }) => Err(SimError::Allocation {
            what: "chained entry",
            source,
        }),
    }
}

/// Runs every configured distribution × scale in order, sharing one random source.
pub fn run_all<R, S>(
    config: &SimConfig,
    rng: &mut R,
    sink: &mut S,
) -> Result<Vec<RunSummary>, SimError>
where
    R: Rng + ?Sized,
    S: ObservationSink + ?Sized,
{
    sink.begin(config.time_chaining)?;
    let mut summaries = Vec::new();
    for run in config.runs() {
        let summary = Simulation::new(run)?.run(rng, sink)?;
        summaries.push(summary);
    }
    sink.finish()?;
    Ok(summaries)
}
