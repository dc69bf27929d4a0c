use std::env;

use log::warn;

use crate::error::ConfigError;
use crate::hash::{default_secondary_modulus, HashFunctions};
use crate::keygen::Distribution;

/// Samples taken per run on the regular grid (step = N / SAMPLE_STEPS).
pub const SAMPLE_STEPS: usize = 100;
/// Every insertion up to this index is also sampled.
pub const WARMUP_WINDOW: usize = 10;
/// Fraction of M after which open addressing stops receiving keys.
pub const FILL_THRESHOLD: f64 = 0.95;
pub const DEFAULT_SEED: u64 = 0x5eed_1234;
/// Overrides `SimConfig::seed` when set to a decimal integer.
pub const SEED_ENV: &str = "HASHING_SEED";

/// A table size to compare: label, capacity M and insertion count N.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scale {
    pub label: String,
    pub capacity: usize,
    pub insertions: usize,
}

impl Scale {
    pub fn new(label: impl Into<String>, capacity: usize, insertions: usize) -> Self {
        Scale {
            label: label.into(),
            capacity,
            insertions,
        }
    }
}

/// Parameters of one run (one distribution at one scale). Immutable once the run starts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    pub distribution: Distribution,
    pub scale: String,
    pub capacity: usize,
    pub insertions: usize,
    pub secondary_modulus: usize,
    pub step: usize,
    pub warmup: usize,
    pub fill_threshold: f64,
    pub time_chaining: bool,
}

impl RunConfig {
    pub fn new(
        distribution: Distribution,
        scale: impl Into<String>,
        capacity: usize,
        insertions: usize,
    ) -> Self {
        RunConfig {
            distribution,
            scale: scale.into(),
            capacity,
            insertions,
            secondary_modulus: default_secondary_modulus(capacity),
            step: (insertions / SAMPLE_STEPS).max(1),
            warmup: WARMUP_WINDOW,
            fill_threshold: FILL_THRESHOLD,
            time_chaining: true,
        }
    }

    pub fn with_secondary_modulus(mut self, modulus: usize) -> Self {
        self.secondary_modulus = modulus;
        self
    }

    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_fill_threshold(mut self, threshold: f64) -> Self {
        self.fill_threshold = threshold;
        self
    }

    pub fn with_chaining_timing(mut self, timed: bool) -> Self {
        self.time_chaining = timed;
        self
    }

    /// Checks the parameters and builds the run's hash functions.
    pub fn validate(&self) -> Result<HashFunctions, ConfigError> {
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if !(self.fill_threshold > 0.0 && self.fill_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.fill_threshold));
        }
        HashFunctions::new(self.capacity, self.secondary_modulus)
    }

    /// Keys offered to open addressing before the gate closes.
    ///
    /// Capped at M - 1 so an open-addressing table is never filled completely.
    pub fn fill_limit(&self) -> usize {
        let limit = (self.fill_threshold * self.capacity as f64).ceil() as usize;
        limit.min(self.capacity.saturating_sub(1))
    }

    /// Whether the 1-based insertion `n` emits an observation.
    pub fn is_sample(&self, n: usize) -> bool {
        n <= self.warmup || n % self.step == 0 || n == self.insertions
    }
}

/// Batch of runs: every distribution at every scale, in that order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    pub seed: u64,
    pub distributions: Vec<Distribution>,
    pub scales: Vec<Scale>,
    pub sample_steps: usize,
    pub warmup: usize,
    pub fill_threshold: f64,
    pub time_chaining: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            seed: DEFAULT_SEED,
            distributions: Distribution::ALL.to_vec(),
            scales: vec![
                Scale::new("Small", 13, 13),
                Scale::new("Medium", 1009, 1500),
                Scale::new("Large", 10007, 15000),
            ],
            sample_steps: SAMPLE_STEPS,
            warmup: WARMUP_WINDOW,
            fill_threshold: FILL_THRESHOLD,
            time_chaining: true,
        }
    }
}

impl SimConfig {
    /// Defaults, with the seed taken from `HASHING_SEED` when it parses.
    pub fn from_env() -> Self {
        let mut config = SimConfig::default();
        if let Ok(raw) = env::var(SEED_ENV) {
            match raw.trim().parse() {
                Ok(seed) => config.seed = seed,
                Err(_) => warn!("ignoring {}={:?}: not an unsigned integer", SEED_ENV, raw),
            }
        }
        config
    }

    pub fn runs(&self) -> impl Iterator<Item = RunConfig> + '_ {
        self.distributions.iter().flat_map(move |&distribution| {
            self.scales.iter().map(move |scale| {
                let step = (scale.insertions / self.sample_steps.max(1)).max(1);
                RunConfig::new(distribution, &scale.label, scale.capacity, scale.insertions)
                    .with_step(step)
                    .with_warmup(self.warmup)
                    .with_fill_threshold(self.fill_threshold)
                    .with_chaining_timing(self.time_chaining)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_limit() {
        let large = RunConfig::new(Distribution::Uniform, "Large", 10007, 15000);
        assert_eq!(large.fill_limit(), 9507);
        // ceil(0.95 * 13) = 13 would fill the table
        let small = RunConfig::new(Distribution::Uniform, "Small", 13, 10);
        assert_eq!(small.fill_limit(), 12);
        let full = small.clone().with_fill_threshold(1.0);
        assert_eq!(full.fill_limit(), 12);
        let half = small.with_fill_threshold(0.5);
        assert_eq!(half.fill_limit(), 7);
    }

    #[test]
    fn test_sampling_boundaries() {
        let config = RunConfig::new(Distribution::Uniform, "Large", 10007, 15000);
        assert_eq!(config.step, 150);
        assert!(config.is_sample(1));
        assert!(config.is_sample(10));
        assert!(!config.is_sample(11));
        assert!(config.is_sample(150));
        assert!(!config.is_sample(151));
        assert!(config.is_sample(15000));

        let odd = RunConfig::new(Distribution::Uniform, "Odd", 101, 1234).with_warmup(0);
        assert_eq!(odd.step, 12);
        assert!(odd.is_sample(1234));
        assert!(!odd.is_sample(1));
    }

    #[test]
    fn test_validate() {
        let config = RunConfig::new(Distribution::Skewed, "Small", 13, 10);
        let hashes = config.validate().unwrap();
        assert_eq!(hashes.capacity(), 13);
        assert_eq!(hashes.secondary_modulus(), 11);

        assert_eq!(
            config.clone().with_step(0).validate(),
            Err(ConfigError::ZeroStep)
        );
        assert_eq!(
            config.clone().with_fill_threshold(0.0).validate(),
            Err(ConfigError::InvalidThreshold(0.0))
        );
        assert!(config
            .clone()
            .with_fill_threshold(f64::NAN)
            .validate()
            .is_err());
        assert!(config.with_secondary_modulus(13).validate().is_err());
        assert_eq!(
            RunConfig::new(Distribution::Uniform, "Tiny", 1, 1).validate(),
            Err(ConfigError::CapacityTooSmall(1))
        );
    }

    #[test]
    fn test_runs_cover_every_pair() {
        let config = SimConfig::default();
        let runs: Vec<RunConfig> = config.runs().collect();
        assert_eq!(runs.len(), 9);
        assert_eq!(runs[0].distribution, Distribution::Uniform);
        assert_eq!(runs[0].scale, "Small");
        assert_eq!(runs[8].distribution, Distribution::WorstCase);
        assert_eq!(runs[8].scale, "Large");
        assert_eq!(runs[8].step, 150);
        assert_eq!(runs[0].step, 1);
    }
}
