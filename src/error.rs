use std::collections::TryReserveError;

use thiserror::Error;

/// Failure of a single insertion into one table variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// Every candidate slot was occupied. The key is dropped for this variant only.
    #[error("no empty slot for key {key} after {probes} probes")]
    Overflow { key: i64, probes: usize },
    #[error("failed to allocate a chained entry for key {key}")]
    Allocation {
        key: i64,
        #[source]
        source: TryReserveError,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("table capacity must be at least 2, got {0}")]
    CapacityTooSmall(usize),
    #[error("secondary modulus {modulus} must satisfy 0 < R < {capacity}")]
    InvalidSecondaryModulus { modulus: usize, capacity: usize },
    #[error("sampling step must be positive")]
    ZeroStep,
    #[error("fill threshold {0} must be in (0, 1]")]
    InvalidThreshold(f64),
}

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid run configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to allocate {what}")]
    Allocation {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },
    #[error("failed to write observation: {0}")]
    Io(#[from] std::io::Error),
}
