//! Measures how separate chaining, linear probing, quadratic probing and
//! double hashing degrade as the load factor grows, under uniform, skewed
//! and worst-case key distributions.
//!
//! A [`Simulation`] feeds one key stream into all four tables, times each
//! insertion, and samples cumulative average probes and times into
//! [`Observation`]s for an [`ObservationSink`] such as [`CsvSink`].

pub mod config;
pub mod error;
pub mod hash;
pub mod keygen;
pub mod logger;
pub mod metrics;
pub mod probe;
pub mod report;
pub mod sim;
pub mod table;

pub use config::{RunConfig, Scale, SimConfig};
pub use error::{ConfigError, InsertError, SimError};
pub use keygen::{Distribution, KeyGenerator};
pub use probe::ProbeStrategy;
pub use report::{CsvSink, Observation, ObservationSink};
pub use sim::{run_all, RunSummary, Simulation};
