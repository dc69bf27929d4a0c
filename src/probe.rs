use crate::hash::HashFunctions;

/// Probe strategy enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProbeStrategy {
    Linear,
    Quadratic,
    DoubleHash,
}

impl ProbeStrategy {
    pub const ALL: [ProbeStrategy; 3] = [
        ProbeStrategy::Linear,
        ProbeStrategy::Quadratic,
        ProbeStrategy::DoubleHash,
    ];

    /// Column prefix used in the observation stream.
    pub fn label(self) -> &'static str {
        match self {
            ProbeStrategy::Linear => "Linear_Probing",
            ProbeStrategy::Quadratic => "Quadratic_Probing",
            ProbeStrategy::DoubleHash => "Double_Hashing",
        }
    }
}

/// Probe sequence generator
///
/// Yields at most `capacity` candidate indices for one key. The number of
/// candidates handed out so far is the probe count of the insertion.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    initial_pos: usize,
    current_step: usize,
    capacity: usize,
    strategy: ProbeStrategy,
    secondary_hash: usize,
}

impl ProbeSequence {
    /// Create a new probe sequence
    pub fn new(key: i64, hashes: &HashFunctions, strategy: ProbeStrategy) -> Self {
        let secondary_hash = match strategy {
            ProbeStrategy::DoubleHash => hashes.secondary(key),
            _ => 0,
        };

        ProbeSequence {
            initial_pos: hashes.primary(key),
            current_step: 0,
            capacity: hashes.capacity(),
            strategy,
            secondary_hash,
        }
    }

    /// Candidates examined so far.
    pub fn probes(&self) -> usize {
        self.current_step
    }

    pub fn is_exhausted(&self) -> bool {
        self.current_step >= self.capacity
    }

    /// Index of the `i`-th candidate.
    ///
    /// Each term is reduced mod M in 128-bit arithmetic, so `i * i` and
    /// `i * h2` cannot overflow for any capacity.
    pub fn candidate(&self, i: usize) -> usize {
        let m = self.capacity as u128;
        let i = i as u128;
        let offset = match self.strategy {
            ProbeStrategy::Linear => i,
            ProbeStrategy::Quadratic => i * i,
            ProbeStrategy::DoubleHash => i * self.secondary_hash as u128,
        };
        ((self.initial_pos as u128 + offset % m) % m) as usize
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.is_exhausted() {
            return None;
        }
        let pos = self.candidate(self.current_step);
        self.current_step += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.current_step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
