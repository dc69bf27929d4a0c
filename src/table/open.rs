use std::collections::TryReserveError;

use super::traits::CollisionTable;
use crate::error::InsertError;
use crate::hash::HashFunctions;
use crate::probe::{ProbeSequence, ProbeStrategy};

/// Open addressing slot state. `Empty -> Occupied` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(i64),
}

/// A single array of M slots resolved by linear, quadratic or double hashing.
///
/// The table does not refuse insertions near capacity; keeping occupancy
/// below M is left to the caller.
#[derive(Debug)]
pub struct OpenAddressingTable {
    strategy: ProbeStrategy,
    hashes: HashFunctions,
    slots: Vec<Slot>,
    len: usize,
}

impl OpenAddressingTable {
    pub fn new(hashes: HashFunctions, strategy: ProbeStrategy) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(hashes.capacity())?;
        slots.resize(hashes.capacity(), Slot::Empty);
        Ok(OpenAddressingTable {
            strategy,
            hashes,
            slots,
            len: 0,
        })
    }

    pub fn strategy(&self) -> ProbeStrategy {
        self.strategy
    }

    pub fn slot(&self, index: usize) -> Option<Slot> {
        self.slots.get(index).copied()
    }
}

impl CollisionTable for OpenAddressingTable {
    /// Probes = candidates examined, including the empty one that was taken.
    fn insert(&mut self, key: i64) -> Result<usize, InsertError> {
        let mut seq = ProbeSequence::new(key, &self.hashes, self.strategy);
        let slots = &self.slots;
        let vacant = seq.by_ref().find(|&pos| slots[pos] == Slot::Empty);
        match vacant {
            Some(pos) => {
                self.slots[pos] = Slot::Occupied(key);
                self.len += 1;
                Ok(seq.probes())
            }
            None => Err(InsertError::Overflow {
                key,
                probes: seq.probes(),
            }),
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn label(&self) -> &'static str {
        self.strategy.label()
    }
}
