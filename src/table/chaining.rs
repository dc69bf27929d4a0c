use std::collections::TryReserveError;

use super::traits::CollisionTable;
use crate::error::InsertError;
use crate::hash::HashFunctions;

/// Separate chaining: M owned buckets, each keeping keys in insertion order.
///
/// Never overflows; the load factor can grow past 1.0.
#[derive(Debug)]
pub struct ChainingTable {
    hashes: HashFunctions,
    buckets: Vec<Vec<i64>>,
    len: usize,
}

impl ChainingTable {
    pub fn new(hashes: HashFunctions) -> Result<Self, TryReserveError> {
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(hashes.capacity())?;
        buckets.resize_with(hashes.capacity(), Vec::new);
        Ok(ChainingTable {
            hashes,
            buckets,
            len: 0,
        })
    }

    pub fn bucket(&self, index: usize) -> &[i64] {
        self.buckets.get(index).map_or(&[], Vec::as_slice)
    }

    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl CollisionTable for ChainingTable {
    /// One probe to reach the bucket plus one per entry already chained there.
    fn insert(&mut self, key: i64) -> Result<usize, InsertError> {
        let bucket = &mut self.buckets[self.hashes.primary(key)];
        let probes = bucket.len() + 1;
        bucket
            .try_reserve(1)
            .map_err(|source| InsertError::Allocation { key, source })?;
        bucket.push(key);
        self.len += 1;
        Ok(probes)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    fn label(&self) -> &'static str {
        "Chaining"
    }
}
