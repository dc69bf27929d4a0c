use crate::error::ConfigError;

/// Primary and secondary hash functions shared by every table variant of a run.
///
/// `primary(key) = |key| mod M` picks the home slot or bucket.
/// `secondary(key) = R - (|key| mod R)` is the double hashing step and is
/// always in `1..=R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFunctions {
    capacity: usize,
    secondary_modulus: usize,
}

impl HashFunctions {
    pub fn new(capacity: usize, secondary_modulus: usize) -> Result<Self, ConfigError> {
        if capacity < 2 {
            return Err(ConfigError::CapacityTooSmall(capacity));
        }
        if secondary_modulus == 0 || secondary_modulus >= capacity {
            return Err(ConfigError::InvalidSecondaryModulus {
                modulus: secondary_modulus,
                capacity,
            });
        }
        Ok(HashFunctions {
            capacity,
            secondary_modulus,
        })
    }

    /// Uses the largest prime below `capacity` as the secondary modulus.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        if capacity < 2 {
            return Err(ConfigError::CapacityTooSmall(capacity));
        }
        Self::new(capacity, default_secondary_modulus(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn secondary_modulus(&self) -> usize {
        self.secondary_modulus
    }

    #[inline]
    pub fn primary(&self, key: i64) -> usize {
        (key.unsigned_abs() % self.capacity as u64) as usize
    }

    #[inline]
    pub fn secondary(&self, key: i64) -> usize {
        let r = self.secondary_modulus as u64;
        (r - key.unsigned_abs() % r) as usize
    }
}

/// Largest prime strictly below `capacity`, or 1 when there is none (capacity 2).
pub fn default_secondary_modulus(capacity: usize) -> usize {
    largest_prime_below(capacity).unwrap_or(1)
}

pub fn largest_prime_below(n: usize) -> Option<usize> {
    (2..n).rev().find(|&candidate| is_prime(candidate))
}

pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}
