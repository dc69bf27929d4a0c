use rand::Rng;

/// Key-arrival distribution of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distribution {
    Uniform,
    Skewed,
    WorstCase,
}

impl Distribution {
    pub const ALL: [Distribution; 3] = [
        Distribution::Uniform,
        Distribution::Skewed,
        Distribution::WorstCase,
    ];

    /// Stable categorical label written to the observation stream.
    pub fn label(self) -> &'static str {
        match self {
            Distribution::Uniform => "Uniform",
            Distribution::Skewed => "Skewed",
            Distribution::WorstCase => "Worst_Case",
        }
    }
}

pub const SKEW_STRIDE: i64 = 1000;
pub const SKEW_CLUSTERS: i64 = 64;
pub const SKEW_JITTER: i64 = 100;

/// Produces the keys of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGenerator {
    /// Any `i64` with equal probability.
    Uniform,
    /// `cluster * stride + jitter` for a random cluster and a small random jitter.
    Skewed {
        stride: i64,
        clusters: i64,
        jitter: i64,
    },
    /// `index * capacity + offset`, so every key has primary hash `offset`.
    WorstCase { capacity: i64, offset: i64 },
}

impl KeyGenerator {
    pub fn for_run(distribution: Distribution, capacity: usize) -> Self {
        match distribution {
            Distribution::Uniform => KeyGenerator::Uniform,
            Distribution::Skewed => KeyGenerator::Skewed {
                stride: SKEW_STRIDE,
                clusters: SKEW_CLUSTERS,
                jitter: SKEW_JITTER,
            },
            Distribution::WorstCase => KeyGenerator::WorstCase {
                capacity: capacity as i64,
                offset: 0,
            },
        }
    }

    pub fn distribution(&self) -> Distribution {
        match self {
            KeyGenerator::Uniform => Distribution::Uniform,
            KeyGenerator::Skewed { .. } => Distribution::Skewed,
            KeyGenerator::WorstCase { .. } => Distribution::WorstCase,
        }
    }

    /// Key for the 0-based insertion `index`.
    pub fn next_key<R: Rng + ?Sized>(&self, index: u64, rng: &mut R) -> i64 {
        match *self {
            KeyGenerator::Uniform => rng.random::<i64>(),
            KeyGenerator::Skewed {
                stride,
                clusters,
                jitter,
            } => {
                let cluster = rng.random_range(0..clusters);
                cluster * stride + rng.random_range(0..jitter)
            }
            KeyGenerator::WorstCase { capacity, offset } => {
                (index as i64).wrapping_mul(capacity).wrapping_add(offset)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::hash::HashFunctions;

    #[test]
    fn test_worst_case_keys_share_primary_hash() {
        let h = HashFunctions::with_capacity(13).unwrap();
        let generator = KeyGenerator::for_run(Distribution::WorstCase, 13);
        let mut rng = StdRng::seed_from_u64(1);
        for i in 0..1000 {
            let key = generator.next_key(i, &mut rng);
            assert_eq!(h.primary(key), 0);
        }
    }

    #[test]
    fn test_skewed_keys_stay_in_clusters() {
        let generator = KeyGenerator::for_run(Distribution::Skewed, 10007);
        let mut rng = StdRng::seed_from_u64(7);
        for i in 0..10_000 {
            let key = generator.next_key(i, &mut rng);
            assert!((0..SKEW_CLUSTERS * SKEW_STRIDE).contains(&key));
            assert!(key % SKEW_STRIDE < SKEW_JITTER);
        }
    }

    #[test]
    fn test_uniform_keys_spread() {
        let h = HashFunctions::with_capacity(101).unwrap();
        let generator = KeyGenerator::for_run(Distribution::Uniform, 101);
        let mut rng = StdRng::seed_from_u64(42);
        let mut hit = [false; 101];
        for i in 0..10_000 {
            hit[h.primary(generator.next_key(i, &mut rng))] = true;
        }
        assert!(hit.iter().all(|&b| b));
    }

    #[test]
    fn test_same_seed_same_keys() {
        let generator = KeyGenerator::for_run(Distribution::Skewed, 13);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for i in 0..100 {
            assert_eq!(generator.next_key(i, &mut a), generator.next_key(i, &mut b));
        }
    }

    #[test]
    fn test_labels() {
        let labels: Vec<&str> = Distribution::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(labels, vec!["Uniform", "Skewed", "Worst_Case"]);
        for d in Distribution::ALL {
            assert_eq!(KeyGenerator::for_run(d, 13).distribution(), d);
        }
    }
}
