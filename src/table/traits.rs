use crate::error::InsertError;

/// A fixed-capacity table that places keys and reports the work it took.
pub trait CollisionTable {
    /// Places `key` and returns the number of probes spent.
    fn insert(&mut self, key: i64) -> Result<usize, InsertError>;

    /// Keys placed so far.
    fn len(&self) -> usize;

    /// Number of slots or buckets, M.
    fn capacity(&self) -> usize;

    /// Column prefix used in the observation stream.
    fn label(&self) -> &'static str;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }
}
