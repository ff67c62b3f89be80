use super::error::ShuffleError;

pub const DEFAULT_BUCKETS: usize = 11;

/// Identity permutation over `[0, n)` that stores only displaced indices.
///
/// Entries are spread over `index % buckets` lists and found by linear scan,
/// which keeps memory proportional to the number of swaps rather than `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparsePermutation {
    buckets: Vec<Vec<(u32, u32)>>,
}

impl SparsePermutation {
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); DEFAULT_BUCKETS],
        }
    }

    pub fn with_buckets(count: usize) -> Result<Self, ShuffleError> {
        if count == 0 {
            return Err(ShuffleError::NoBuckets);
        }
        Ok(Self {
            buckets: vec![Vec::new(); count],
        })
    }

    fn bucket_of(&self, index: u32) -> usize {
        index as usize % self.buckets.len()
    }

    /// Current value at `index`; untouched indices hold themselves.
    pub fn get(&self, index: u32) -> u32 {
        self.buckets[self.bucket_of(index)]
            .iter()
            .find(|(key, _)| *key == index)
            .map_or(index, |(_, value)| *value)
    }

    pub fn set(&mut self, index: u32, value: u32) {
        let slot = self.bucket_of(index);
        let bucket = &mut self.buckets[slot];
        match bucket.iter_mut().find(|(key, _)| *key == index) {
            Some(entry) => entry.1 = value,
            None => bucket.push((index, value)),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for SparsePermutation {
    fn default() -> Self {
        Self::new()
    }
}
