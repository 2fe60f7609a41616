// src/index/mod.rs
//! Prefix and suffix indices: fixed-length boundary key -> ids of the reads
//! carrying that key, in first-seen order.

use ahash::AHashMap;
use tracing::{debug, info};

use crate::config::BucketRemoval;
use crate::error::{AssemblyError, Result};
use crate::io::fasta::validate_alphabet;

const PROGRESS_INTERVAL: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSide {
    Prefix,
    Suffix,
}

impl IndexSide {
    /// Boundary key of `read` on this side.
    pub fn key_of<'a>(&self, read: &'a str, key_len: usize) -> &'a str {
        match self {
            IndexSide::Prefix => &read[..key_len],
            IndexSide::Suffix => &read[read.len() - key_len..],
        }
    }

    fn label(&self) -> &'static str {
        match self {
            IndexSide::Prefix => "prefix",
            IndexSide::Suffix => "suffix",
        }
    }
}

/// Hash index over the prefixes or suffixes of a read collection.
///
/// Keys borrow from the reads, so the index cannot outlive them.
#[derive(Debug, Clone)]
pub struct OverlapIndex<'r> {
    side: IndexSide,
    key_len: usize,
    buckets: AHashMap<&'r str, Vec<usize>>,
}

impl<'r> OverlapIndex<'r> {
    pub fn build(reads: &'r [String], key_len: usize, side: IndexSide) -> Result<Self> {
        validate_alphabet(reads)?;
        let mut buckets: AHashMap<&'r str, Vec<usize>> = AHashMap::with_capacity(reads.len());
        for (id, read) in reads.iter().enumerate() {
            if read.len() < key_len {
                return Err(AssemblyError::InputTooShort {
                    read_id: id,
                    length: read.len(),
                    required: key_len,
                });
            }
            buckets.entry(side.key_of(read, key_len)).or_default().push(id);

            if id > 0 && id % PROGRESS_INTERVAL == 0 {
                debug!("Indexed {} {}es", id, side.label());
            }
        }
        info!(
            "Built {} index: {} reads under {} keys of length {}",
            side.label(),
            reads.len(),
            buckets.len(),
            key_len
        );
        Ok(Self { side, key_len, buckets })
    }

    pub fn build_prefix(reads: &'r [String], key_len: usize) -> Result<Self> {
        Self::build(reads, key_len, IndexSide::Prefix)
    }

    pub fn build_suffix(reads: &'r [String], key_len: usize) -> Result<Self> {
        Self::build(reads, key_len, IndexSide::Suffix)
    }

    pub fn side(&self) -> IndexSide {
        self.side
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }

    /// Read ids under `key`, empty when the key is absent.
    pub fn lookup(&self, key: &str) -> &[usize] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str, id: usize) -> bool {
        self.lookup(key).contains(&id)
    }

    /// Delete the whole bucket under `key`, whether or not its reads were used.
    pub fn remove(&mut self, key: &str) -> Option<Vec<usize>> {
        self.buckets.remove(key)
    }

    /// Remove a single id from its bucket, deleting the bucket once empty.
    pub fn remove_id(&mut self, key: &str, id: usize) -> bool {
        let Some(bucket) = self.buckets.get_mut(key) else {
            return false;
        };
        let Some(pos) = bucket.iter().position(|&x| x == id) else {
            return false;
        };
        bucket.remove(pos);
        if bucket.is_empty() {
            self.buckets.remove(key);
        }
        true
    }

    /// Consume read `id` filed under `key` according to `policy`.
    pub fn consume(&mut self, key: &str, id: usize, policy: BucketRemoval) {
        match policy {
            BucketRemoval::WholeBucket => {
                self.remove(key);
            }
            BucketRemoval::SingleRead => {
                self.remove_id(key, id);
            }
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'r str> + '_ {
        self.buckets.keys().copied()
    }
}
