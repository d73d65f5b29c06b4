// In: src/table.rs

//! A hand-built hash table with external chaining, used across the crate as a
//! multi-purpose associative structure: a frequency counter, a membership set,
//! and a per-column token index.
//!
//! Design points carried over from the reference structure:
//! * the bucket count is fixed at construction; the table never resizes;
//! * inserting a key that is already present is *rejected*, never overwritten;
//! * new entries are prepended, so chain order is most-recently-inserted-first;
//! * bucket selection uses the Jenkins one-at-a-time hash, reproduced
//!   bit-for-bit so test fixtures are deterministic.
//!
//! Ownership is language-native: each entry exclusively owns its key and its
//! value, and `Drop` releases the whole table in one pass.

use crate::error::SieveError;

//==================================================================================
// 1. Public Types
//==================================================================================

/// Outcome of an insert attempt. `Duplicate` is a normal result the caller
/// interprets locally (e.g. "increment the existing counter"), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Inserted,
    Duplicate,
}

struct Entry<V> {
    key: String,
    value: V,
    next: Option<Box<Entry<V>>>,
}

/// A fixed-capacity string-keyed map with externally chained buckets.
pub struct ChainTable<V> {
    buckets: Vec<Option<Box<Entry<V>>>>,
    len: usize,
}

//==================================================================================
// 2. Hashing
//==================================================================================

/// Jenkins one-at-a-time hash of `key`, reduced modulo `bucket_count`.
///
/// The exact add/shift/xor sequence matters only for determinism (no persisted
/// ordering depends on it), but it is reproduced faithfully: per byte
/// `h += b; h += h<<10; h ^= h>>6;` then the final
/// `h += h<<3; h ^= h>>11; h += h<<15;` avalanche, all in 32-bit wrapping
/// arithmetic.
pub fn jenkins_hash(key: &str, bucket_count: usize) -> usize {
    let mut hash: u32 = 0;
    for &b in key.as_bytes() {
        hash = hash.wrapping_add(b as u32);
        hash = hash.wrapping_add(hash << 10);
        hash ^= hash >> 6;
    }
    hash = hash.wrapping_add(hash << 3);
    hash ^= hash >> 11;
    hash = hash.wrapping_add(hash << 15);

    hash as usize % bucket_count
}

//==================================================================================
// 3. ChainTable API
//==================================================================================

impl<V> ChainTable<V> {
    /// Creates a table with `bucket_count` buckets. The count is a caller-chosen
    /// capacity hint (e.g. proportional to the expected row count) and never
    /// changes afterwards.
    pub fn new(bucket_count: usize) -> Result<Self, SieveError> {
        if bucket_count == 0 {
            return Err(SieveError::InvalidCapacity(bucket_count));
        }
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, || None);
        Ok(Self { buckets, len: 0 })
    }

    /// Inserts `key` -> `value`, prepending to the target bucket's chain.
    /// If the key is already present the attempt is rejected: the existing
    /// entry keeps its value and the offered pair is dropped.
    pub fn insert(&mut self, key: String, value: V) -> Insert {
        let slot = jenkins_hash(&key, self.buckets.len());
        let mut cursor = self.buckets[slot].as_deref();
        while let Some(entry) = cursor {
            if entry.key == key {
                return Insert::Duplicate;
            }
            cursor = entry.next.as_deref();
        }

        let head = self.buckets[slot].take();
        self.buckets[slot] = Some(Box::new(Entry {
            key,
            value,
            next: head,
        }));
        self.len += 1;
        Insert::Inserted
    }

    /// Borrows the value stored under `key`, if any. Never allocates.
    pub fn find(&self, key: &str) -> Option<&V> {
        let slot = jenkins_hash(key, self.buckets.len());
        let mut cursor = self.buckets[slot].as_deref();
        while let Some(entry) = cursor {
            if entry.key == key {
                return Some(&entry.value);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    /// Mutably borrows the value stored under `key`, if any. This is how
    /// callers resolve a `Duplicate` insert into an in-place update.
    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        let slot = jenkins_hash(key, self.buckets.len());
        let mut cursor = self.buckets[slot].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == key {
                return Some(&mut entry.value);
            }
            cursor = entry.next.as_deref_mut();
        }
        None
    }

    /// Visits every entry exactly once, in bucket order then chain order
    /// (most-recently-inserted-first within a bucket).
    pub fn for_each(&self, mut visitor: impl FnMut(&str, &V)) {
        for bucket in &self.buckets {
            let mut cursor = bucket.as_deref();
            while let Some(entry) = cursor {
                visitor(&entry.key, &entry.value);
                cursor = entry.next.as_deref();
            }
        }
    }

    /// Like [`ChainTable::for_each`], but the visitor may mutate values in
    /// place (used to convert frequency counts into probabilities). Entries
    /// cannot be added or removed during the walk.
    pub fn for_each_mut(&mut self, mut visitor: impl FnMut(&str, &mut V)) {
        for bucket in &mut self.buckets {
            let mut cursor = bucket.as_deref_mut();
            while let Some(entry) = cursor {
                visitor(&entry.key, &mut entry.value);
                cursor = entry.next.as_deref_mut();
            }
        }
    }

    /// Number of distinct keys currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

// Box-per-entry chains recurse on drop; long chains on a small table could
// exhaust the stack. Unlink iteratively instead.
impl<V> Drop for ChainTable<V> {
    fn drop(&mut self) {
        for bucket in &mut self.buckets {
            let mut cursor = bucket.take();
            while let Some(mut entry) = cursor {
                cursor = entry.next.take();
            }
        }
    }
}
