//! Lexeme interning pool.
//!
//! Every distinct run of source characters (an identifier, a punctuator, a
//! string body) is interned exactly once into a [`LexemaPool`] and handed
//! back as a [`Lexema`] handle. Two handles compare equal iff they were
//! interned from identical bytes — comparison never touches the backing
//! bytes after the first intern.
//!
//! The pool is a fixed bucket array with explicit chaining, matching the
//! bucket count and hash function of the table this crate's design is
//! ported from: buckets are hashed with `h = h*128 + c` folded over the
//! lexeme's bytes, then reduced with `(h*36) mod bucket_count`. Collisions
//! are resolved by appending the new entry to the *tail* of the bucket's
//! chain, not the head, so iteration order matches insertion order within
//! a bucket.

use std::fmt;

/// Number of buckets backing every [`LexemaPool`]. Matches the table size
/// used by the pool this type is modeled on.
const BUCKET_COUNT: usize = 1 << 16;

/// Handle to an interned lexeme. Cheap to copy, compares by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lexema(u32);

impl Lexema {
    fn from_entry_index(index: usize) -> Self {
        Lexema(index as u32)
    }

    fn entry_index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Lexema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct LexemaEntry {
    text: Box<str>,
    /// Index, within `entries`, of the next entry in this bucket's chain.
    next: Option<u32>,
}

/// Interning pool mapping byte strings to stable [`Lexema`] handles.
///
/// Owned by a single compilation unit; dropped along with it. Not `Sync` —
/// there is exactly one pool per translation unit and the pipeline that
/// reads and writes it is strictly single-threaded.
pub struct LexemaPool {
    buckets: Vec<Option<u32>>,
    entries: Vec<LexemaEntry>,
    collisions: usize,
}

impl LexemaPool {
    /// Creates an empty pool with the standard bucket count.
    pub fn new() -> Self {
        Self {
            buckets: vec![None; BUCKET_COUNT],
            entries: Vec::new(),
            collisions: 0,
        }
    }

    fn hash(text: &str) -> usize {
        let mut h: u32 = 0;
        for &b in text.as_bytes() {
            h = h.wrapping_mul(128).wrapping_add(b as u32);
        }
        (h.wrapping_mul(36) as usize) % BUCKET_COUNT
    }

    /// Looks up `text` without inserting it.
    pub fn find(&self, text: &str) -> Option<Lexema> {
        let bucket = Self::hash(text);
        let mut cursor = self.buckets[bucket];
        while let Some(index) = cursor {
            let entry = &self.entries[index as usize];
            if &*entry.text == text {
                return Some(Lexema::from_entry_index(index as usize));
            }
            cursor = entry.next;
        }
        None
    }

    /// Interns `text`, returning the existing handle if already present.
    pub fn intern(&mut self, text: &str) -> Lexema {
        if let Some(existing) = self.find(text) {
            return existing;
        }

        let bucket = Self::hash(text);
        let new_index = self.entries.len() as u32;
        self.entries.push(LexemaEntry {
            text: text.into(),
            next: None,
        });

        match self.buckets[bucket] {
            None => self.buckets[bucket] = Some(new_index),
            Some(head) => {
                self.collisions += 1;
                let mut tail = head;
                loop {
                    let next = self.entries[tail as usize].next;
                    match next {
                        Some(n) => tail = n,
                        None => break,
                    }
                }
                self.entries[tail as usize].next = Some(new_index);
            }
        }

        Lexema::from_entry_index(new_index as usize)
    }

    /// Resolves a handle back to its backing text.
    pub fn resolve(&self, lexema: Lexema) -> &str {
        &self.entries[lexema.entry_index()].text
    }

    /// Number of distinct lexemes interned so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of pool occupancy, mostly useful for tests and diagnostics.
    pub fn stats(&self) -> LexemaPoolStats {
        let occupied_buckets = self.buckets.iter().filter(|b| b.is_some()).count();
        LexemaPoolStats {
            bucket_count: BUCKET_COUNT,
            occupied_buckets,
            entry_count: self.entries.len(),
            collisions: self.collisions,
        }
    }
}

impl Default for LexemaPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Occupancy snapshot of a [`LexemaPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexemaPoolStats {
    pub bucket_count: usize,
    pub occupied_buckets: usize,
    pub entry_count: usize,
    pub collisions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_text_twice_returns_same_handle() {
        let mut pool = LexemaPool::new();
        let a = pool.intern("foo");
        let b = pool.intern("foo");
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn interning_distinct_text_returns_distinct_handles() {
        let mut pool = LexemaPool::new();
        let a = pool.intern("foo");
        let b = pool.intern("bar");
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn resolve_round_trips_original_text() {
        let mut pool = LexemaPool::new();
        let handle = pool.intern("identifier_123");
        assert_eq!(pool.resolve(handle), "identifier_123");
    }

    #[test]
    fn find_without_insert_does_not_grow_pool() {
        let mut pool = LexemaPool::new();
        pool.intern("known");
        assert!(pool.find("known").is_some());
        assert!(pool.find("unknown").is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn empty_string_is_a_valid_lexeme() {
        let mut pool = LexemaPool::new();
        let a = pool.intern("");
        let b = pool.intern("");
        assert_eq!(a, b);
    }

    #[test]
    fn collision_chain_preserves_insertion_order_and_distinct_lookup() {
        // Two texts that are very likely, but not guaranteed, to collide;
        // regardless of collision the pool must resolve each correctly.
        let mut pool = LexemaPool::new();
        let handles: Vec<Lexema> = (0..64)
            .map(|i| pool.intern(&format!("sym_{i}")))
            .collect();
        for (i, h) in handles.iter().enumerate() {
            assert_eq!(pool.resolve(*h), format!("sym_{i}"));
        }
        let stats = pool.stats();
        assert_eq!(stats.entry_count, 64);
    }

    #[test]
    fn stats_report_bucket_count_matches_constant() {
        let pool = LexemaPool::new();
        assert_eq!(pool.stats().bucket_count, BUCKET_COUNT);
        assert_eq!(pool.stats().entry_count, 0);
    }
}
