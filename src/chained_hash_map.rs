//! ChainedHashMap: bucket-chained hash table over a slot arena.
//!
//! Entries live in a `SlotMap`; each bucket holds the id of its chain head
//! and every entry links to the next one in its chain. Rehashing rebuilds
//! only the bucket array and relinks the existing entries, so entry ids
//! (and the cursor positions built on them) survive growth.
//!
//! Each entry stores its 32-bit hash. Rehash reads the stored hash and
//! never calls back into the hashing strategy.
//!
//! The null key is kept as an ordinary entry whose key is `None` and whose
//! hash is 0, so it always sits in bucket 0. It is found by the `*_null`
//! methods only and is never handed to `keys_equal`.

use crate::cursor::Cursor;
use crate::error::RemoveError;
use crate::hashing::{EqualsFn, FnHashing, HashFn, KeyHashing, StringHashing};
use core::borrow::Borrow;
use core::fmt;
use slotmap::SlotMap;

pub const DEFAULT_BUCKET_COUNT: usize = 11;
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

slotmap::new_key_type! {
    struct EntryId;
}

#[derive(Clone)]
struct Entry<K, V> {
    key: Option<K>,
    value: V,
    hash: u32,
    next: Option<EntryId>,
}

#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = StringHashing> {
    buckets: Vec<Option<EntryId>>,
    entries: SlotMap<EntryId, Entry<K, V>>,
    load_factor: f32,
    threshold: usize,
    hashing: S,
}

fn threshold_for(bucket_count: usize, load_factor: f32) -> usize {
    (bucket_count as f32 * load_factor) as usize
}

impl<K, V> ChainedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hashing(StringHashing)
    }

    pub fn with_buckets(bucket_count: usize, load_factor: f32) -> Self {
        Self::with_buckets_and_hashing(bucket_count, load_factor, StringHashing)
    }
}

impl<K, V, S: Default> Default for ChainedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hashing(S::default())
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    pub fn with_hashing(hashing: S) -> Self {
        Self::with_buckets_and_hashing(DEFAULT_BUCKET_COUNT, DEFAULT_LOAD_FACTOR, hashing)
    }

    /// Panics if `bucket_count` is zero or `load_factor` is not a positive
    /// finite number.
    pub fn with_buckets_and_hashing(bucket_count: usize, load_factor: f32, hashing: S) -> Self {
        assert!(bucket_count > 0, "bucket count must be non-zero");
        assert!(
            load_factor.is_finite() && load_factor > 0.0,
            "load factor must be positive and finite"
        );
        Self {
            buckets: vec![None; bucket_count],
            entries: SlotMap::with_key(),
            load_factor,
            threshold: threshold_for(bucket_count, load_factor),
            hashing,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    #[inline]
    fn bucket_of(&self, hash: u32) -> usize {
        hash as usize % self.buckets.len()
    }

    fn find_null(&self) -> Option<EntryId> {
        let mut cur = self.buckets[0];
        while let Some(id) = cur {
            let e = &self.entries[id];
            if e.key.is_none() {
                return Some(id);
            }
            cur = e.next;
        }
        None
    }

    /// Unlink `id` from its chain and release its slot.
    fn unlink(&mut self, id: EntryId) -> Option<(Option<K>, V)> {
        let idx = self.bucket_of(self.entries.get(id)?.hash);
        let mut prev: Option<EntryId> = None;
        let mut cur = self.buckets[idx];
        while let Some(c) = cur {
            if c == id {
                break;
            }
            prev = cur;
            cur = self.entries[c].next;
        }
        cur?;
        let e = self.entries.remove(id)?;
        match prev {
            None => self.buckets[idx] = e.next,
            Some(p) => self.entries[p].next = e.next,
        }
        Some((e.key, e.value))
    }

    /// Store a new entry. The size check and any rehash happen before the
    /// entry's bucket is chosen.
    fn link_new(&mut self, key: Option<K>, hash: u32, value: V) {
        let id = self.entries.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        if self.entries.len() > self.threshold {
            self.relink(self.buckets.len() * 2 + 1);
        }
        let idx = self.bucket_of(hash);
        self.entries[id].next = self.buckets[idx];
        self.buckets[idx] = Some(id);
    }

    /// Rebuild the bucket array with `bucket_count` buckets, moving every
    /// linked entry to the tail of its new chain.
    fn relink(&mut self, bucket_count: usize) {
        log::trace!(
            "chained_hash_map: rehash {} -> {} buckets ({} entries)",
            self.buckets.len(),
            bucket_count,
            self.entries.len()
        );
        let old = core::mem::replace(&mut self.buckets, vec![None; bucket_count]);
        let mut tails: Vec<Option<EntryId>> = vec![None; bucket_count];
        for head in old {
            let mut cur = head;
            while let Some(id) = cur {
                let e = &mut self.entries[id];
                cur = e.next.take();
                let idx = e.hash as usize % bucket_count;
                match tails[idx] {
                    Some(t) => self.entries[t].next = Some(id),
                    None => self.buckets[idx] = Some(id),
                }
                tails[idx] = Some(id);
            }
        }
        self.threshold = threshold_for(bucket_count, self.load_factor);
    }

    pub fn get_null(&self) -> Option<&V> {
        self.find_null().map(|id| &self.entries[id].value)
    }

    pub fn contains_null_key(&self) -> bool {
        self.find_null().is_some()
    }

    /// Insert or replace the value stored under the null key.
    pub fn put_null(&mut self, value: V) -> Option<V> {
        if let Some(id) = self.find_null() {
            return Some(core::mem::replace(&mut self.entries[id].value, value));
        }
        self.link_new(None, 0, value);
        None
    }

    pub fn remove_null(&mut self) -> Option<V> {
        let id = self.find_null()?;
        self.unlink(id).map(|(_, v)| v)
    }

    /// Linear scan over every value.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.entries.values().any(|e| e.value == *value)
    }

    /// Drop every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        for b in self.buckets.iter_mut() {
            *b = None;
        }
    }

    fn first_from(&self, bucket: usize) -> (usize, Option<EntryId>) {
        let mut i = bucket;
        while i < self.buckets.len() && self.buckets[i].is_none() {
            i += 1;
        }
        (i, self.buckets.get(i).copied().flatten())
    }

    /// Entries in bucket order, most recently inserted first within a chain.
    /// The null key is yielded as `None`.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        let (bucket, cur) = self.first_from(0);
        Iter {
            map: self,
            bucket,
            cur,
            remaining: self.len(),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = Option<&K>> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Mutable access to every value, in storage order rather than bucket
    /// order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut().map(|e| &mut e.value)
    }

    pub fn value_cursor(&mut self) -> HashValueCursor<'_, K, V, S> {
        let (bucket, next) = self.first_from(0);
        HashValueCursor {
            map: self,
            bucket,
            next,
            last: None,
        }
    }

    /// Every entry is reachable from exactly one chain, in the bucket its
    /// stored hash selects.
    #[cfg(test)]
    pub(crate) fn check_chains(&self) {
        let mut seen = 0usize;
        let mut nulls = 0usize;
        for (idx, head) in self.buckets.iter().enumerate() {
            let mut cur = *head;
            while let Some(id) = cur {
                let e = &self.entries[id];
                assert_eq!(self.bucket_of(e.hash), idx, "entry linked in wrong bucket");
                if e.key.is_none() {
                    assert_eq!(idx, 0, "null key outside bucket 0");
                    nulls += 1;
                }
                seen += 1;
                assert!(seen <= self.entries.len(), "chain cycle");
                cur = e.next;
            }
        }
        assert_eq!(seen, self.entries.len(), "unlinked entries");
        assert!(nulls <= 1, "more than one null key");
    }
}

impl<K, V, S> ChainedHashMap<K, V, S> {
    /// Every non-null entry of the chain is offered to `keys_equal`; the
    /// stored hash only selects the bucket.
    fn find<Q>(&self, key: &Q, hash: u32) -> Option<EntryId>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyHashing<Q>,
    {
        let mut cur = self.buckets[self.bucket_of(hash)];
        while let Some(id) = cur {
            let e = &self.entries[id];
            if let Some(k) = &e.key {
                if self.hashing.keys_equal(key, k.borrow()) {
                    return Some(id);
                }
            }
            cur = e.next;
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyHashing<Q>,
    {
        let id = self.find(key, self.hashing.hash_key(key))?;
        Some(&self.entries[id].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyHashing<Q>,
    {
        let id = self.find(key, self.hashing.hash_key(key))?;
        Some(&mut self.entries[id].value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyHashing<Q>,
    {
        self.find(key, self.hashing.hash_key(key)).is_some()
    }

    /// Insert `key -> value`, or replace the value of an equal key in place
    /// (the stored key is kept). Returns the previous value.
    pub fn put(&mut self, key: K, value: V) -> Option<V>
    where
        S: KeyHashing<K>,
    {
        let hash = self.hashing.hash_key(&key);
        if let Some(id) = self.find(&key, hash) {
            return Some(core::mem::replace(&mut self.entries[id].value, value));
        }
        self.link_new(Some(key), hash, value);
        None
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        S: KeyHashing<Q>,
    {
        let id = self.find(key, self.hashing.hash_key(key))?;
        self.unlink(id).map(|(_, v)| v)
    }
}

impl<K, V> ChainedHashMap<K, V, FnHashing<K>> {
    /// Replace the hash function and relink every entry under it.
    pub fn set_hash_function(&mut self, hash: HashFn<K>) {
        self.hashing.hash = hash;
        for e in self.entries.values_mut() {
            if let Some(k) = &e.key {
                e.hash = hash(k);
            }
        }
        self.relink(self.buckets.len());
    }

    /// Replace the equality function. Entries that become equal under the
    /// new function are not merged.
    pub fn set_equality_function(&mut self, equals: EqualsFn<K>) {
        self.hashing.equals = equals;
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for ChainedHashMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over `(key, value)` pairs in bucket order.
pub struct Iter<'a, K, V, S> {
    map: &'a ChainedHashMap<K, V, S>,
    bucket: usize,
    cur: Option<EntryId>,
    remaining: usize,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (Option<&'a K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        let map = self.map;
        let e = &map.entries[id];
        self.cur = e.next;
        if self.cur.is_none() {
            let (b, c) = map.first_from(self.bucket + 1);
            self.bucket = b;
            self.cur = c;
        }
        self.remaining -= 1;
        Some((e.key.as_ref(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, S> ExactSizeIterator for Iter<'a, K, V, S> {}

/// Value cursor walking buckets in ascending order and each chain from its
/// head. It holds the id of the entry to yield next and of the entry last
/// yielded; removing the latter never disturbs the former.
pub struct HashValueCursor<'a, K, V, S> {
    map: &'a mut ChainedHashMap<K, V, S>,
    bucket: usize,
    next: Option<EntryId>,
    last: Option<EntryId>,
}

impl<'a, K, V, S> HashValueCursor<'a, K, V, S> {
    fn advance(&mut self) -> Option<EntryId> {
        let id = self.next?;
        self.last = Some(id);
        self.next = self.map.entries[id].next;
        if self.next.is_none() {
            let (b, n) = self.map.first_from(self.bucket + 1);
            self.bucket = b;
            self.next = n;
        }
        Some(id)
    }

    /// Key of the entry last returned by `next`; `Some(None)` for the null key.
    pub fn current_key(&self) -> Option<Option<&K>> {
        let id = self.last?;
        self.map.entries.get(id).map(|e| e.key.as_ref())
    }
}

impl<'a, K, V, S> Cursor for HashValueCursor<'a, K, V, S> {
    type Item = V;

    fn has_next(&self) -> bool {
        self.next.is_some()
    }

    fn next(&mut self) -> Option<&V> {
        let id = self.advance()?;
        Some(&self.map.entries[id].value)
    }

    fn next_mut(&mut self) -> Option<&mut V> {
        let id = self.advance()?;
        Some(&mut self.map.entries[id].value)
    }

    fn remove_current(&mut self) -> Result<V, RemoveError> {
        let id = self.last.take().ok_or(RemoveError::NoCurrent)?;
        self.map
            .unlink(id)
            .map(|(_, v)| v)
            .ok_or(RemoveError::NoCurrent)
    }

    fn restart(&mut self) {
        let (b, n) = self.map.first_from(0);
        self.bucket = b;
        self.next = n;
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::StdHashing;
    use std::collections::BTreeSet;
    use std::rc::Rc;

    fn ident_hash(k: &u32) -> u32 {
        *k
    }
    fn zero_hash(_k: &u32) -> u32 {
        0
    }
    fn u32_eq(a: &u32, b: &u32) -> bool {
        a == b
    }

    fn ident_map<V>(buckets: usize) -> ChainedHashMap<u32, V, FnHashing<u32>> {
        ChainedHashMap::with_buckets_and_hashing(
            buckets,
            DEFAULT_LOAD_FACTOR,
            FnHashing::new(ident_hash, u32_eq),
        )
    }

    /// Invariant: put returns the previous value, get sees the latest one.
    #[test]
    fn put_get_replace() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        assert_eq!(m.put("a".to_string(), 1), None);
        assert_eq!(m.put("b".to_string(), 2), None);
        assert_eq!(m.put("a".to_string(), 3), Some(1));
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("a"), Some(&3));
        assert_eq!(m.get("b"), Some(&2));
        assert_eq!(m.get("c"), None);
        assert!(m.contains_key("a"));
        assert!(!m.contains_key("c"));
        m.check_chains();
    }

    /// Invariant: removing an absent key leaves the size unchanged.
    #[test]
    fn remove_present_and_absent() {
        let mut m: ChainedHashMap<&'static str, i32> = ChainedHashMap::new();
        m.put("x", 1);
        m.put("y", 2);
        assert_eq!(m.remove("nope"), None);
        assert_eq!(m.len(), 2);
        assert_eq!(m.remove("x"), Some(1));
        assert_eq!(m.remove("x"), None);
        assert_eq!(m.len(), 1);
        assert!(!m.contains_key("x"));
        m.check_chains();
    }

    /// Invariant: the null key is distinct from every hashed key, including
    /// keys that hash into bucket 0.
    #[test]
    fn null_key_is_a_reserved_slot() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        // "" hashes to 0 and shares bucket 0 with the null key.
        m.put(String::new(), 1);
        assert!(!m.contains_null_key());
        assert_eq!(m.get_null(), None);
        assert_eq!(m.put_null(2), None);
        assert_eq!(m.put_null(3), Some(2));
        assert_eq!(m.len(), 2);
        assert_eq!(m.get(""), Some(&1));
        assert_eq!(m.get_null(), Some(&3));
        assert_eq!(m.remove(""), Some(1));
        assert_eq!(m.get_null(), Some(&3));
        assert_eq!(m.remove_null(), Some(3));
        assert_eq!(m.remove_null(), None);
        assert!(m.is_empty());
    }

    /// Invariant: the null key survives rehashing and stays in bucket 0.
    #[test]
    fn null_key_survives_rehash() {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::with_buckets(1, 0.75);
        m.put_null(usize::MAX);
        for i in 0..200 {
            m.put(format!("k{i}"), i);
        }
        assert!(m.bucket_count() > 1);
        assert_eq!(m.get_null(), Some(&usize::MAX));
        m.check_chains();
    }

    /// Invariant: every key stays reachable, including right after the
    /// insert that triggered a rehash.
    #[test]
    fn rehash_is_transparent() {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::with_buckets(1, 0.75);
        let mut buckets = m.bucket_count();
        for i in 0..1000 {
            m.put(format!("key-{i}"), i);
            if m.bucket_count() != buckets {
                assert_eq!(m.bucket_count(), buckets * 2 + 1);
                buckets = m.bucket_count();
                assert_eq!(m.get(format!("key-{i}").as_str()), Some(&i));
            }
        }
        for i in 0..1000 {
            assert_eq!(m.get(format!("key-{i}").as_str()), Some(&i));
        }
        assert_eq!(m.len(), 1000);
        m.check_chains();
    }

    /// Invariant: growth happens when size exceeds bucket_count * load_factor.
    #[test]
    fn rehash_threshold() {
        let mut m = ident_map::<()>(4);
        // threshold = 3
        for k in 0..3 {
            m.put(k, ());
        }
        assert_eq!(m.bucket_count(), 4);
        m.put(3, ());
        assert_eq!(m.bucket_count(), 9);
        m.check_chains();
    }

    /// Invariant: buckets ascend; within a chain the newest entry comes first.
    #[test]
    fn iteration_order() {
        let mut m = ident_map::<u32>(11);
        m.put(1, 1);
        m.put(12, 12);
        m.put(2, 2);
        m.put(0, 0);
        let vals: Vec<u32> = m.values().copied().collect();
        assert_eq!(vals, vec![0, 12, 1, 2]);

        let mut seen = Vec::new();
        let mut c = m.value_cursor();
        while let Some(v) = c.next() {
            seen.push(*v);
        }
        assert_eq!(seen, vals);
    }

    /// Invariant: rehash preserves the relative order of entries that land in
    /// the same new bucket.
    #[test]
    fn rehash_preserves_chain_order() {
        let mut m: ChainedHashMap<u32, u32, _> =
            ChainedHashMap::with_buckets_and_hashing(1, 3.0, FnHashing::new(ident_hash, u32_eq));
        for k in [0, 3, 6] {
            m.put(k, k);
        }
        // Prepended into the single bucket.
        assert_eq!(m.bucket_count(), 1);
        assert_eq!(m.values().copied().collect::<Vec<_>>(), vec![6, 3, 0]);

        // Fourth entry exceeds floor(1 * 3.0); 0, 3 and 6 share bucket 0 of 3.
        m.put(1, 1);
        assert_eq!(m.bucket_count(), 3);
        assert_eq!(m.values().copied().collect::<Vec<_>>(), vec![6, 3, 0, 1]);
        m.check_chains();
    }

    /// Invariant: equality decides key identity for every entry in the
    /// chain, even when the stored hashes differ.
    #[test]
    fn equality_coarser_than_hash_replaces() {
        fn same_last_digit(a: &u32, b: &u32) -> bool {
            a % 10 == b % 10
        }
        let mut m: ChainedHashMap<u32, &'static str, _> =
            ChainedHashMap::with_buckets_and_hashing(10, 10.0, FnHashing::new(ident_hash, same_last_digit));
        assert_eq!(m.put(1, "one"), None);
        assert_eq!(m.put(11, "eleven"), Some("one"));
        assert_eq!(m.len(), 1);
        assert_eq!(m.keys().next(), Some(Some(&1)));
        assert_eq!(m.get(&21), Some(&"eleven"));
        assert_eq!(m.remove(&31), Some("eleven"));
        assert!(m.is_empty());
    }

    /// Invariant: removing through the cursor neither skips nor revisits.
    #[test]
    fn cursor_remove_during_iteration() {
        let mut m: ChainedHashMap<&'static str, &'static str> = ChainedHashMap::new();
        for k in ["a", "b", "c", "d"] {
            m.put(k, k);
        }
        let mut visited = Vec::new();
        {
            let mut c = m.value_cursor();
            while let Some(&v) = c.next() {
                visited.push(v);
                if v == "b" || v == "c" {
                    assert_eq!(c.remove_current(), Ok(v));
                }
            }
        }
        visited.sort();
        assert_eq!(visited, vec!["a", "b", "c", "d"]);
        let left: BTreeSet<_> = m.values().copied().collect();
        assert_eq!(left, ["a", "d"].into_iter().collect());
        m.check_chains();
    }

    /// Invariant: removing every entry in one chain through the cursor walks
    /// the chain to its end and continues to the next bucket.
    #[test]
    fn cursor_remove_whole_colliding_chain() {
        let mut m: ChainedHashMap<u32, u32, FnHashing<u32>> =
            ChainedHashMap::with_buckets_and_hashing(64, 0.75, FnHashing::new(zero_hash, u32_eq));
        for k in 0..20 {
            m.put(k, k);
        }
        let mut c = m.value_cursor();
        let mut n = 0;
        while c.next().is_some() {
            c.remove_current().unwrap();
            n += 1;
        }
        drop(c);
        assert_eq!(n, 20);
        assert!(m.is_empty());
        m.check_chains();
    }

    #[test]
    fn cursor_misuse_reports_no_current() {
        let mut m: ChainedHashMap<&'static str, i32> = ChainedHashMap::new();
        m.put("a", 1);
        let mut c = m.value_cursor();
        assert_eq!(c.remove_current(), Err(RemoveError::NoCurrent));
        assert_eq!(c.next(), Some(&1));
        assert_eq!(c.current_key(), Some(Some(&"a")));
        assert_eq!(c.remove_current(), Ok(1));
        assert_eq!(c.remove_current(), Err(RemoveError::NoCurrent));
        assert!(!c.has_next());
    }

    /// Invariant: restart observes changes made since the cursor was created.
    #[test]
    fn cursor_restart_is_not_a_snapshot() {
        let mut m: ChainedHashMap<&'static str, i32> = ChainedHashMap::new();
        m.put("a", 1);
        m.put("b", 2);
        let mut c = m.value_cursor();
        c.next();
        c.remove_current().unwrap();
        c.restart();
        let mut n = 0;
        while c.next().is_some() {
            n += 1;
        }
        assert_eq!(n, 1);
    }

    #[test]
    fn cursor_next_mut_updates_values() {
        let mut m: ChainedHashMap<&'static str, i32> = ChainedHashMap::new();
        m.put("a", 1);
        m.put("b", 2);
        let mut c = m.value_cursor();
        while let Some(v) = c.next_mut() {
            *v *= 10;
        }
        drop(c);
        assert_eq!(m.get("a"), Some(&10));
        assert_eq!(m.get("b"), Some(&20));
    }

    #[test]
    fn contains_value_and_clear() {
        let mut m: ChainedHashMap<&'static str, i32> = ChainedHashMap::new();
        m.put("a", 1);
        m.put_null(5);
        assert!(m.contains_value(&1));
        assert!(m.contains_value(&5));
        assert!(!m.contains_value(&2));
        let buckets = m.bucket_count();
        m.clear();
        assert!(m.is_empty());
        assert!(!m.contains_key("a"));
        assert!(!m.contains_null_key());
        assert_eq!(m.bucket_count(), buckets);
        m.put("a", 2);
        assert_eq!(m.get("a"), Some(&2));
    }

    /// Invariant: clones are independent but alias the same payloads.
    #[test]
    fn clone_is_independent() {
        let mut m: ChainedHashMap<String, Rc<i32>> = ChainedHashMap::new();
        let one = Rc::new(1);
        m.put("a".to_string(), one.clone());
        m.put("b".to_string(), Rc::new(2));
        let mut c = m.clone();
        assert!(Rc::ptr_eq(c.get("a").unwrap(), &one));

        c.remove("a");
        c.put("z".to_string(), Rc::new(26));
        assert!(m.contains_key("a"));
        assert!(!m.contains_key("z"));

        m.remove("b");
        assert!(c.contains_key("b"));
        assert_eq!(Rc::strong_count(&one), 2);
    }

    /// Invariant: changing the hash function keeps every entry reachable.
    #[test]
    fn set_hash_function_relinks() {
        let mut m = ident_map::<u32>(11);
        for k in 0..8 {
            m.put(k, k * 2);
        }
        m.set_hash_function(zero_hash);
        m.check_chains();
        for k in 0..8 {
            assert_eq!(m.get(&k), Some(&(k * 2)));
        }
        m.set_hash_function(ident_hash);
        m.check_chains();
        assert_eq!(m.remove(&3), Some(6));
    }

    #[test]
    fn set_equality_function_changes_matching() {
        fn mod10_eq(a: &u32, b: &u32) -> bool {
            a % 10 == b % 10
        }
        fn mod10_hash(k: &u32) -> u32 {
            k % 10
        }
        let mut m = ident_map::<&'static str>(11);
        m.set_hash_function(mod10_hash);
        m.put(1, "one");
        assert_eq!(m.get(&11), None);
        m.set_equality_function(mod10_eq);
        assert_eq!(m.get(&11), Some(&"one"));
        assert_eq!(m.put(21, "twenty-one"), Some("one"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn std_hashing_for_non_string_keys() {
        let mut m: ChainedHashMap<(u8, u8), &'static str, StdHashing> =
            ChainedHashMap::default();
        m.put((1, 2), "a");
        m.put((2, 1), "b");
        assert_eq!(m.get(&(1, 2)), Some(&"a"));
        assert_eq!(m.get(&(2, 1)), Some(&"b"));
        assert_eq!(m.len(), 2);
    }

    #[test]
    #[should_panic(expected = "load factor")]
    fn rejects_non_positive_load_factor() {
        let _m: ChainedHashMap<String, i32> = ChainedHashMap::with_buckets(8, 0.0);
    }

    #[test]
    fn debug_lists_entries() {
        let mut m: ChainedHashMap<&'static str, i32> = ChainedHashMap::new();
        m.put("a", 1);
        assert_eq!(format!("{:?}", m), "{Some(\"a\"): 1}");
    }
}
