//! Hash/equality strategies for `ChainedHashMap`.
//!
//! A strategy is chosen when the map is built and travels with it as a
//! type parameter. Lookups are generic over a borrowed form `Q` of the
//! key, so a strategy implements `KeyHashing<Q>` for every `Q` it can
//! hash; stored keys and their borrowed forms must hash identically.

use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use hashbrown::hash_map::DefaultHashBuilder;

/// Hash and equality for map keys. `keys_equal` is consulted for every
/// entry in the selected chain; `hash_key` only picks the chain.
pub trait KeyHashing<Q: ?Sized> {
    fn hash_key(&self, key: &Q) -> u32;
    fn keys_equal(&self, a: &Q, b: &Q) -> bool;
}

/// Multiplicative string hash: `h = h * 31 + byte`, wrapping, over the
/// UTF-8 bytes read as unsigned. Strings with bytes >= 0x80 therefore hash
/// differently from a `char`-signed C implementation of the same formula.
pub fn string_hash(key: &str) -> u32 {
    key.bytes()
        .fold(0u32, |h, b| (h << 5).wrapping_sub(h).wrapping_add(b as u32))
}

/// Default strategy: `string_hash` with byte-wise string equality.
#[derive(Copy, Clone, Debug, Default)]
pub struct StringHashing;

impl<Q> KeyHashing<Q> for StringHashing
where
    Q: ?Sized + AsRef<str>,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u32 {
        string_hash(key.as_ref())
    }
    #[inline]
    fn keys_equal(&self, a: &Q, b: &Q) -> bool {
        a.as_ref() == b.as_ref()
    }
}

/// Strategy for any `Hash + Eq` key, driven by a `BuildHasher`.
#[derive(Clone, Debug, Default)]
pub struct StdHashing<S = DefaultHashBuilder> {
    hasher: S,
}

impl<S> StdHashing<S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self { hasher }
    }
}

impl<Q, S> KeyHashing<Q> for StdHashing<S>
where
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &Q) -> u32 {
        let h = self.hasher.hash_one(key);
        (h ^ (h >> 32)) as u32
    }
    #[inline]
    fn keys_equal(&self, a: &Q, b: &Q) -> bool {
        a == b
    }
}

pub type HashFn<K> = fn(&K) -> u32;
pub type EqualsFn<K> = fn(&K, &K) -> bool;

/// Strategy made of two plain functions; either half can be replaced
/// through the owning map.
pub struct FnHashing<K: ?Sized> {
    pub(crate) hash: HashFn<K>,
    pub(crate) equals: EqualsFn<K>,
    _pd: PhantomData<fn(&K)>,
}

impl<K: ?Sized> FnHashing<K> {
    pub fn new(hash: HashFn<K>, equals: EqualsFn<K>) -> Self {
        Self {
            hash,
            equals,
            _pd: PhantomData,
        }
    }
}

impl<K: ?Sized> Clone for FnHashing<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for FnHashing<K> {}

impl<K: ?Sized> core::fmt::Debug for FnHashing<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnHashing").finish_non_exhaustive()
    }
}

impl<K: ?Sized> KeyHashing<K> for FnHashing<K> {
    #[inline]
    fn hash_key(&self, key: &K) -> u32 {
        (self.hash)(key)
    }
    #[inline]
    fn keys_equal(&self, a: &K, b: &K) -> bool {
        (self.equals)(a, b)
    }
}
