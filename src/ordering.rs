//! Three-way comparators for `OrderedMap`.

use core::cmp::Ordering;
use core::marker::PhantomData;

/// Total order over keys. `Equal` means "same key".
pub trait KeyOrder<Q: ?Sized> {
    fn compare(&self, a: &Q, b: &Q) -> Ordering;
}

/// `Ord` order. For strings this is byte-wise, the same as `strcmp`.
#[derive(Copy, Clone, Debug, Default)]
pub struct NaturalOrder;

impl<Q: ?Sized + Ord> KeyOrder<Q> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        a.cmp(b)
    }
}

pub type CompareFn<K> = fn(&K, &K) -> Ordering;

/// Comparator given as a plain function.
pub struct FnOrder<K: ?Sized> {
    compare: CompareFn<K>,
    _pd: PhantomData<fn(&K)>,
}

impl<K: ?Sized> FnOrder<K> {
    pub fn new(compare: CompareFn<K>) -> Self {
        Self {
            compare,
            _pd: PhantomData,
        }
    }
}

impl<K: ?Sized> Clone for FnOrder<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for FnOrder<K> {}

impl<K: ?Sized> core::fmt::Debug for FnOrder<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnOrder").finish_non_exhaustive()
    }
}

impl<K: ?Sized> KeyOrder<K> for FnOrder<K> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.compare)(a, b)
    }
}

/// Flips another comparator.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReverseOrder<O>(pub O);

impl<Q: ?Sized, O: KeyOrder<Q>> KeyOrder<Q> for ReverseOrder<O> {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        self.0.compare(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_on_strings_is_bytewise() {
        let o = NaturalOrder;
        assert_eq!(o.compare("a", "b"), Ordering::Less);
        assert_eq!(o.compare("B", "a"), Ordering::Less);
        assert_eq!(o.compare("ab", "a"), Ordering::Greater);
        assert_eq!(o.compare("x", "x"), Ordering::Equal);
    }

    #[test]
    fn reverse_and_fn_orders() {
        fn by_len(a: &String, b: &String) -> Ordering {
            a.len().cmp(&b.len())
        }
        let f = FnOrder::new(by_len);
        let long = "long".to_string();
        let s = "s".to_string();
        assert_eq!(f.compare(&long, &s), Ordering::Greater);
        assert_eq!(ReverseOrder(f).compare(&long, &s), Ordering::Less);
        assert_eq!(ReverseOrder(NaturalOrder).compare(&1, &2), Ordering::Greater);
    }
}
