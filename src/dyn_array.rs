//! DynArray: contiguous, capacity-doubling sequence with an explicit
//! capacity contract.
//!
//! The logical capacity is tracked separately from the backing `Vec` so
//! growth follows one rule everywhere: the new capacity is the larger of
//! twice the old capacity and the requested minimum. `trim_to_size`
//! shrinks it to exactly `len`.

use crate::cursor::Cursor;
use crate::error::{IndexError, RemoveError};

pub const DEFAULT_ARRAY_CAPACITY: usize = 16;

#[derive(Clone, Debug)]
pub struct DynArray<T> {
    data: Vec<T>,
    capacity: usize,
}

impl<T> DynArray<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ARRAY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grow so that at least `min_capacity` slots are allocated.
    pub fn ensure_capacity(&mut self, min_capacity: usize) {
        if min_capacity <= self.capacity {
            return;
        }
        let new_capacity = core::cmp::max(self.capacity.saturating_mul(2), min_capacity);
        log::trace!(
            "dyn_array: growing capacity {} -> {}",
            self.capacity,
            new_capacity
        );
        self.data.reserve_exact(new_capacity - self.data.len());
        self.capacity = new_capacity;
    }

    /// Append in amortized O(1).
    pub fn add(&mut self, value: T) {
        if self.data.len() == self.capacity {
            self.ensure_capacity(self.data.len() + 1);
        }
        self.data.push(value);
    }

    /// Insert at `index`, shifting the tail right. `index == len` appends.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), IndexError> {
        let len = self.data.len();
        if index > len {
            return Err(IndexError { index, len });
        }
        if len == self.capacity {
            self.ensure_capacity(len + 1);
        }
        self.data.insert(index, value);
        Ok(())
    }

    /// Remove the element at `index`, shifting the tail left.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.data.len() {
            return None;
        }
        Some(self.data.remove(index))
    }

    pub fn remove_last(&mut self) -> Option<T> {
        self.data.pop()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    pub fn get_last(&self) -> Option<&T> {
        self.data.last()
    }

    /// Replace the element at `index`, returning the previous one.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, IndexError> {
        let len = self.data.len();
        match self.data.get_mut(index) {
            Some(slot) => Ok(core::mem::replace(slot, value)),
            None => Err(IndexError { index, len }),
        }
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value).is_some()
    }

    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.data.iter().position(|v| v == value)
    }

    pub fn last_index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.data.iter().rposition(|v| v == value)
    }

    /// Drop every element; the capacity is kept.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Shrink the capacity to exactly the current length.
    pub fn trim_to_size(&mut self) {
        log::trace!(
            "dyn_array: trimming capacity {} -> {}",
            self.capacity,
            self.data.len()
        );
        self.data.shrink_to_fit();
        self.capacity = self.data.len();
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }

    /// Snapshot with a trailing `None` marking the end.
    pub fn to_null_terminated(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.extend(self.data.iter().cloned().map(Some));
        out.push(None);
        out
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn cursor(&mut self) -> ArrayCursor<'_, T> {
        ArrayCursor {
            array: self,
            pos: 0,
            has_current: false,
        }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for DynArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut a = DynArray::with_capacity(core::cmp::max(lower, DEFAULT_ARRAY_CAPACITY));
        for v in iter {
            a.add(v);
        }
        a
    }
}

/// Index-based cursor. `remove_current` steps the position back so the
/// element shifted into the freed slot is visited next.
pub struct ArrayCursor<'a, T> {
    array: &'a mut DynArray<T>,
    pos: usize,
    has_current: bool,
}

impl<'a, T> Cursor for ArrayCursor<'a, T> {
    type Item = T;

    fn has_next(&self) -> bool {
        self.pos < self.array.len()
    }

    fn next(&mut self) -> Option<&T> {
        if self.pos >= self.array.len() {
            return None;
        }
        self.pos += 1;
        self.has_current = true;
        self.array.get(self.pos - 1)
    }

    fn next_mut(&mut self) -> Option<&mut T> {
        if self.pos >= self.array.len() {
            return None;
        }
        self.pos += 1;
        self.has_current = true;
        self.array.get_mut(self.pos - 1)
    }

    fn remove_current(&mut self) -> Result<T, RemoveError> {
        if !self.has_current {
            return Err(RemoveError::NoCurrent);
        }
        self.has_current = false;
        self.pos -= 1;
        self.array.remove_at(self.pos).ok_or(RemoveError::NoCurrent)
    }

    fn restart(&mut self) {
        self.pos = 0;
        self.has_current = false;
    }
}
