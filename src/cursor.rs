//! The cursor protocol shared by every container in the crate.
//!
//! A cursor is a single traversal pass over one container. It borrows the
//! container mutably, so the only structural change possible while it is
//! live is `remove_current`, which every implementation supports without
//! skipping or revisiting elements. `restart` rewinds to the first element
//! of the container as it is now; a cursor is never a snapshot.
//!
//! Generic consumers take `&mut dyn Cursor<Item = V>` (or a generic `C`)
//! and never learn which backing structure they are walking.

use crate::error::RemoveError;

pub trait Cursor {
    type Item;

    /// True if a following call to `next` yields an element.
    fn has_next(&self) -> bool;

    /// Advance and return the next element, or `None` at the end.
    fn next(&mut self) -> Option<&Self::Item>;

    /// Like `next`, but lends the element mutably.
    fn next_mut(&mut self) -> Option<&mut Self::Item>;

    /// Remove the element most recently returned by `next` and hand it back.
    ///
    /// Calling this before any `next`, or twice without an intervening
    /// `next`, returns `RemoveError::NoCurrent` and leaves the container
    /// untouched.
    fn remove_current(&mut self) -> Result<Self::Item, RemoveError>;

    /// Rewind to the beginning of the container.
    fn restart(&mut self);
}

/// Apply `f` to every remaining element of `cursor`.
pub fn for_each_value<C, F>(cursor: &mut C, mut f: F)
where
    C: Cursor + ?Sized,
    F: FnMut(&C::Item),
{
    while let Some(v) = cursor.next() {
        f(v);
    }
}

/// Remove every remaining element for which `keep` returns false.
/// Returns the removed elements in traversal order.
pub fn retain_values<C, F>(cursor: &mut C, mut keep: F) -> Vec<C::Item>
where
    C: Cursor + ?Sized,
    F: FnMut(&C::Item) -> bool,
{
    let mut removed = Vec::new();
    loop {
        let drop_it = match cursor.next() {
            Some(v) => !keep(v),
            None => break,
        };
        if drop_it {
            if let Ok(v) = cursor.remove_current() {
                removed.push(v);
            }
        }
    }
    removed
}

/// Consume the rest of the pass and count the elements seen.
pub fn count_remaining<C>(cursor: &mut C) -> usize
where
    C: Cursor + ?Sized,
{
    let mut n = 0;
    while cursor.next().is_some() {
        n += 1;
    }
    n
}
