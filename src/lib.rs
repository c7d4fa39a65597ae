//! assoc-maps: a chained hash map, a red-black ordered map and a growable
//! array that share one cursor protocol with removal during traversal.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: small, self-contained associative containers whose traversal
//!   can remove the element just visited without skipping or revisiting
//!   anything.
//! - Containers:
//!   - DynArray<T>: contiguous sequence with an explicit capacity that
//!     doubles (or jumps to the requested minimum) on growth.
//!   - ChainedHashMap<K, V, S>: separate chaining over a bucket vector;
//!     hash and equality come from a `KeyHashing` strategy `S`.
//!   - OrderedMap<K, V, O>: red-black tree ordered by a `KeyOrder`
//!     strategy `O`.
//!   - Palette: a color-deduplication client of ChainedHashMap.
//! - Cursor: `has_next`/`next`/`next_mut`/`remove_current`/`restart`,
//!   object safe, implemented by each container's value cursor.
//!
//! Storage
//! - Hash-map entries and tree nodes live in a `slotmap::SlotMap` and link
//!   to each other by generational id. "No neighbour" is `None`; there is
//!   no shared sentinel node.
//! - Containers own their keys and values. Cloning a container clones the
//!   payloads; use `Rc` payloads to share them between copies.
//!
//! Hash map invariants
//! - Each entry stores its 32-bit hash. Rehashing relinks by stored hash
//!   and never calls user code.
//! - The table grows to `2n + 1` buckets when the entry count exceeds
//!   `floor(n * load_factor)`; growth happens before the new entry's bucket
//!   is chosen. Relinking appends, so chain order is stable; new entries
//!   are prepended.
//! - The null key is modelled by the `*_null` methods. Its entry sits in
//!   bucket 0 and is never hashed or compared.
//!
//! Ordered map invariants
//! - Root black, no red node with a red child, equal black height on every
//!   root-to-leaf path, in-order traversal strictly ascending.
//! - Deleting a node with two children relinks its successor into place,
//!   so a cursor holding the successor's id keeps a valid position.
//!
//! Cursor contract
//! - `remove_current` removes the element returned by the latest `next`
//!   and fails with `RemoveError::NoCurrent` if there is none.
//! - After a removal, `next` returns the element that would have followed.
//! - A cursor borrows its container mutably, so no other mutation can
//!   happen while it is alive.
//!
//! Notes and non-goals
//! - Single-threaded; no internal synchronization.
//! - No serialization of container contents.
//! - Structural events (rehash, array growth/trim, tree clear) are logged
//!   at `trace` level through the `log` facade.

pub mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod cursor;
pub mod dyn_array;
pub mod error;
pub mod hashing;
pub mod ordering;
pub mod palette;
pub mod tree_map;
mod tree_map_proptest;

// Public surface
pub use chained_hash_map::{
    ChainedHashMap, HashValueCursor, DEFAULT_BUCKET_COUNT, DEFAULT_LOAD_FACTOR,
};
pub use cursor::{count_remaining, for_each_value, retain_values, Cursor};
pub use dyn_array::{ArrayCursor, DynArray, DEFAULT_ARRAY_CAPACITY};
pub use error::{IndexError, RemoveError};
pub use hashing::{string_hash, FnHashing, KeyHashing, StdHashing, StringHashing};
pub use ordering::{FnOrder, KeyOrder, NaturalOrder, ReverseOrder};
pub use palette::{Palette, PaletteColor, Rgb};
pub use tree_map::{OrderedMap, TreeValueCursor};
