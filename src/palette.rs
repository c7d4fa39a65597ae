//! Color palette built on `ChainedHashMap` with a packed-RGB hash.

use crate::chained_hash_map::{ChainedHashMap, HashValueCursor};
use crate::cursor::Cursor;
use crate::hashing::FnHashing;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// A palette entry and the index `assign_indices` gave it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PaletteColor {
    pub color: Rgb,
    pub index: u32,
}

fn color_hash(c: &Rgb) -> u32 {
    (u32::from(c.red) << 16) | (u32::from(c.green) << 8) | u32::from(c.blue)
}

// Channel-by-channel comparison, red first.
fn color_equal(a: &Rgb, b: &Rgb) -> bool {
    a.cmp(b) == core::cmp::Ordering::Equal
}

pub type PaletteCursor<'a> = HashValueCursor<'a, Rgb, PaletteColor, FnHashing<Rgb>>;

/// Set of distinct colors with stable indices.
#[derive(Clone, Debug)]
pub struct Palette {
    map: ChainedHashMap<Rgb, PaletteColor, FnHashing<Rgb>>,
}

impl Palette {
    pub fn new() -> Self {
        Self {
            map: ChainedHashMap::with_hashing(FnHashing::new(color_hash, color_equal)),
        }
    }

    /// Record a color. Colors already present are left alone, index included.
    pub fn add(&mut self, red: u8, green: u8, blue: u8) {
        let color = Rgb::new(red, green, blue);
        if !self.map.contains_key(&color) {
            self.map.put(color, PaletteColor { color, index: 0 });
        }
    }

    pub fn count(&self) -> usize {
        self.map.len()
    }

    /// Number the colors 0.. in cursor order.
    pub fn assign_indices(&mut self) {
        let mut cursor = self.map.value_cursor();
        let mut next_index = 0u32;
        while let Some(entry) = cursor.next_mut() {
            entry.index = next_index;
            next_index += 1;
        }
    }

    /// Index of a known color; `None` for colors never added.
    pub fn lookup(&self, red: u8, green: u8, blue: u8) -> Option<u32> {
        self.map.get(&Rgb::new(red, green, blue)).map(|c| c.index)
    }

    pub fn colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.map.values().map(|c| c.color)
    }

    pub fn cursor(&mut self) -> PaletteCursor<'_> {
        self.map.value_cursor()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
