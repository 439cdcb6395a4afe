//! Rectangle packing into a fixed-width bin.
//!
//! Coordinates are in unscaled layout units with the origin at the bottom-left
//! corner of the bin; `top` is the upper edge of a placement. Items are packed
//! in the order given and never rotated.

pub mod guillotine;
pub mod shelf;

use std::str::FromStr;

pub use guillotine::GuillotinePacker;
pub use shelf::ShelfPacker;

use crate::error::{Result, SpriteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackItem {
    pub id: usize,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: usize,
    pub left: u32,
    pub bottom: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Upper edge, measured from the bottom of the bin
    pub fn top(&self) -> u32 {
        self.bottom + self.height
    }

    pub fn intersects(&self, other: &Placement) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.bottom < other.top()
            && other.bottom < self.top()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackResult {
    pub bin_width: u32,
    /// Highest `top` reached by any placement
    pub used_height: u32,
    pub placements: Vec<Placement>,
}

impl PackResult {
    pub(crate) fn new(bin_width: u32, placements: Vec<Placement>) -> Self {
        let used_height = placements.iter().map(Placement::top).max().unwrap_or(0);
        Self {
            bin_width,
            used_height,
            placements,
        }
    }

    pub fn area(&self) -> u64 {
        self.bin_width as u64 * self.used_height as u64
    }
}

pub trait RectPacker: Sync {
    fn pack(&self, bin_width: u32, max_bin_height: u32, items: &[PackItem]) -> Result<PackResult>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackerKind {
    #[default]
    Guillotine,
    Shelf,
}

impl PackerKind {
    pub fn packer(self) -> Box<dyn RectPacker> {
        match self {
            PackerKind::Guillotine => Box::new(GuillotinePacker),
            PackerKind::Shelf => Box::new(ShelfPacker),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PackerKind::Guillotine => "guillotine",
            PackerKind::Shelf => "shelf",
        }
    }
}

impl FromStr for PackerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "guillotine" => Ok(PackerKind::Guillotine),
            "shelf" => Ok(PackerKind::Shelf),
            other => Err(format!("unknown packer '{other}' (expected guillotine or shelf)")),
        }
    }
}

pub(crate) fn impossible(item: &PackItem, bin_width: u32, bin_height: u32) -> SpriteError {
    SpriteError::PackingImpossible {
        id: item.id,
        width: item.width,
        height: item.height,
        bin_width,
        bin_height,
    }
}
