//! Atlas assembly: the final RGBA canvas, the per-icon pixel rectangles it is
//! cut into, and the name-keyed index published next to it.

pub mod assembler;
pub mod frame;
pub mod index;

use std::path::Path;

use image::{ImageFormat, RgbaImage};

pub use assembler::{AtlasAssembler, Rasterizer};
pub use frame::{AtlasFrame, PixelRect};
pub use index::{SpriteIndex, SpriteIndexEntry};

use crate::error::{Result, SpriteError};

/// Fully populated atlas, ready for the encoder.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub image: RgbaImage,
    pub index: SpriteIndex,
}

impl Atlas {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| SpriteError::Image {
                path: path.to_path_buf(),
                source,
            })
    }
}
