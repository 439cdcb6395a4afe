use image::{imageops, RgbaImage};
use rayon::prelude::*;

#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::atlas::{Atlas, AtlasFrame, PixelRect, SpriteIndex, SpriteIndexEntry};
use crate::catalog::Icon;
use crate::error::{Result, SpriteError};

/// Turns an icon's source document into a straight-alpha RGBA bitmap of
/// exactly `width * pixel_ratio` by `height * pixel_ratio` pixels.
pub trait Rasterizer: Sync {
    fn rasterize(&self, icon: &Icon, pixel_ratio: u32) -> std::result::Result<RgbaImage, String>;
}

pub struct AtlasAssembler<'a> {
    rasterizer: &'a dyn Rasterizer,
    parallel: bool,
}

impl<'a> AtlasAssembler<'a> {
    pub fn new(rasterizer: &'a dyn Rasterizer) -> Self {
        Self {
            rasterizer,
            parallel: false,
        }
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Rasterizes every icon that has a rectangle in `frame`, composites it in
    /// place and builds the index for all of its aliases. Nothing is returned
    /// unless every icon rasterized successfully.
    pub fn assemble(&self, frame: &AtlasFrame, icons: &mut [Icon], pixel_ratio: u32) -> Result<Atlas> {
        let jobs: Vec<(usize, PixelRect)> = icons
            .iter()
            .enumerate()
            .filter_map(|(i, icon)| match frame.rects.get(i).copied().flatten() {
                Some(rect) => Some((i, rect)),
                None => {
                    debug!("{:?} has no rectangle in the layout, skipping", icon.aliases);
                    None
                }
            })
            .collect();

        let shared: &[Icon] = icons;
        let render = |&(i, rect): &(usize, PixelRect)| self.render(&shared[i], rect, pixel_ratio);
        let bitmaps: Vec<RgbaImage> = if self.parallel {
            jobs.par_iter().map(render).collect::<Result<_>>()?
        } else {
            jobs.iter().map(render).collect::<Result<_>>()?
        };

        // Regions are disjoint, so compositing is a plain copy
        let mut canvas = RgbaImage::new(frame.width, frame.height);
        let mut index = SpriteIndex::new();
        for (&(i, rect), bitmap) in jobs.iter().zip(&bitmaps) {
            imageops::replace(&mut canvas, bitmap, rect.x as i64, rect.y as i64);

            let icon = &mut icons[i];
            icon.placement = Some(rect);
            debug!(
                "  {:?}: ({},{}) {}x{}",
                icon.aliases, rect.x, rect.y, rect.width, rect.height
            );
            for alias in &icon.aliases {
                index.insert(alias.clone(), SpriteIndexEntry::new(rect, pixel_ratio));
            }
        }

        info!(
            "Assembled {}x{} atlas with {} icons, {} index entries",
            canvas.width(),
            canvas.height(),
            bitmaps.len(),
            index.len()
        );
        Ok(Atlas { image: canvas, index })
    }

    fn render(&self, icon: &Icon, rect: PixelRect, pixel_ratio: u32) -> Result<RgbaImage> {
        let failure = |reason: String| SpriteError::RasterizationFailure {
            name: icon.name().to_string(),
            reason,
        };

        let bitmap = self.rasterizer.rasterize(icon, pixel_ratio).map_err(failure)?;
        if bitmap.dimensions() != (rect.width, rect.height) {
            return Err(failure(format!(
                "bitmap is {}x{}, expected {}x{}",
                bitmap.width(),
                bitmap.height(),
                rect.width,
                rect.height
            )));
        }
        Ok(bitmap)
    }
}
