//! Checks that a previously published sprite index still describes the current
//! icons, so the layout can be reused without searching again.

use std::collections::HashMap;

#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::atlas::{AtlasFrame, SpriteIndex};
use crate::catalog::Icon;
use crate::config::MAX_CANVAS_SIDE;
use crate::error::{Result, SpriteError};

pub struct LayoutReuseValidator<'a> {
    index: &'a SpriteIndex,
}

impl<'a> LayoutReuseValidator<'a> {
    pub fn new(index: &'a SpriteIndex) -> Self {
        Self { index }
    }

    /// Every indexed name must still exist with the same scaled size and pixel
    /// ratio. Icons missing from the index are tolerated.
    pub fn check(&self, icons: &[Icon], pixel_ratio: u32) -> Result<()> {
        let by_name: HashMap<&str, &Icon> = icons
            .iter()
            .flat_map(|icon| icon.aliases.iter().map(move |alias| (alias.as_str(), icon)))
            .collect();

        for (name, entry) in self.index.iter() {
            let icon = by_name
                .get(name.as_str())
                .ok_or_else(|| SpriteError::mismatch(name, "no such icon"))?;

            if entry.pixel_ratio != pixel_ratio {
                return Err(SpriteError::mismatch(
                    name,
                    format!("pixel ratio {} but {} requested", entry.pixel_ratio, pixel_ratio),
                ));
            }

            let expected = icon
                .width
                .checked_mul(pixel_ratio)
                .zip(icon.height.checked_mul(pixel_ratio))
                .ok_or_else(|| SpriteError::mismatch(name, "scaled size overflows"))?;
            if (entry.width, entry.height) != expected {
                return Err(SpriteError::mismatch(
                    name,
                    format!(
                        "stored size {}x{}, icon is {}x{}",
                        entry.width, entry.height, expected.0, expected.1
                    ),
                ));
            }
        }

        // Aliases of one icon share a single rectangle in the atlas
        for icon in icons {
            let mut stored = icon
                .aliases
                .iter()
                .filter_map(|alias| self.index.get(alias).map(|entry| (alias, entry)));
            if let Some((first_name, first)) = stored.next() {
                if let Some((name, _)) = stored.find(|(_, entry)| *entry != first) {
                    return Err(SpriteError::mismatch(
                        name,
                        format!("same source as '{first_name}' but stored at a different position"),
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn validate(&self, icons: &[Icon], pixel_ratio: u32) -> bool {
        self.check(icons, pixel_ratio).is_ok()
    }

    /// Validates, then turns the stored entries into a frame. The canvas is the
    /// tight bounding box of all entries and is already in pixels.
    pub fn reuse_frame(&self, icons: &[Icon], pixel_ratio: u32) -> Result<AtlasFrame> {
        self.check(icons, pixel_ratio)?;

        let rects = icons
            .iter()
            .map(|icon| {
                let rect = icon
                    .aliases
                    .iter()
                    .find_map(|alias| self.index.get(alias))
                    .map(|entry| entry.rect());
                if rect.is_none() {
                    debug!("{:?} not in the existing index", icon.aliases);
                }
                rect
            })
            .collect();
        let (width, height) = self
            .index
            .bounding_box()
            .filter(|&(w, h)| w <= MAX_CANVAS_SIDE && h <= MAX_CANVAS_SIDE)
            .ok_or_else(|| {
                SpriteError::mismatch(
                    "<index>",
                    format!("entries extend past the {MAX_CANVAS_SIDE}px canvas limit"),
                )
            })?;

        info!(
            "Reusing {}x{} layout with {} entries",
            width,
            height,
            self.index.len()
        );
        Ok(AtlasFrame {
            width,
            height,
            rects,
        })
    }
}
