//! Layout search: packs the catalog at a series of bin widths and keeps the
//! layout with the smallest `width * used_height`.

use rayon::prelude::*;

#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::atlas::PixelRect;
use crate::catalog::{CatalogStats, Icon};
use crate::config::{DEFAULT_HEIGHT_CEILING_FACTOR, DEFAULT_WIDTH_BOUND_FACTOR};
use crate::error::{Result, SpriteError};
use crate::packer::{PackItem, PackResult, Placement, RectPacker};

/// Tunables for the width sweep. Both heuristics are empirical, so they are
/// kept adjustable instead of baked in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Widths stop below `factor * sqrt(total_area)`
    pub width_bound_factor: f64,
    /// Distance between candidate widths; `None` steps by the widest icon
    pub width_step: Option<u32>,
    /// Height ceiling per candidate is at least `factor * total_area / width`
    pub height_ceiling_factor: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            width_bound_factor: DEFAULT_WIDTH_BOUND_FACTOR,
            width_step: None,
            height_ceiling_factor: DEFAULT_HEIGHT_CEILING_FACTOR,
        }
    }
}

/// Winning packing in unscaled layout units, bottom-left origin.
/// Placement ids are indices into the catalog's icon list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub bin_width: u32,
    pub bin_height: u32,
    pub placements: Vec<Placement>,
}

impl Layout {
    /// The one place where packer space (bottom-left origin, unscaled) turns
    /// into image space (top-left origin, scaled).
    pub fn to_pixel_rect(&self, placement: &Placement, pixel_ratio: u32) -> PixelRect {
        PixelRect {
            x: placement.left * pixel_ratio,
            y: (self.bin_height - placement.top()) * pixel_ratio,
            width: placement.width * pixel_ratio,
            height: placement.height * pixel_ratio,
        }
    }

    pub fn area(&self) -> u64 {
        self.bin_width as u64 * self.bin_height as u64
    }

    /// Canvas size at `pixel_ratio`, `None` when a side overflows `u32`.
    /// Every placement lies inside the bin, so when this is `Some` the
    /// scaled rects fit as well.
    pub fn scaled_size(&self, pixel_ratio: u32) -> Option<(u32, u32)> {
        Some((
            self.bin_width.checked_mul(pixel_ratio)?,
            self.bin_height.checked_mul(pixel_ratio)?,
        ))
    }
}

impl From<PackResult> for Layout {
    fn from(result: PackResult) -> Self {
        Self {
            bin_width: result.bin_width,
            bin_height: result.used_height,
            placements: result.placements,
        }
    }
}

/// Ascending candidate widths starting at the widest icon.
pub fn candidate_widths(max_width: u32, total_area: u64, params: &SearchParams) -> Vec<u32> {
    if max_width == 0 {
        return Vec::new();
    }

    let step = params.width_step.filter(|s| *s > 0).unwrap_or(max_width) as usize;
    let bound = (params.width_bound_factor * (total_area as f64).sqrt()).floor() as u64;
    let upper = max_width as u64 * (bound / max_width as u64);

    if upper <= max_width as u64 {
        return vec![max_width];
    }

    (max_width as u64..upper)
        .step_by(step)
        .filter_map(|w| u32::try_from(w).ok())
        .collect()
}

pub struct LayoutSearch<'a> {
    packer: &'a dyn RectPacker,
    params: SearchParams,
    parallel: bool,
}

impl<'a> LayoutSearch<'a> {
    pub fn new(packer: &'a dyn RectPacker, params: SearchParams) -> Self {
        Self {
            packer,
            params,
            parallel: false,
        }
    }

    /// Pack candidates on the rayon pool. The selection fold still runs in
    /// candidate order, so the result matches a sequential search.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn search(&self, icons: &[Icon], stats: &CatalogStats) -> Result<Layout> {
        if icons.is_empty() {
            return Err(SpriteError::EmptyCatalog);
        }

        let items: Vec<PackItem> = icons
            .iter()
            .enumerate()
            .map(|(id, icon)| PackItem {
                id,
                width: icon.width,
                height: icon.height,
            })
            .collect();
        let total_height: u64 = items.iter().map(|i| i.height as u64).sum();

        let candidates = candidate_widths(stats.max_width, stats.total_area, &self.params);
        debug!("Trying {} candidate widths: {:?}", candidates.len(), candidates);

        let pack_at = |width: u32| -> Result<PackResult> {
            let ceiling = self.height_ceiling(width, stats.total_area, total_height);
            self.packer.pack(width, ceiling, &items)
        };

        let results: Vec<Result<PackResult>> = if self.parallel {
            candidates.par_iter().map(|&width| pack_at(width)).collect()
        } else {
            candidates.iter().map(|&width| pack_at(width)).collect()
        };

        let best = results
            .into_iter()
            .try_fold(None::<PackResult>, |best, result| {
                let result = result?;
                debug!("{}x{}: {}", result.bin_width, result.used_height, result.area());
                Ok::<_, SpriteError>(match best {
                    // Ties keep the earlier, narrower layout
                    Some(best) if best.area() <= result.area() => Some(best),
                    _ => Some(result),
                })
            })?
            .ok_or(SpriteError::EmptyCatalog)?;

        info!("Best fit in {}x{}", best.bin_width, best.used_height);
        Ok(best.into())
    }

    fn height_ceiling(&self, width: u32, total_area: u64, total_height: u64) -> u32 {
        let by_area = (self.params.height_ceiling_factor * total_area).div_ceil(width as u64);
        by_area.max(total_height).min(u32::MAX as u64) as u32
    }
}
