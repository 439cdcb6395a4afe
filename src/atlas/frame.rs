use crate::search::Layout;

/// Rectangle in scaled pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Canvas size plus the pixel rectangle reserved for each icon, indexed like
/// the catalog. Icons with no rectangle are left out of the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasFrame {
    pub width: u32,
    pub height: u32,
    pub rects: Vec<Option<PixelRect>>,
}

impl AtlasFrame {
    /// `layout.scaled_size(pixel_ratio)` must fit, the pipeline checks it
    /// against the canvas limit first.
    pub fn from_layout(layout: &Layout, icon_count: usize, pixel_ratio: u32) -> Self {
        let mut rects = vec![None; icon_count];
        for placement in &layout.placements {
            if let Some(slot) = rects.get_mut(placement.id) {
                *slot = Some(layout.to_pixel_rect(placement, pixel_ratio));
            }
        }

        Self {
            width: layout.bin_width * pixel_ratio,
            height: layout.bin_height * pixel_ratio,
            rects,
        }
    }

    pub fn placed(&self) -> usize {
        self.rects.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::Placement;

    #[test]
    fn test_from_layout_scales_and_flips() {
        let layout = Layout {
            bin_width: 20,
            bin_height: 30,
            placements: vec![
                Placement { id: 1, left: 0, bottom: 0, width: 10, height: 20 },
                Placement { id: 0, left: 0, bottom: 20, width: 20, height: 10 },
            ],
        };
        let frame = AtlasFrame::from_layout(&layout, 3, 2);

        assert_eq!((frame.width, frame.height), (40, 60));
        assert_eq!(frame.rects[0], Some(PixelRect { x: 0, y: 0, width: 40, height: 20 }));
        assert_eq!(frame.rects[1], Some(PixelRect { x: 0, y: 20, width: 20, height: 40 }));
        assert_eq!(frame.rects[2], None);
        assert_eq!(frame.placed(), 2);
    }
}
