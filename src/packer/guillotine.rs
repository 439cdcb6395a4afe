use crate::error::Result;
use crate::packer::{impossible, PackItem, PackResult, Placement, RectPacker};

/// Guillotine packer over a list of disjoint free rectangles.
///
/// Each item goes into the free rectangle with the lowest bottom edge (then
/// leftmost, then oldest). The chosen rectangle is cut into the strip to the
/// right of the item, as tall as the item, and the full-width remainder above
/// it, so the space above the highest item always stays one piece.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuillotinePacker;

#[derive(Debug, Clone, Copy)]
struct FreeRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl FreeRect {
    fn fits(&self, item: &PackItem) -> bool {
        item.width <= self.width && item.height <= self.height
    }

    fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl RectPacker for GuillotinePacker {
    fn pack(&self, bin_width: u32, max_bin_height: u32, items: &[PackItem]) -> Result<PackResult> {
        let mut free = vec![FreeRect {
            x: 0,
            y: 0,
            width: bin_width,
            height: max_bin_height,
        }];
        let mut placements = Vec::with_capacity(items.len());

        for item in items {
            let slot = free
                .iter()
                .enumerate()
                .filter(|(_, rect)| rect.fits(item))
                .min_by_key(|(index, rect)| (rect.y, rect.x, *index))
                .map(|(index, _)| index)
                .ok_or_else(|| impossible(item, bin_width, max_bin_height))?;

            // `remove` keeps the remaining order stable for tie-breaking
            let rect = free.remove(slot);
            placements.push(Placement {
                id: item.id,
                left: rect.x,
                bottom: rect.y,
                width: item.width,
                height: item.height,
            });

            let right = FreeRect {
                x: rect.x + item.width,
                y: rect.y,
                width: rect.width - item.width,
                height: item.height,
            };
            let above = FreeRect {
                x: rect.x,
                y: rect.y + item.height,
                width: rect.width,
                height: rect.height - item.height,
            };
            free.extend([right, above].into_iter().filter(|r| !r.is_empty()));
        }

        Ok(PackResult::new(bin_width, placements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpriteError;
    use crate::packer::test_utils::{assert_valid_pack, sample_items};

    fn item(id: usize, width: u32, height: u32) -> PackItem {
        PackItem { id, width, height }
    }

    #[test]
    fn test_three_icon_scenario() {
        let items = [item(0, 10, 10), item(1, 10, 20), item(2, 20, 10)];
        let result = GuillotinePacker.pack(20, 250, &items).unwrap();

        assert_valid_pack(&result, &items);
        assert_eq!(result.bin_width, 20);
        assert!(result.used_height >= 30);
    }

    #[test]
    fn test_fills_gap_beside_taller_item() {
        // The 10x10 slot right of the first item is reused by the last one
        let items = [item(0, 10, 20), item(1, 20, 10), item(2, 10, 10)];
        let result = GuillotinePacker.pack(20, 100, &items).unwrap();

        assert_valid_pack(&result, &items);
        assert_eq!(result.placements[2].left, 10);
        assert_eq!(result.placements[2].bottom, 0);
        assert_eq!(result.used_height, 30);
    }

    #[test]
    fn test_random_items_are_valid() {
        for seed in 1..20 {
            let items = sample_items(60, seed);
            let max_width = items.iter().map(|i| i.width).max().unwrap();
            let total_height: u32 = items.iter().map(|i| i.height).sum();
            for bin_width in [max_width, max_width * 2, max_width * 5] {
                let result = GuillotinePacker.pack(bin_width, total_height, &items).unwrap();
                assert_valid_pack(&result, &items);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let items = sample_items(80, 42);
        let first = GuillotinePacker.pack(96, 10_000, &items).unwrap();
        let second = GuillotinePacker.pack(96, 10_000, &items).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_too_wide_item_fails() {
        let items = [item(0, 10, 10), item(7, 30, 10)];
        match GuillotinePacker.pack(20, 100, &items) {
            Err(SpriteError::PackingImpossible { id, width, bin_width, .. }) => {
                assert_eq!((id, width, bin_width), (7, 30, 20));
            }
            other => panic!("expected PackingImpossible, got {other:?}"),
        }
    }

    #[test]
    fn test_height_ceiling_exhausted() {
        let items = [item(0, 10, 10), item(1, 10, 10)];
        assert!(GuillotinePacker.pack(10, 15, &items).is_err());
    }

    #[test]
    fn test_empty_input() {
        let result = GuillotinePacker.pack(10, 10, &[]).unwrap();
        assert_eq!(result.used_height, 0);
        assert!(result.placements.is_empty());
    }
}
