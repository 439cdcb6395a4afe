use crate::error::Result;
use crate::packer::{impossible, PackItem, PackResult, Placement, RectPacker};

/// Next-fit shelf packer: items run left to right along the current shelf and a
/// new shelf opens on top of the tallest item once the row is full.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShelfPacker;

impl RectPacker for ShelfPacker {
    fn pack(&self, bin_width: u32, max_bin_height: u32, items: &[PackItem]) -> Result<PackResult> {
        let mut placements = Vec::with_capacity(items.len());
        let mut cursor_x = 0;
        let mut shelf_bottom = 0;
        let mut shelf_height = 0;

        for item in items {
            if item.width > bin_width {
                return Err(impossible(item, bin_width, max_bin_height));
            }

            if cursor_x + item.width > bin_width {
                shelf_bottom += shelf_height;
                cursor_x = 0;
                shelf_height = 0;
            }

            if shelf_bottom + item.height > max_bin_height {
                return Err(impossible(item, bin_width, max_bin_height));
            }

            placements.push(Placement {
                id: item.id,
                left: cursor_x,
                bottom: shelf_bottom,
                width: item.width,
                height: item.height,
            });
            cursor_x += item.width;
            shelf_height = shelf_height.max(item.height);
        }

        Ok(PackResult::new(bin_width, placements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::test_utils::{assert_valid_pack, sample_items};

    #[test]
    fn test_shelves() {
        let items = [
            PackItem { id: 0, width: 10, height: 10 },
            PackItem { id: 1, width: 10, height: 20 },
            PackItem { id: 2, width: 20, height: 10 },
        ];
        let result = ShelfPacker.pack(20, 100, &items).unwrap();

        assert_valid_pack(&result, &items);
        assert_eq!((result.placements[1].left, result.placements[1].bottom), (10, 0));
        assert_eq!((result.placements[2].left, result.placements[2].bottom), (0, 20));
        assert_eq!(result.used_height, 30);
    }

    #[test]
    fn test_random_items_are_valid() {
        for seed in 1..20 {
            let items = sample_items(50, seed);
            let total_height: u32 = items.iter().map(|i| i.height).sum();
            let result = ShelfPacker.pack(64, total_height, &items).unwrap();
            assert_valid_pack(&result, &items);
            assert_eq!(result, ShelfPacker.pack(64, total_height, &items).unwrap());
        }
    }

    #[test]
    fn test_too_wide_item_fails() {
        let items = [PackItem { id: 3, width: 65, height: 1 }];
        assert!(ShelfPacker.pack(64, 100, &items).is_err());
    }
}
