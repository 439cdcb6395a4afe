//! End-to-end runs: full pack (search a new layout, write image and index) or
//! reuse (validate the existing index, rewrite the image only).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::atlas::{Atlas, AtlasAssembler, AtlasFrame, Rasterizer, SpriteIndex};
use crate::catalog::{IconCatalog, IconInput};
use crate::config::{Config, MAX_CANVAS_SIDE, MAX_PIXEL_RATIO};
use crate::error::{Result, SpriteError};
use crate::search::{Layout, LayoutSearch};
use crate::svg::{scan_icons, SvgRasterizer};
use crate::utils::timing::timed;
use crate::validate::LayoutReuseValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Search a new layout and write both artifacts
    #[default]
    FullPack,
    /// Keep the layout of the existing index and rewrite only the image
    Reuse,
}

/// `<prefix>.png` and `<prefix>.json`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub image: PathBuf,
    pub index: PathBuf,
}

impl OutputPaths {
    pub fn from_prefix(prefix: &Path) -> Self {
        let with_suffix = |suffix: &str| {
            let mut path: OsString = prefix.as_os_str().to_owned();
            path.push(suffix);
            PathBuf::from(path)
        };
        Self {
            image: with_suffix(".png"),
            index: with_suffix(".json"),
        }
    }
}

/// Builds the atlas in memory from already enumerated icons.
pub fn build_atlas(
    config: &Config,
    inputs: Vec<IconInput>,
    rasterizer: &dyn Rasterizer,
    existing: Option<&SpriteIndex>,
) -> Result<Atlas> {
    if !(1..=MAX_PIXEL_RATIO).contains(&config.pixel_ratio) {
        return Err(SpriteError::InvalidPixelRatio {
            pixel_ratio: config.pixel_ratio,
            max: MAX_PIXEL_RATIO,
        });
    }

    let mut catalog = timed("Catalog", || IconCatalog::build(inputs))?;
    if catalog.is_empty() {
        return Err(SpriteError::EmptyCatalog);
    }

    let frame = match existing {
        Some(index) => LayoutReuseValidator::new(index).reuse_frame(catalog.icons(), config.pixel_ratio)?,
        None => {
            let packer = config.packer.packer();
            let layout = timed("Layout search", || {
                LayoutSearch::new(packer.as_ref(), config.search)
                    .parallel(config.parallel)
                    .search(catalog.icons(), catalog.stats())
            })?;
            check_canvas(&layout, config.pixel_ratio)?;
            AtlasFrame::from_layout(&layout, catalog.icons().len(), config.pixel_ratio)
        }
    };

    timed("Assembly", || {
        AtlasAssembler::new(rasterizer)
            .parallel(config.parallel)
            .assemble(&frame, catalog.icons_mut(), config.pixel_ratio)
    })
}

fn check_canvas(layout: &Layout, pixel_ratio: u32) -> Result<()> {
    match layout.scaled_size(pixel_ratio) {
        Some((width, height)) if width <= MAX_CANVAS_SIDE && height <= MAX_CANVAS_SIDE => Ok(()),
        _ => Err(SpriteError::CanvasTooLarge {
            width: layout.bin_width as u64 * pixel_ratio as u64,
            height: layout.bin_height as u64 * pixel_ratio as u64,
            limit: MAX_CANVAS_SIDE,
        }),
    }
}

/// Scans `icons_dir`, builds the atlas and writes the artifacts next to
/// `output_prefix`. In reuse mode the index at `<prefix>.json` is read and
/// left untouched.
pub fn run(config: &Config, icons_dir: &Path, output_prefix: &Path, mode: Mode) -> Result<OutputPaths> {
    let paths = OutputPaths::from_prefix(output_prefix);
    info!(
        "Packing {} at pixel ratio {} ({:?}, {} packer)",
        icons_dir.display(),
        config.pixel_ratio,
        mode,
        config.packer.as_str()
    );

    let existing = match mode {
        Mode::Reuse => Some(SpriteIndex::load(&paths.index)?),
        Mode::FullPack => None,
    };

    let inputs = scan_icons(icons_dir)?;
    let rasterizer = SvgRasterizer::new().with_resources_dir(icons_dir);
    let atlas = build_atlas(config, inputs, &rasterizer, existing.as_ref())?;

    if mode == Mode::FullPack {
        atlas.index.save(&paths.index)?;
        info!("Wrote {}", paths.index.display());
    }
    timed("PNG encode", || atlas.save_png(&paths.image))?;
    info!("Wrote {} ({}x{})", paths.image.display(), atlas.width(), atlas.height());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::assembler::test_utils::SolidRasterizer;
    use crate::packer::PackerKind;
    use std::fs;

    fn inputs() -> Vec<IconInput> {
        vec![
            IconInput::new("A", "10", "10", b"a".to_vec()),
            IconInput::new("B", "10", "20", b"b".to_vec()),
            IconInput::new("C", "20", "10", b"c".to_vec()),
            IconInput::new("A2", "10", "10", b"a".to_vec()),
        ]
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::from_prefix(Path::new("out/sprite@2x"));
        assert_eq!(paths.image, PathBuf::from("out/sprite@2x.png"));
        assert_eq!(paths.index, PathBuf::from("out/sprite@2x.json"));
    }

    #[test]
    fn test_full_pack_index_keys() {
        let atlas = build_atlas(&Config::default(), inputs(), &SolidRasterizer, None).unwrap();
        let names: Vec<&str> = atlas.index.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["A", "A2", "B", "C"]);
        assert!(atlas.index.iter().all(|(_, entry)| entry.pixel_ratio == 1));
    }

    #[test]
    fn test_reuse_round_trip_with_shelf_packer() {
        let config = Config {
            packer: PackerKind::Shelf,
            pixel_ratio: 2,
            parallel: false,
            ..Config::default()
        };
        let full = build_atlas(&config, inputs(), &SolidRasterizer, None).unwrap();
        let reused = build_atlas(&config, inputs(), &SolidRasterizer, Some(&full.index)).unwrap();

        assert_eq!(reused.index, full.index);
        for (x, y, pixel) in reused.image.enumerate_pixels() {
            assert_eq!(pixel, full.image.get_pixel(x, y));
        }
    }

    #[test]
    fn test_reuse_with_other_ratio_is_fatal() {
        let full = build_atlas(&Config::default(), inputs(), &SolidRasterizer, None).unwrap();
        let config = Config {
            pixel_ratio: 2,
            ..Config::default()
        };
        let result = build_atlas(&config, inputs(), &SolidRasterizer, Some(&full.index));
        assert!(matches!(result, Err(SpriteError::LayoutMismatch { .. })));
    }

    #[test]
    fn test_pixel_ratio_out_of_range() {
        for pixel_ratio in [0, MAX_PIXEL_RATIO + 1, u32::MAX] {
            let config = Config {
                pixel_ratio,
                ..Config::default()
            };
            let result = build_atlas(&config, inputs(), &SolidRasterizer, None);
            assert!(matches!(result, Err(SpriteError::InvalidPixelRatio { .. })));
        }
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        let wide = vec![IconInput::new("wide", "20000", "1", b"w".to_vec())];
        let config = Config {
            pixel_ratio: 2,
            ..Config::default()
        };
        let result = build_atlas(&config, wide, &SolidRasterizer, None);
        assert!(matches!(
            result,
            Err(SpriteError::CanvasTooLarge { width: 40_000, .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let result = build_atlas(&Config::default(), Vec::new(), &SolidRasterizer, None);
        assert!(matches!(result, Err(SpriteError::EmptyCatalog)));
    }

    #[test]
    fn test_run_writes_artifacts() {
        let root = std::env::temp_dir().join(format!("spritepack-run-{}", std::process::id()));
        let icons = root.join("icons");
        fs::create_dir_all(&icons).unwrap();
        let square = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect width="8" height="8" fill="#00f"/></svg>"##;
        let wide = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="8"><rect width="16" height="8" fill="#0f0"/></svg>"##;
        fs::write(icons.join("square.svg"), square).unwrap();
        fs::write(icons.join("square-copy.svg"), square).unwrap();
        fs::write(icons.join("wide.svg"), wide).unwrap();

        let prefix = root.join("sprite");
        let paths = run(&Config::default(), &icons, &prefix, Mode::FullPack).unwrap();
        let index = SpriteIndex::load(&paths.index).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("square"), index.get("square-copy"));
        let first = image::open(&paths.image).unwrap().to_rgba8();

        // Reuse keeps the index byte-for-byte and reproduces the pixels
        let json_before = fs::read_to_string(&paths.index).unwrap();
        run(&Config::default(), &icons, &prefix, Mode::Reuse).unwrap();
        assert_eq!(fs::read_to_string(&paths.index).unwrap(), json_before);
        let second = image::open(&paths.image).unwrap().to_rgba8();
        for (x, y, pixel) in second.enumerate_pixels() {
            assert_eq!(pixel, first.get_pixel(x, y));
        }

        let missing = run(&Config::default(), &root.join("nope"), &prefix, Mode::FullPack);
        assert!(matches!(missing, Err(SpriteError::Io { .. })));

        fs::remove_dir_all(&root).unwrap();
    }
}
