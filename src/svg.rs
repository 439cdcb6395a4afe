//! SVG plumbing around the packing core: discovering icon files, reading their
//! declared size and rendering them with resvg.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use once_cell::sync::Lazy;
use regex::Regex;
use resvg::{tiny_skia, usvg};

#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::atlas::Rasterizer;
use crate::catalog::{Icon, IconInput};
use crate::error::{Result, SpriteError};

static SVG_ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<svg\b[^>]*>").unwrap());
static WIDTH_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\swidth\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static HEIGHT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\sheight\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Raw `width` and `height` attributes of the root `<svg>` element.
pub fn declared_size(name: &str, source: &[u8]) -> Result<(String, String)> {
    let text = String::from_utf8_lossy(source);
    let root = SVG_ROOT.find(&text).map(|m| m.as_str()).unwrap_or("");

    let attribute = |pattern: &Regex| -> Result<String> {
        pattern
            .captures(root)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| SpriteError::MalformedDimension {
                name: name.to_string(),
                value: String::new(),
            })
    };

    Ok((attribute(&WIDTH_ATTR)?, attribute(&HEIGHT_ATTR)?))
}

/// Lists `*.svg` files directly inside `dir` in natural filename order. The icon
/// name is the file stem.
pub fn scan_icons(dir: &Path) -> Result<Vec<IconInput>> {
    let entries = fs::read_dir(dir).map_err(|e| SpriteError::io(dir, e))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SpriteError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "svg") {
            paths.push(path);
        }
    }
    alphanumeric_sort::sort_path_slice(&mut paths);
    debug!("Found {} svg files in {}", paths.len(), dir.display());

    paths
        .into_iter()
        .map(|path| {
            let source = fs::read(&path).map_err(|e| SpriteError::io(&path, e))?;
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let (width, height) = declared_size(&name, &source)?;
            Ok(IconInput {
                name,
                width,
                height,
                source,
            })
        })
        .collect()
}

/// Renders icon sources with resvg at `pixel_ratio` times their declared size.
/// Anything drawn outside the declared box is clipped.
#[derive(Debug, Clone, Default)]
pub struct SvgRasterizer {
    resources_dir: Option<PathBuf>,
}

impl SvgRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory used to resolve relative `href`s inside the documents
    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = Some(dir.into());
        self
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&self, icon: &Icon, pixel_ratio: u32) -> std::result::Result<RgbaImage, String> {
        let options = usvg::Options {
            resources_dir: self.resources_dir.clone(),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_data(&icon.source, &options).map_err(|e| e.to_string())?;

        let (width, height) = icon
            .width
            .checked_mul(pixel_ratio)
            .zip(icon.height.checked_mul(pixel_ratio))
            .ok_or_else(|| format!("{}x{} at ratio {pixel_ratio} overflows", icon.width, icon.height))?;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| format!("cannot allocate a {width}x{height} pixmap"))?;

        let scale = pixel_ratio as f32;
        resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha, the atlas is straight alpha
        let data: Vec<u8> = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let c = pixel.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        RgbaImage::from_raw(width, height, data).ok_or_else(|| "pixel buffer size mismatch".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IconCatalog;

    const RED_BOX: &str = r##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" stroke-width="3" width="4" height='2.5'>
  <rect width="4" height="2" fill="#ff0000"/>
</svg>"##;

    #[test]
    fn test_declared_size() {
        let (width, height) = declared_size("red", RED_BOX.as_bytes()).unwrap();
        assert_eq!((width.as_str(), height.as_str()), ("4", "2.5"));

        let missing = declared_size("bare", br#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
        assert!(matches!(missing, Err(SpriteError::MalformedDimension { .. })));
    }

    #[test]
    fn test_rasterize_red_box() {
        let catalog = IconCatalog::build(vec![IconInput::new("red", "4", "2.5", RED_BOX)]).unwrap();
        let icon = &catalog.icons()[0];
        assert_eq!((icon.width, icon.height), (4, 2));

        let bitmap = SvgRasterizer::new().rasterize(icon, 2).unwrap();
        assert_eq!(bitmap.dimensions(), (8, 4));
        assert_eq!(bitmap.get_pixel(4, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_rasterize_size_overflow() {
        let catalog = IconCatalog::build(vec![IconInput::new("red", "4", "2", RED_BOX)]).unwrap();
        let error = SvgRasterizer::new().rasterize(&catalog.icons()[0], u32::MAX).unwrap_err();
        assert!(error.contains("overflows"));
    }

    #[test]
    fn test_rasterize_rejects_garbage() {
        let catalog =
            IconCatalog::build(vec![IconInput::new("junk", "4", "4", b"not an svg".to_vec())]).unwrap();
        assert!(SvgRasterizer::new().rasterize(&catalog.icons()[0], 1).is_err());
    }

    #[test]
    fn test_scan_icons() {
        let dir = std::env::temp_dir().join(format!("spritepack-scan-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("icon10.svg"), RED_BOX).unwrap();
        fs::write(dir.join("icon2.svg"), RED_BOX).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let inputs = scan_icons(&dir).unwrap();
        let names: Vec<&str> = inputs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["icon2", "icon10"]);
        assert_eq!(inputs[0].width, "4");

        assert!(matches!(scan_icons(&dir.join("nope")), Err(SpriteError::Io { .. })));
        fs::remove_dir_all(&dir).unwrap();
    }
}
