use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SpriteError>;

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("icon '{name}': malformed dimension '{value}'")]
    MalformedDimension { name: String, value: String },

    #[error("no icons to pack")]
    EmptyCatalog,

    #[error("item {id} ({width}x{height}) does not fit in a {bin_width}x{bin_height} bin")]
    PackingImpossible {
        id: usize,
        width: u32,
        height: u32,
        bin_width: u32,
        bin_height: u32,
    },

    #[error("pixel ratio {pixel_ratio} is outside 1..={max}")]
    InvalidPixelRatio { pixel_ratio: u32, max: u32 },

    #[error("{width}x{height} canvas exceeds the {limit}px side limit")]
    CanvasTooLarge { width: u64, height: u64, limit: u32 },

    #[error("existing layout does not match icon '{name}': {reason}")]
    LayoutMismatch { name: String, reason: String },

    #[error("failed to rasterize icon '{name}': {reason}")]
    RasterizationFailure { name: String, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid sprite index: {source}", path.display())]
    IndexFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl SpriteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SpriteError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn mismatch(name: &str, reason: impl Into<String>) -> Self {
        SpriteError::LayoutMismatch {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
