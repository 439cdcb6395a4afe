//! Packs a directory of small vector icons into one sprite atlas image plus a
//! name-keyed JSON index of where each icon landed.
//!
//! Pipeline: [`catalog`] → [`search`] (driving a [`packer`]) → [`atlas`],
//! or [`validate`] → [`atlas`] when an existing index is reused.

pub mod atlas;
pub mod build_info;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod packer;
pub mod pipeline;
pub mod search;
pub mod settings;
pub mod svg;
pub mod utils;
pub mod validate;

pub use atlas::{Atlas, AtlasAssembler, AtlasFrame, PixelRect, Rasterizer, SpriteIndex, SpriteIndexEntry};
pub use catalog::{CatalogStats, Icon, IconCatalog, IconInput};
pub use config::Config;
pub use error::{Result, SpriteError};
pub use packer::{GuillotinePacker, PackItem, PackResult, PackerKind, Placement, RectPacker, ShelfPacker};
pub use pipeline::{build_atlas, run, Mode, OutputPaths};
pub use search::{Layout, LayoutSearch, SearchParams};
pub use settings::PackSettings;
pub use validate::LayoutReuseValidator;
