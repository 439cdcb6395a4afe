use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info, warn, error};

use crate::config::{
    DEFAULT_HEIGHT_CEILING_FACTOR, DEFAULT_RETINA_PIXEL_RATIO, DEFAULT_WIDTH_BOUND_FACTOR,
};
use crate::error::{Result, SpriteError};
use crate::packer::PackerKind;

/// User-tunable packing settings, read from a YAML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackSettings {
    /// Packing heuristic: "guillotine" or "shelf"
    #[serde(default = "default_packer")]
    pub packer: String,

    /// Candidate widths stop below `width_bound_factor * sqrt(total icon area)`
    #[serde(default = "default_width_bound_factor")]
    pub width_bound_factor: f64,

    /// Step between candidate widths, 0 = widest icon
    #[serde(default)]
    pub width_step: u32,

    /// Height ceiling handed to the packer is at least this times area / width
    #[serde(default = "default_height_ceiling_factor")]
    pub height_ceiling_factor: u64,

    /// Pixel ratio used by `--retina`
    #[serde(default = "default_retina_pixel_ratio")]
    pub retina_pixel_ratio: u32,

    /// Pack candidates and rasterize icons on all cores
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_packer() -> String {
    "guillotine".to_string()
}

fn default_width_bound_factor() -> f64 {
    DEFAULT_WIDTH_BOUND_FACTOR
}

fn default_height_ceiling_factor() -> u64 {
    DEFAULT_HEIGHT_CEILING_FACTOR
}

fn default_retina_pixel_ratio() -> u32 {
    DEFAULT_RETINA_PIXEL_RATIO
}

fn default_parallel() -> bool {
    true
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            packer: default_packer(),
            width_bound_factor: DEFAULT_WIDTH_BOUND_FACTOR,
            width_step: 0,
            height_ceiling_factor: DEFAULT_HEIGHT_CEILING_FACTOR,
            retina_pixel_ratio: DEFAULT_RETINA_PIXEL_RATIO,
            parallel: true,
        }
    }
}

impl PackSettings {
    /// Get the path to the settings file
    /// On Linux: ~/.config/spritepack/settings.yaml
    /// On macOS: ~/Library/Application Support/spritepack/settings.yaml
    pub fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."));

        config_dir.join("spritepack").join("settings.yaml")
    }

    /// Load settings from the YAML file
    /// If custom_path is provided, uses that path; otherwise uses the default settings path.
    /// A missing or broken file falls back to defaults.
    pub fn load(custom_path: Option<&Path>) -> Self {
        let path = match custom_path {
            Some(p) => {
                info!("Using custom settings path: {}", p.display());
                p.to_path_buf()
            }
            None => Self::settings_path(),
        };

        if !path.exists() {
            debug!("Settings file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_yaml(&contents, &path),
            Err(e) => {
                error!("Failed to read settings file at {:?}: {}", path, e);
                warn!("Using default settings");
                Self::default()
            }
        }
    }

    fn from_yaml(contents: &str, path: &Path) -> Self {
        match serde_yaml::from_str::<PackSettings>(contents) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", path);
                debug!("Settings: {:?}", settings);
                settings
            }
            Err(e) => {
                error!("Failed to parse settings file at {:?}: {}", path, e);
                warn!("Using default settings");
                Self::default()
            }
        }
    }

    /// Write the commented settings file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SpriteError::io(parent, e))?;
            }
        }

        fs::write(path, self.to_yaml_with_comments()).map_err(|e| SpriteError::io(path, e))?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Generate YAML content with comments for new files
    pub fn to_yaml_with_comments(&self) -> String {
        format!(
            r#"# spritepack settings
# Values here override the built-in defaults.

# Packing heuristic: "guillotine" or "shelf"
# - "guillotine": fills the gaps next to shorter icons (denser)
# - "shelf": simple rows, tallest icon sets the row height
packer: "{}"

# Candidate bin widths stop below width_bound_factor * sqrt(total icon area)
width_bound_factor: {:?}

# Step between candidate widths (0 = the widest icon's width)
width_step: {}

# The packer may grow up to height_ceiling_factor * area / width (or the sum of all heights)
height_ceiling_factor: {}

# Pixel ratio used by --retina
retina_pixel_ratio: {}

# Pack candidate widths and rasterize icons in parallel
parallel: {}
"#,
            self.packer,
            self.width_bound_factor,
            self.width_step,
            self.height_ceiling_factor,
            self.retina_pixel_ratio,
            self.parallel
        )
    }

    /// Convert the packer string to PackerKind
    pub fn get_packer_kind(&self) -> PackerKind {
        match self.packer.parse() {
            Ok(kind) => kind,
            Err(e) => {
                warn!("{}, defaulting to guillotine", e);
                PackerKind::Guillotine
            }
        }
    }
}
