use crate::packer::PackerKind;
use crate::search::SearchParams;
use crate::settings::PackSettings;

// Default values for configuration
// These serve as fallback values when no settings file overrides them
pub const DEFAULT_PIXEL_RATIO: u32 = 1;
pub const DEFAULT_RETINA_PIXEL_RATIO: u32 = 2;
pub const DEFAULT_WIDTH_BOUND_FACTOR: f64 = 2.0;
pub const DEFAULT_HEIGHT_CEILING_FACTOR: u64 = 10;

// Hard limits on the generated atlas
pub const MAX_PIXEL_RATIO: u32 = 16;
pub const MAX_CANVAS_SIDE: u32 = 32_768;

/// Resolved configuration for one run. Built once and passed down explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub search: SearchParams,
    pub packer: PackerKind,
    pub pixel_ratio: u32,
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(&PackSettings::default())
    }
}

impl Config {
    pub fn from_settings(settings: &PackSettings) -> Self {
        Config {
            search: SearchParams {
                width_bound_factor: settings.width_bound_factor,
                width_step: Some(settings.width_step).filter(|step| *step > 0),
                height_ceiling_factor: settings.height_ceiling_factor,
            },
            packer: settings.get_packer_kind(),
            pixel_ratio: DEFAULT_PIXEL_RATIO,
            parallel: settings.parallel,
        }
    }
}
