//! Icon catalog: parses declared sizes, merges byte-identical sources and
//! gathers the aggregate numbers the layout search starts from.

use std::collections::HashMap;

#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::atlas::PixelRect;
use crate::error::{Result, SpriteError};

/// One raw input as enumerated by the icon source.
#[derive(Debug, Clone)]
pub struct IconInput {
    pub name: String,
    pub width: String,
    pub height: String,
    pub source: Vec<u8>,
}

impl IconInput {
    pub fn new(
        name: impl Into<String>,
        width: impl Into<String>,
        height: impl Into<String>,
        source: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            width: width.into(),
            height: height.into(),
            source: source.into(),
        }
    }
}

/// A de-duplicated icon. Every alias shares the same source and placement.
#[derive(Debug, Clone)]
pub struct Icon {
    pub aliases: Vec<String>,
    pub width: u32,
    pub height: u32,
    pub source: Vec<u8>,
    /// Scaled pixel rectangle, set once the atlas has been assembled
    pub placement: Option<PixelRect>,
}

impl Icon {
    /// First discovered name, used in logs and error messages
    pub fn name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or("")
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// All names seen, duplicates included
    pub count: usize,
    pub distinct_count: usize,
    pub total_area: u64,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl CatalogStats {
    fn from_icons(icons: &[Icon], count: usize) -> Self {
        Self {
            count,
            distinct_count: icons.len(),
            total_area: icons.iter().map(Icon::area).sum(),
            min_width: icons.iter().map(|i| i.width).min().unwrap_or(0),
            max_width: icons.iter().map(|i| i.width).max().unwrap_or(0),
            min_height: icons.iter().map(|i| i.height).min().unwrap_or(0),
            max_height: icons.iter().map(|i| i.height).max().unwrap_or(0),
        }
    }

    pub fn duplicates(&self) -> usize {
        self.count - self.distinct_count
    }
}

#[derive(Debug, Clone, Default)]
pub struct IconCatalog {
    icons: Vec<Icon>,
    stats: CatalogStats,
}

impl IconCatalog {
    /// Builds the catalog in discovery order. The first occurrence of a source
    /// becomes the canonical icon, later byte-identical sources only add an alias.
    pub fn build<I>(inputs: I) -> Result<Self>
    where
        I: IntoIterator<Item = IconInput>,
    {
        let mut icons: Vec<Icon> = Vec::new();
        let mut by_source: HashMap<Vec<u8>, usize> = HashMap::new();
        let mut count = 0;

        for input in inputs {
            let width = parse_dimension(&input.name, &input.width)?;
            let height = parse_dimension(&input.name, &input.height)?;
            count += 1;

            if let Some(&index) = by_source.get(&input.source) {
                debug!("{} duplicates {}", input.name, icons[index].name());
                icons[index].aliases.push(input.name);
                continue;
            }

            by_source.insert(input.source.clone(), icons.len());
            icons.push(Icon {
                aliases: vec![input.name],
                width,
                height,
                source: input.source,
                placement: None,
            });
        }

        let stats = CatalogStats::from_icons(&icons, count);
        info!(
            "Total {} icons ({} duplicated), sum of area is {}, unit width: {}-{}, unit height: {}-{}",
            stats.count,
            stats.duplicates(),
            stats.total_area,
            stats.min_width,
            stats.max_width,
            stats.min_height,
            stats.max_height
        );

        Ok(Self { icons, stats })
    }

    pub fn icons(&self) -> &[Icon] {
        &self.icons
    }

    pub fn icons_mut(&mut self) -> &mut [Icon] {
        &mut self.icons
    }

    pub fn stats(&self) -> &CatalogStats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// Integer first, then float truncated toward zero. Sizes must end up positive.
pub fn parse_dimension(name: &str, value: &str) -> Result<u32> {
    let trimmed = value.trim();
    let parsed = match trimmed.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v.trunc() as i64),
    };

    match parsed {
        Some(v) if v > 0 && v <= u32::MAX as i64 => Ok(v as u32),
        _ => Err(SpriteError::MalformedDimension {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
