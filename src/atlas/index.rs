use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atlas::PixelRect;
use crate::error::{Result, SpriteError};

/// Per-name record of the published index. Fields are declared in the order
/// they are written so the JSON comes out with sorted keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpriteIndexEntry {
    pub height: u32,
    #[serde(rename = "pixelRatio")]
    pub pixel_ratio: u32,
    pub width: u32,
    pub x: u32,
    pub y: u32,
}

impl SpriteIndexEntry {
    pub fn new(rect: PixelRect, pixel_ratio: u32) -> Self {
        Self {
            height: rect.height,
            pixel_ratio,
            width: rect.width,
            x: rect.x,
            y: rect.y,
        }
    }

    pub fn rect(&self) -> PixelRect {
        PixelRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Name-keyed sprite index, one entry per alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct SpriteIndex {
    entries: BTreeMap<String, SpriteIndexEntry>,
}

impl SpriteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: SpriteIndexEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&SpriteIndexEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpriteIndexEntry)> {
        self.entries.iter()
    }

    /// Tight `(width, height)` around every entry, in pixels. `None` when an
    /// entry's far edge does not fit in a `u32`.
    pub fn bounding_box(&self) -> Option<(u32, u32)> {
        self.entries.values().try_fold((0, 0), |(w, h), entry| {
            let right = entry.x.checked_add(entry.width)?;
            let bottom = entry.y.checked_add(entry.height)?;
            Some((w.max(right), h.max(bottom)))
        })
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// Two-space indented JSON with sorted keys
    pub fn to_json(&self) -> String {
        // A map of plain integers cannot fail to serialize
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SpriteError::io(path, e))?;
        Self::from_json(&content).map_err(|source| SpriteError::IndexFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()).map_err(|e| SpriteError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(x: u32, y: u32, width: u32, height: u32) -> SpriteIndexEntry {
        SpriteIndexEntry::new(PixelRect { x, y, width, height }, 1)
    }

    #[test]
    fn test_json_layout() {
        let mut index = SpriteIndex::new();
        index.insert("b", entry(10, 0, 10, 20));
        index.insert("a", entry(0, 0, 10, 10));

        let expected = r#"{
  "a": {
    "height": 10,
    "pixelRatio": 1,
    "width": 10,
    "x": 0,
    "y": 0
  },
  "b": {
    "height": 20,
    "pixelRatio": 1,
    "width": 10,
    "x": 10,
    "y": 0
  }
}"#;
        assert_eq!(index.to_json(), expected);
        assert_eq!(SpriteIndex::from_json(expected).unwrap(), index);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(SpriteIndex::from_json(r#"{"a": {"width": -1}}"#).is_err());
        assert!(SpriteIndex::from_json("[]").is_err());
    }

    #[test]
    fn test_bounding_box() {
        let mut index = SpriteIndex::new();
        assert_eq!(index.bounding_box(), Some((0, 0)));
        index.insert("a", entry(0, 20, 10, 10));
        index.insert("b", entry(10, 0, 30, 5));
        assert_eq!(index.bounding_box(), Some((40, 30)));

        index.insert("edited", entry(u32::MAX - 5, 0, 10, 10));
        assert_eq!(index.bounding_box(), None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("spritepack-index-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sprite.json");

        let mut index = SpriteIndex::new();
        index.insert("icon", entry(4, 8, 16, 16));
        index.save(&path).unwrap();
        assert_eq!(SpriteIndex::load(&path).unwrap(), index);

        let missing = SpriteIndex::load(&dir.join("missing.json"));
        assert!(matches!(missing, Err(SpriteError::Io { .. })));

        fs::remove_dir_all(&dir).unwrap();
    }
}
