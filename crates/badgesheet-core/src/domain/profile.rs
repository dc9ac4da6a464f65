use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Avatar sizes the directory publishes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "u32", into = "u32")]
pub enum ImageSize {
    Px24,
    Px32,
    Px48,
    Px72,
    #[default]
    Px192,
    Px512,
    Px1024,
}

impl ImageSize {
    pub const ALL: [ImageSize; 7] = [
        ImageSize::Px24,
        ImageSize::Px32,
        ImageSize::Px48,
        ImageSize::Px72,
        ImageSize::Px192,
        ImageSize::Px512,
        ImageSize::Px1024,
    ];

    /// Maps a requested pixel size onto a published one; unknown sizes use 192.
    pub fn from_pixels(pixels: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|size| size.pixels() == pixels)
            .unwrap_or_default()
    }

    pub fn pixels(self) -> u32 {
        match self {
            ImageSize::Px24 => 24,
            ImageSize::Px32 => 32,
            ImageSize::Px48 => 48,
            ImageSize::Px72 => 72,
            ImageSize::Px192 => 192,
            ImageSize::Px512 => 512,
            ImageSize::Px1024 => 1024,
        }
    }
}

impl From<u32> for ImageSize {
    fn from(pixels: u32) -> Self {
        ImageSize::from_pixels(pixels)
    }
}

impl From<ImageSize> for u32 {
    fn from(size: ImageSize) -> Self {
        size.pixels()
    }
}

/// Profile data exactly as the directory returned it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProfile {
    pub real_name: Option<String>,
    pub display_name: Option<String>,
    pub images: BTreeMap<ImageSize, String>,
    pub fields: HashMap<String, String>,
}

impl RawProfile {
    pub fn field(&self, id: &str) -> Option<&str> {
        self.fields.get(id).map(String::as_str)
    }

    pub fn image_url(&self, size: ImageSize) -> Option<&str> {
        self.images
            .get(&size)
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }
}
