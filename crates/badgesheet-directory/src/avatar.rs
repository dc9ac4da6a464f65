use crate::service::AvatarSource;
use crate::{DirectoryError, Result};
use async_trait::async_trait;
use badgesheet_core::ImageSize;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use reqwest::Client;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::warn;
use url::Url;
use uuid::Uuid;

/// Corner radius of a processed avatar, as a fraction of its side.
const CORNER_RATIO: f32 = 50.0 / 192.0;

/// Downloads avatars, squares and rounds them, and stores them as PNG files.
#[derive(Debug, Clone)]
pub struct AvatarDownloader {
    client: Client,
    images_dir: PathBuf,
}

impl AvatarDownloader {
    pub fn new(client: Client, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            images_dir: images_dir.into(),
        }
    }

    async fn download(&self, url: &str, size: ImageSize) -> Result<PathBuf> {
        let (stem, extension) = file_stem_from_url(url);
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let side = size.pixels();
        let source = bytes.clone();
        let processed = tokio::task::spawn_blocking(move || process_avatar(&source, side))
            .await
            .map_err(|err| DirectoryError::Task(err.to_string()))?;

        let (path, data) = match processed {
            Ok(png) => (self.images_dir.join(format!("{stem}.png")), png),
            Err(err) => {
                warn!(url = %url, error = %err, "avatar kept unprocessed");
                let name = if extension.is_empty() {
                    stem
                } else {
                    format!("{stem}.{extension}")
                };
                (self.images_dir.join(name), bytes.to_vec())
            }
        };

        tokio::fs::create_dir_all(&self.images_dir).await?;
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }
}

#[async_trait]
impl AvatarSource for AvatarDownloader {
    async fn acquire(&self, url: &str, size: ImageSize) -> Option<PathBuf> {
        match self.download(url, size).await {
            Ok(path) => Some(path),
            Err(err) => {
                warn!(url = %url, error = %err, "avatar unavailable");
                None
            }
        }
    }
}

/// File stem and extension of the last path segment of `url`.
///
/// The segment is percent-decoded and query strings are ignored. The stem is
/// restricted to filename-safe characters, whitespace becoming `_`. A URL with
/// no usable segment gets a random stem.
pub fn file_stem_from_url(url: &str) -> (String, String) {
    let segment = Url::parse(url.trim())
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(decode_segment))
        })
        .unwrap_or_default();

    let (stem, extension) = match segment.rsplit_once('.') {
        Some((stem, extension)) => (stem, extension),
        None => (segment.as_str(), ""),
    };
    let stem = sanitize(stem);
    let extension = sanitize(extension).to_ascii_lowercase();

    if stem.is_empty() {
        return (Uuid::new_v4().to_string(), extension);
    }
    (stem, extension)
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter_map(|ch| match ch {
            ch if ch.is_alphanumeric() || matches!(ch, '-' | '_') => Some(ch),
            ch if ch.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect()
}

/// Decodes `data`, crops it to a `side` x `side` square, rounds the corners
/// and re-encodes as PNG.
pub fn process_avatar(data: &[u8], side: u32) -> std::result::Result<Vec<u8>, image::ImageError> {
    let decoded = image::load_from_memory(data)?;
    let mut rgba = decoded
        .resize_to_fill(side, side, FilterType::Lanczos3)
        .to_rgba8();
    let radius = (side as f32 * CORNER_RATIO).round() as u32;
    round_corners(&mut rgba, radius);

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(rgba).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Makes every pixel outside a rounded rectangle of corner `radius` transparent.
pub fn round_corners(image: &mut RgbaImage, radius: u32) {
    let (width, height) = image.dimensions();
    let radius = radius.min(width / 2).min(height / 2);
    if radius == 0 {
        return;
    }
    let r = radius as f32;
    let right = width as f32 - r;
    let bottom = height as f32 - r;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let cx = if px < r {
            r
        } else if px > right {
            right
        } else {
            continue;
        };
        let cy = if py < r {
            r
        } else if py > bottom {
            bottom
        } else {
            continue;
        };
        let (dx, dy) = (px - cx, py - cy);
        if dx * dx + dy * dy > r * r {
            pixel.0[3] = 0;
        }
    }
}
