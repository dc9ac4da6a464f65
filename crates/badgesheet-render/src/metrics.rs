use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{RenderError, Result};

/// The four typefaces a label draws with. `Alt` and `Italic` fall back to
/// the regular face when no dedicated file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFace {
    Regular,
    Bold,
    Alt,
    Italic,
}

impl FontFace {
    pub const ALL: [FontFace; 4] = [
        FontFace::Regular,
        FontFace::Bold,
        FontFace::Alt,
        FontFace::Italic,
    ];

    fn index(self) -> usize {
        match self {
            FontFace::Regular => 0,
            FontFace::Bold => 1,
            FontFace::Alt => 2,
            FontFace::Italic => 3,
        }
    }
}

/// Measures rendered text in points. Layout depends only on this, so tests
/// can substitute a deterministic measurer for real font files.
pub trait TextMeasure {
    fn width(&self, face: FontFace, size: f64, text: &str) -> f64;
    fn line_height(&self, face: FontFace, size: f64) -> f64;
    fn ascent(&self, face: FontFace, size: f64) -> f64;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontSet {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub alt: Option<PathBuf>,
    pub italic: Option<PathBuf>,
}

impl FontSet {
    pub fn path(&self, face: FontFace) -> Option<&Path> {
        let own = match face {
            FontFace::Regular => self.regular.as_deref(),
            FontFace::Bold => self.bold.as_deref(),
            FontFace::Alt => self.alt.as_deref(),
            FontFace::Italic => self.italic.as_deref(),
        };
        own.or(self.regular.as_deref())
    }

    /// Regular and bold are required; the rest fall back to regular.
    pub fn require(&self) -> Result<()> {
        if self.regular.is_none() {
            return Err(RenderError::MissingFont("regular"));
        }
        if self.bold.is_none() {
            return Err(RenderError::MissingFont("bold"));
        }
        Ok(())
    }
}

/// A font parsed once at load time. The bytes live for the rest of the
/// process so the shaping face can borrow them.
struct LoadedFont {
    face: rustybuzz::Face<'static>,
    units_per_em: f64,
    ascender: f64,
    descender: f64,
    line_gap: f64,
}

impl LoadedFont {
    fn from_bytes(data: Vec<u8>, origin: &Path) -> Result<Self> {
        let data: &'static [u8] = Box::leak(data.into_boxed_slice());
        let face = rustybuzz::Face::from_slice(data, 0)
            .ok_or_else(|| RenderError::InvalidFont(origin.to_path_buf()))?;
        let units_per_em = f64::from(face.units_per_em());
        if units_per_em <= 0.0 {
            return Err(RenderError::InvalidFont(origin.to_path_buf()));
        }
        let ascender = f64::from(face.ascender());
        let descender = f64::from(face.descender());
        let line_gap = f64::from(face.line_gap());
        Ok(Self {
            face,
            units_per_em,
            ascender,
            descender,
            line_gap,
        })
    }

    fn scale(&self, size: f64) -> f64 {
        size / self.units_per_em
    }
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("units_per_em", &self.units_per_em)
            .field("ascender", &self.ascender)
            .field("descender", &self.descender)
            .field("line_gap", &self.line_gap)
            .finish_non_exhaustive()
    }
}

/// Font metrics backed by shaping with rustybuzz.
#[derive(Debug)]
pub struct FontMetrics {
    faces: [LoadedFont; 4],
}

impl FontMetrics {
    pub fn load(set: &FontSet) -> Result<Self> {
        set.require()?;
        let mut loaded = Vec::with_capacity(FontFace::ALL.len());
        for face in FontFace::ALL {
            let path = set
                .path(face)
                .ok_or(RenderError::MissingFont("regular"))?;
            let data = std::fs::read(path).map_err(|source| RenderError::FontRead {
                path: path.to_path_buf(),
                source,
            })?;
            loaded.push(LoadedFont::from_bytes(data, path)?);
        }
        let faces: [LoadedFont; 4] = loaded
            .try_into()
            .map_err(|_| RenderError::MissingFont("regular"))?;
        Ok(Self { faces })
    }

    fn font(&self, face: FontFace) -> &LoadedFont {
        &self.faces[face.index()]
    }
}

impl TextMeasure for FontMetrics {
    fn width(&self, face: FontFace, size: f64, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let font = self.font(face);
        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let glyphs = rustybuzz::shape(&font.face, &[], buffer);
        let advance: i64 = glyphs
            .glyph_positions()
            .iter()
            .map(|position| i64::from(position.x_advance))
            .sum();
        advance as f64 * font.scale(size)
    }

    fn line_height(&self, face: FontFace, size: f64) -> f64 {
        let font = self.font(face);
        (font.ascender - font.descender + font.line_gap) * font.scale(size)
    }

    fn ascent(&self, face: FontFace, size: f64) -> f64 {
        let font = self.font(face);
        font.ascender * font.scale(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn optional_faces_fall_back_to_regular() {
        let set = FontSet {
            regular: Some(PathBuf::from("regular.ttf")),
            bold: Some(PathBuf::from("bold.ttf")),
            alt: None,
            italic: Some(PathBuf::from("italic.ttf")),
        };
        assert_eq!(set.path(FontFace::Alt), Some(Path::new("regular.ttf")));
        assert_eq!(set.path(FontFace::Italic), Some(Path::new("italic.ttf")));
        assert_eq!(set.path(FontFace::Bold), Some(Path::new("bold.ttf")));
    }

    #[test]
    fn bold_face_is_required() {
        let set = FontSet {
            regular: Some(PathBuf::from("regular.ttf")),
            ..FontSet::default()
        };
        assert!(matches!(
            FontMetrics::load(&set),
            Err(RenderError::MissingFont("bold"))
        ));
    }

    #[test]
    fn unreadable_font_reports_path() {
        let temp = TempDir::new().expect("temp dir");
        let missing = temp.path().join("missing.ttf");
        let set = FontSet {
            regular: Some(missing.clone()),
            bold: Some(missing.clone()),
            ..FontSet::default()
        };
        match FontMetrics::load(&set) {
            Err(RenderError::FontRead { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    const SYSTEM_FONTS: [&str; 3] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ];

    #[test]
    fn measures_with_faces_parsed_at_load() {
        let Some(system) = SYSTEM_FONTS.iter().map(Path::new).find(|path| path.is_file()) else {
            eprintln!("no DejaVuSans.ttf installed; skipping");
            return;
        };
        let temp = TempDir::new().expect("temp dir");
        let font = temp.path().join("sans.ttf");
        std::fs::copy(system, &font).expect("copy font");
        let set = FontSet {
            regular: Some(font.clone()),
            bold: Some(font),
            ..FontSet::default()
        };
        let metrics = FontMetrics::load(&set).expect("load fonts");
        drop(temp);

        let one = metrics.width(FontFace::Regular, 10.0, "Ada");
        let two = metrics.width(FontFace::Regular, 20.0, "Ada");
        assert!(one > 0.0);
        assert!((two - 2.0 * one).abs() < 1e-9);
        assert!(metrics.width(FontFace::Italic, 10.0, "Ada Lovelace") > one);
        assert_eq!(metrics.width(FontFace::Bold, 10.0, ""), 0.0);
        assert!(metrics.line_height(FontFace::Alt, 10.0) > metrics.ascent(FontFace::Alt, 10.0));
    }

    #[test]
    fn garbage_font_is_rejected() {
        let temp = TempDir::new().expect("temp dir");
        let bogus = temp.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").expect("write");
        let set = FontSet {
            regular: Some(bogus.clone()),
            bold: Some(bogus.clone()),
            ..FontSet::default()
        };
        assert!(matches!(
            FontMetrics::load(&set),
            Err(RenderError::InvalidFont(_))
        ));
    }
}
