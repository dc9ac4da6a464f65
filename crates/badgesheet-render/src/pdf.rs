use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::layout::SheetPlan;
use crate::metrics::FontSet;

#[derive(Debug, Clone, Default)]
pub struct PdfOptions {
    pub fonts: FontSet,
    /// Directory holding the pdfium shared library. Falls back to the
    /// system library search path when unset.
    pub library_dir: Option<PathBuf>,
}

/// Draws `plan` into a new PDF at `out`. A plan with no pages still yields a
/// valid single blank page.
pub fn write_pdf(plan: &SheetPlan, options: &PdfOptions, out: &Path) -> Result<()> {
    options.fonts.require()?;
    imp::write_pdf(plan, options, out)
}

#[cfg(feature = "pdf")]
mod imp {
    use std::path::Path;

    use pdfium_render::prelude::*;

    use super::PdfOptions;
    use crate::error::{RenderError, Result};
    use crate::layout::{Color, DrawOp, SheetPlan, TextBlock};
    use crate::metrics::FontFace;

    // Cubic bezier handle length for a quarter circle.
    const KAPPA: f64 = 0.552_284_75;

    fn pdf_error(err: PdfiumError) -> RenderError {
        RenderError::Pdf(format!("{err:?}"))
    }

    fn points(value: f64) -> PdfPoints {
        PdfPoints::new(value as f32)
    }

    fn color(color: Color) -> PdfColor {
        PdfColor::new(color.r, color.g, color.b, 255)
    }

    struct FontTokens {
        regular: PdfFontToken,
        bold: PdfFontToken,
        alt: PdfFontToken,
        italic: PdfFontToken,
    }

    impl FontTokens {
        fn get(&self, face: FontFace) -> PdfFontToken {
            match face {
                FontFace::Regular => self.regular,
                FontFace::Bold => self.bold,
                FontFace::Alt => self.alt,
                FontFace::Italic => self.italic,
            }
        }
    }

    fn bind(options: &PdfOptions) -> Result<Pdfium> {
        let bindings = match &options.library_dir {
            Some(dir) => {
                let dir = dir.to_string_lossy().to_string();
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|err| RenderError::Unavailable(format!("pdfium library: {err:?}")))?;
        Ok(Pdfium::new(bindings))
    }

    pub(super) fn write_pdf(plan: &SheetPlan, options: &PdfOptions, out: &Path) -> Result<()> {
        let pdfium = bind(options)?;
        let mut document = pdfium.create_new_pdf().map_err(pdf_error)?;

        let mut load = |face: FontFace| -> Result<PdfFontToken> {
            let path = options
                .fonts
                .path(face)
                .ok_or(RenderError::MissingFont("regular"))?;
            let path = path.to_string_lossy().to_string();
            document
                .fonts_mut()
                .load_true_type_from_file(&path, true)
                .map_err(pdf_error)
        };
        let fonts = FontTokens {
            regular: load(FontFace::Regular)?,
            bold: load(FontFace::Bold)?,
            alt: load(FontFace::Alt)?,
            italic: load(FontFace::Italic)?,
        };

        let paper = PdfPagePaperSize::from_points(points(plan.page.width), points(plan.page.height));
        if plan.pages.is_empty() {
            document
                .pages_mut()
                .create_page_at_end(paper)
                .map_err(pdf_error)?;
        }

        for page_plan in &plan.pages {
            let mut page = document
                .pages_mut()
                .create_page_at_end(paper)
                .map_err(pdf_error)?;
            for label in &page_plan.labels {
                for op in &label.ops {
                    draw(&document, &mut page, plan.page.height, &fonts, op)?;
                }
            }
        }

        let out = out.to_string_lossy().to_string();
        document.save_to_file(&out).map_err(pdf_error)?;
        tracing::debug!(path = %out, pages = plan.pages.len(), "wrote pdf");
        Ok(())
    }

    fn draw<'a>(
        document: &PdfDocument<'a>,
        page: &mut PdfPage<'a>,
        page_height: f64,
        fonts: &FontTokens,
        op: &DrawOp,
    ) -> Result<()> {
        match op {
            DrawOp::Outline {
                x,
                y,
                width,
                height,
                radius,
                line_width,
                color: stroke,
            } => {
                let bottom = page_height - y - height;
                let path = rounded_rect(
                    document,
                    *x,
                    bottom,
                    *width,
                    *height,
                    *radius,
                    *line_width,
                    *stroke,
                )?;
                page.objects_mut()
                    .add_path_object(path)
                    .map_err(pdf_error)?;
            }
            DrawOp::Image { path, x, y, size } => {
                let image = match image::open(path) {
                    Ok(image) => image,
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "image skipped");
                        return Ok(());
                    }
                };
                let bottom = page_height - y - size;
                page.objects_mut()
                    .create_image_object(
                        points(*x),
                        points(bottom),
                        &image,
                        Some(points(*size)),
                        Some(points(*size)),
                    )
                    .map_err(pdf_error)?;
            }
            DrawOp::Text(block) => draw_text(page, page_height, fonts, block)?,
        }
        Ok(())
    }

    fn draw_text(
        page: &mut PdfPage,
        page_height: f64,
        fonts: &FontTokens,
        block: &TextBlock,
    ) -> Result<()> {
        let font = fonts.get(block.face);
        for (index, line) in block.lines.iter().enumerate() {
            let baseline = block.y + index as f64 * block.line_height + block.ascent;
            let mut object = page
                .objects_mut()
                .create_text_object(
                    points(block.x),
                    points(page_height - baseline),
                    line,
                    font,
                    points(block.size),
                )
                .map_err(pdf_error)?;
            object
                .set_fill_color(color(block.color))
                .map_err(pdf_error)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn rounded_rect<'a>(
        document: &PdfDocument<'a>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        line_width: f64,
        stroke: Color,
    ) -> Result<PdfPagePathObject<'a>> {
        let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
        let k = r * KAPPA;
        let (right, top) = (x + width, y + height);

        let mut path = PdfPagePathObject::new(
            document,
            points(x + r),
            points(y),
            Some(color(stroke)),
            Some(points(line_width)),
            None,
        )
        .map_err(pdf_error)?;
        path.line_to(points(right - r), points(y)).map_err(pdf_error)?;
        path.bezier_to(
            points(right),
            points(y + r),
            points(right - r + k),
            points(y),
            points(right),
            points(y + r - k),
        )
        .map_err(pdf_error)?;
        path.line_to(points(right), points(top - r)).map_err(pdf_error)?;
        path.bezier_to(
            points(right - r),
            points(top),
            points(right),
            points(top - r + k),
            points(right - r + k),
            points(top),
        )
        .map_err(pdf_error)?;
        path.line_to(points(x + r), points(top)).map_err(pdf_error)?;
        path.bezier_to(
            points(x),
            points(top - r),
            points(x + r - k),
            points(top),
            points(x),
            points(top - r + k),
        )
        .map_err(pdf_error)?;
        path.line_to(points(x), points(y + r)).map_err(pdf_error)?;
        path.bezier_to(
            points(x + r),
            points(y),
            points(x),
            points(y + r - k),
            points(x + r - k),
            points(y),
        )
        .map_err(pdf_error)?;
        path.close_path().map_err(pdf_error)?;
        Ok(path)
    }
}

#[cfg(not(feature = "pdf"))]
mod imp {
    use std::path::Path;

    use super::PdfOptions;
    use crate::error::{RenderError, Result};
    use crate::layout::SheetPlan;

    pub(super) fn write_pdf(_plan: &SheetPlan, _options: &PdfOptions, _out: &Path) -> Result<()> {
        Err(RenderError::Unavailable(
            "pdf output requires the `pdf` feature".to_string(),
        ))
    }
}
