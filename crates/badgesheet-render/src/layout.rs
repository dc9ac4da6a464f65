use std::path::PathBuf;

use badgesheet_core::{has_word_content, LabelTemplate, NormalizedRecord, PageSize};
use serde::Serialize;

use crate::fit::{fit_font_size, wrap_lines};
use crate::metrics::{FontFace, TextMeasure};

const NAME_SCALE: f64 = 1.5;
const HANDLE_SCALE: f64 = 1.2;
const OUTLINE_WIDTH: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const NAME: Color = Color::rgb(0x5c, 0x39, 0x77);
    pub const HANDLE: Color = Color::rgb(0xee, 0x53, 0x40);
    pub const TEXT: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const OUTLINE: Color = Color::rgb(0xcc, 0xcc, 0xcc);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub base_font_size: f64,
    pub text_padding: f64,
    pub watermark: Option<PathBuf>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            base_font_size: 10.0,
            text_padding: 5.0,
            watermark: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TextRole {
    Name,
    Handle,
    Pronouns,
    Field { name: String },
}

/// A run of wrapped lines. `x`/`y` is the top-left of the first line, in
/// points from the top-left of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub role: TextRole,
    pub face: FontFace,
    pub size: f64,
    pub color: Color,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub line_height: f64,
    pub ascent: f64,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Outline {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        line_width: f64,
        color: Color,
    },
    Image {
        path: PathBuf,
        x: f64,
        y: f64,
        size: f64,
    },
    Text(TextBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPlan {
    pub record: usize,
    pub row: u32,
    pub column: u32,
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PagePlan {
    pub labels: Vec<LabelPlan>,
}

/// Everything needed to draw a sheet, with no font or PDF state attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPlan {
    pub page: PageSize,
    pub pages: Vec<PagePlan>,
}

impl SheetPlan {
    pub fn label_count(&self) -> usize {
        self.pages.iter().map(|page| page.labels.len()).sum()
    }
}

pub fn layout_sheet(
    records: &[NormalizedRecord],
    template: &LabelTemplate,
    measure: &dyn TextMeasure,
    options: &LayoutOptions,
) -> SheetPlan {
    let mut pages: Vec<PagePlan> = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let slot = template.slot(index);
        if pages.len() <= slot.page {
            pages.resize_with(slot.page + 1, PagePlan::default);
        }
        let (left, top) = template.origin(slot);
        let ops = LabelCursor::new(template, measure, options, left, top).draw(record);
        pages[slot.page].labels.push(LabelPlan {
            record: index,
            row: slot.row,
            column: slot.column,
            ops,
        });
    }
    tracing::debug!(labels = records.len(), pages = pages.len(), "laid out sheet");
    SheetPlan {
        page: template.page,
        pages,
    }
}

struct LabelCursor<'a> {
    template: &'a LabelTemplate,
    measure: &'a dyn TextMeasure,
    options: &'a LayoutOptions,
    base_left: f64,
    base_top: f64,
    text_left: f64,
    text_width: f64,
    top: f64,
    ops: Vec<DrawOp>,
}

impl<'a> LabelCursor<'a> {
    fn new(
        template: &'a LabelTemplate,
        measure: &'a dyn TextMeasure,
        options: &'a LayoutOptions,
        base_left: f64,
        base_top: f64,
    ) -> Self {
        let padding = template.padding;
        let image_size = Self::image_size(template);
        Self {
            template,
            measure,
            options,
            base_left,
            base_top,
            text_left: base_left + padding + image_size + padding,
            text_width: template.label_width - 3.0 * padding - image_size,
            top: base_top + padding,
            ops: Vec::new(),
        }
    }

    fn image_size(template: &LabelTemplate) -> f64 {
        (template.label_width - 2.0 * template.padding) / 3.0
    }

    fn draw(mut self, record: &NormalizedRecord) -> Vec<DrawOp> {
        let template = self.template;
        if template.show_outline {
            self.ops.push(DrawOp::Outline {
                x: self.base_left,
                y: self.base_top,
                width: template.label_width,
                height: template.label_height,
                radius: template.corner_radius,
                line_width: OUTLINE_WIDTH,
                color: Color::OUTLINE,
            });
        }

        let image_left = self.base_left + template.padding;
        let image_top = self.top;
        let image_size = Self::image_size(template);
        if let Some(avatar) = &record.avatar {
            self.ops.push(DrawOp::Image {
                path: avatar.clone(),
                x: image_left,
                y: image_top,
                size: image_size,
            });
        }
        if let Some(watermark) = &self.options.watermark {
            self.ops.push(DrawOp::Image {
                path: watermark.clone(),
                x: image_left + image_size - image_size / 5.0,
                y: image_top + image_size - image_size / 5.0,
                size: image_size / 3.0,
            });
        }

        let base = self.options.base_font_size;
        self.push_text(
            TextRole::Name,
            &record.name,
            FontFace::Bold,
            base * NAME_SCALE,
            Color::NAME,
        );
        self.push_text(
            TextRole::Handle,
            &record.handle,
            FontFace::Alt,
            base * HANDLE_SCALE,
            Color::HANDLE,
        );
        if has_word_content(&record.pronouns) {
            self.push_text(
                TextRole::Pronouns,
                &record.pronouns,
                FontFace::Italic,
                base,
                Color::TEXT,
            );
        }

        for (name, value) in record.fields.iter() {
            if !has_word_content(value) {
                continue;
            }
            let size = self.fit(FontFace::Regular, value, base);
            let lines = wrap_lines(self.measure, FontFace::Regular, size, value, self.text_width);
            let height = lines.len() as f64 * self.measure.line_height(FontFace::Regular, size);
            if height < self.remaining_height() {
                self.place(
                    TextRole::Field {
                        name: name.to_string(),
                    },
                    FontFace::Regular,
                    size,
                    Color::TEXT,
                    lines,
                );
            } else {
                tracing::debug!(field = name, "no room left on label; field skipped");
            }
        }

        self.ops
    }

    fn fit(&self, face: FontFace, text: &str, ideal: f64) -> f64 {
        let natural = self.measure.width(face, ideal, text);
        fit_font_size(ideal, natural, self.text_width)
    }

    fn remaining_height(&self) -> f64 {
        self.template.label_height - (self.top - self.base_top) - self.template.padding
    }

    fn push_text(&mut self, role: TextRole, text: &str, face: FontFace, ideal: f64, color: Color) {
        let size = self.fit(face, text, ideal);
        let lines = wrap_lines(self.measure, face, size, text, self.text_width);
        self.place(role, face, size, color, lines);
    }

    // Lines past the bottom of the label are clipped, but the cursor still
    // advances by the full wrapped height.
    fn place(
        &mut self,
        role: TextRole,
        face: FontFace,
        size: f64,
        color: Color,
        lines: Vec<String>,
    ) {
        let line_height = self.measure.line_height(face, size);
        let full_height = lines.len() as f64 * line_height;
        let room = self.remaining_height();
        let visible: Vec<String> = lines
            .into_iter()
            .enumerate()
            .take_while(|(index, _)| (*index as f64 + 1.0) * line_height <= room)
            .map(|(_, line)| line)
            .collect();

        if !visible.is_empty() {
            self.ops.push(DrawOp::Text(TextBlock {
                role,
                face,
                size,
                color,
                x: self.text_left,
                y: self.top,
                width: self.text_width,
                line_height,
                ascent: self.measure.ascent(face, size),
                lines: visible,
            }));
        }
        self.top += self.options.text_padding + full_height;
    }
}
