use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn us_letter() -> Self {
        Self {
            width: 8.5 * POINTS_PER_INCH,
            height: 11.0 * POINTS_PER_INCH,
        }
    }
}

/// Geometry of a label sheet, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelTemplate {
    pub page: PageSize,
    pub rows: u32,
    pub columns: u32,
    pub left_margin: f64,
    pub top_margin: f64,
    pub label_width: f64,
    pub label_height: f64,
    pub x_stride: f64,
    pub y_stride: f64,
    pub corner_radius: f64,
    pub padding: f64,
    pub show_outline: bool,
}

/// Where a record lands on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSlot {
    pub page: usize,
    pub row: u32,
    pub column: u32,
}

impl LabelTemplate {
    /// Avery 5395 name badges: 2 x 4 per US Letter sheet, 3 3/8" x 2 1/3".
    pub fn avery5395() -> Self {
        Self {
            page: PageSize::us_letter(),
            rows: 4,
            columns: 2,
            left_margin: 0.6875 * POINTS_PER_INCH,
            top_margin: 0.583333333 * POINTS_PER_INCH,
            label_width: 3.375 * POINTS_PER_INCH,
            label_height: 2.333333333 * POINTS_PER_INCH,
            x_stride: 3.75 * POINTS_PER_INCH,
            y_stride: 2.5 * POINTS_PER_INCH,
            corner_radius: 0.1875 * POINTS_PER_INCH,
            padding: 15.0,
            show_outline: false,
        }
    }

    pub fn validate(self) -> Result<Self, CoreError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(CoreError::InvalidTemplate(
                "rows and columns must be positive".to_string(),
            ));
        }
        let dimensions = [
            ("page width", self.page.width),
            ("page height", self.page.height),
            ("label width", self.label_width),
            ("label height", self.label_height),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidTemplate(format!("{name} must be positive")));
            }
        }
        if self.padding < 0.0 || self.padding * 2.0 >= self.label_width {
            return Err(CoreError::InvalidTemplate(
                "padding must leave room inside the label".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn labels_per_page(&self) -> usize {
        (self.rows as usize) * (self.columns as usize)
    }

    /// Fills columns left to right, then rows top to bottom, then pages.
    pub fn slot(&self, index: usize) -> LabelSlot {
        let columns = self.columns.max(1) as usize;
        let rows = self.rows.max(1) as usize;
        LabelSlot {
            page: index / (columns * rows),
            row: ((index / columns) % rows) as u32,
            column: (index % columns) as u32,
        }
    }

    /// Top-left corner of the label in a slot.
    pub fn origin(&self, slot: LabelSlot) -> (f64, f64) {
        (
            self.left_margin + self.x_stride * f64::from(slot.column),
            self.top_margin + self.y_stride * f64::from(slot.row),
        )
    }
}

pub fn builtin_templates() -> Vec<(&'static str, LabelTemplate)> {
    vec![("avery5395", LabelTemplate::avery5395())]
}

pub fn builtin_template(name: &str) -> Result<LabelTemplate, CoreError> {
    let wanted = name.trim();
    builtin_templates()
        .into_iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(wanted))
        .map(|(_, template)| template)
        .ok_or_else(|| CoreError::UnknownTemplate(wanted.to_string()))?
        .validate()
}
