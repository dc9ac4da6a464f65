pub mod error;
pub mod fit;
pub mod layout;
pub mod metrics;
pub mod pdf;

pub use error::{RenderError, Result};
pub use fit::{fit_font_size, wrap_lines, MIN_SHRINK_RATIO};
pub use layout::{
    layout_sheet, Color, DrawOp, LabelPlan, LayoutOptions, PagePlan, SheetPlan, TextBlock,
    TextRole,
};
pub use metrics::{FontFace, FontMetrics, FontSet, TextMeasure};
pub use pdf::{write_pdf, PdfOptions};
