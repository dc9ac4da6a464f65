pub mod domain;
pub mod error;
pub mod template;
pub mod text;

pub use domain::*;
pub use error::CoreError;
pub use template::{
    builtin_template, builtin_templates, LabelSlot, LabelTemplate, PageSize, POINTS_PER_INCH,
};
pub use text::{derive_pronouns, format_handle, has_word_content, normalize_annotated, Annotated};
