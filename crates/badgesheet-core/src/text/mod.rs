pub mod normalize;
pub mod pronouns;

pub use normalize::{has_word_content, normalize_annotated, Annotated};
pub use pronouns::{derive_pronouns, format_handle, HANDLE_SIGIL};
