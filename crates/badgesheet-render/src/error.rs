use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a usable font file: {0}")]
    InvalidFont(PathBuf),
    #[error("missing font: {0}")]
    MissingFont(&'static str),
    #[error("pdf error: {0}")]
    Pdf(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
