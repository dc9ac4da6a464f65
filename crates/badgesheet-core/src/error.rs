use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("field name is required")]
    EmptyFieldName,
    #[error("field id is required for field {0}")]
    EmptyFieldId(String),
    #[error("duplicate field name: {0}")]
    DuplicateFieldName(String),
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    #[error("domain aliases must name two different domains")]
    IdenticalDomainAliases,
    #[error("unknown label template: {0}")]
    UnknownTemplate(String),
    #[error("invalid label template geometry: {0}")]
    InvalidTemplate(String),
}
