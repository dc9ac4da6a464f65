use crate::domain::fields::OrderedFields;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A fully resolved badge, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: String,
    pub handle: String,
    pub pronouns: String,
    /// Local path of the processed avatar; `None` when it could not be acquired.
    #[serde(default)]
    pub avatar: Option<PathBuf>,
    #[serde(default)]
    pub fields: OrderedFields,
}
