use crate::domain::profile::ImageSize;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldKey {
    pub name: String,
    pub id: String,
}

/// Which directory fields end up on a badge, and under what names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelection {
    keys: Vec<FieldKey>,
    pronoun_field: Option<String>,
    image_size: ImageSize,
}

impl FieldSelection {
    pub fn new(pronoun_field: Option<String>, image_size: ImageSize) -> Self {
        let pronoun_field = pronoun_field
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        Self {
            keys: Vec::new(),
            pronoun_field,
            image_size,
        }
    }

    pub fn with_field(mut self, name: &str, id: &str) -> Result<Self, CoreError> {
        self.push_field(name, id)?;
        Ok(self)
    }

    pub fn push_field(&mut self, name: &str, id: &str) -> Result<(), CoreError> {
        let name = name.trim();
        let id = id.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyFieldName);
        }
        if id.is_empty() {
            return Err(CoreError::EmptyFieldId(name.to_string()));
        }
        if self.keys.iter().any(|key| key.name == name) {
            return Err(CoreError::DuplicateFieldName(name.to_string()));
        }
        self.keys.push(FieldKey {
            name: name.to_string(),
            id: id.to_string(),
        });
        Ok(())
    }

    pub fn keys(&self) -> &[FieldKey] {
        &self.keys
    }

    pub fn pronoun_field(&self) -> Option<&str> {
        self.pronoun_field.as_deref()
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }
}
