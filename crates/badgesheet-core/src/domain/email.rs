use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub fn normalize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// Domain part of an email address, i.e. everything after the last `@`.
pub fn email_domain(email: &str) -> Option<&str> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    if domain.is_empty() {
        return None;
    }
    Some(domain)
}

pub fn substitute_domain(email: &str, domain: &str) -> Option<String> {
    let (local, _) = email.trim().rsplit_once('@')?;
    Some(format!("{local}@{domain}"))
}

/// Two organisational domains that key the same people in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAliases {
    first: String,
    second: String,
}

impl DomainAliases {
    pub fn new(first: &str, second: &str) -> Result<Self, CoreError> {
        let first = normalize_domain(first)?;
        let second = normalize_domain(second)?;
        if first == second {
            return Err(CoreError::IdenticalDomainAliases);
        }
        Ok(Self { first, second })
    }

    /// The other member of the pair, or `None` when `domain` is in neither.
    pub fn counterpart(&self, domain: &str) -> Option<&str> {
        let domain = domain.trim();
        if domain.eq_ignore_ascii_case(&self.first) {
            Some(&self.second)
        } else if domain.eq_ignore_ascii_case(&self.second) {
            Some(&self.first)
        } else {
            None
        }
    }
}

fn normalize_domain(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim().trim_start_matches('@');
    if trimmed.is_empty()
        || trimmed.contains('@')
        || trimmed.chars().any(char::is_whitespace)
        || !trimmed.contains('.')
    {
        return Err(CoreError::InvalidDomain(raw.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}
