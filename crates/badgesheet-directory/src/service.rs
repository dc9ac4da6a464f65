use crate::Result;
use async_trait::async_trait;
use badgesheet_core::{ImageSize, RawProfile};
use std::path::PathBuf;

/// Lookups against the remote people directory.
///
/// `Ok(None)` means the directory answered and had no match; `Err` means the
/// directory could not be asked.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    fn source_name(&self) -> &'static str;
    async fn find_user_id(&self, email: &str) -> Result<Option<String>>;
    async fn profile(&self, user_id: &str) -> Result<Option<RawProfile>>;
}

/// Turns an avatar URL into a local image file. Never fails: a missing avatar
/// is `None`.
#[async_trait]
pub trait AvatarSource: Send + Sync {
    async fn acquire(&self, url: &str, size: ImageSize) -> Option<PathBuf>;
}
