use crate::service::DirectoryService;
use badgesheet_core::{FieldSelection, OrderedFields, RawProfile};
use tracing::{debug, warn};

/// The parts of a directory profile a badge is built from, before text cleanup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectedProfile {
    pub real_name: String,
    pub display_name: String,
    pub pronouns: String,
    pub image_url: Option<String>,
    pub fields: OrderedFields,
}

/// Fetches and projects the profile of `user_id`; `None` when the directory
/// has no profile or cannot be reached.
pub async fn project_profile(
    directory: &dyn DirectoryService,
    user_id: &str,
    selection: &FieldSelection,
) -> Option<ProjectedProfile> {
    match directory.profile(user_id).await {
        Ok(Some(raw)) => Some(project(&raw, selection)),
        Ok(None) => {
            debug!(user_id = %user_id, "no directory profile");
            None
        }
        Err(err) => {
            warn!(user_id = %user_id, error = %err, "profile fetch failed");
            None
        }
    }
}

/// Every selected field is materialized; absent ids project to `""`.
pub fn project(raw: &RawProfile, selection: &FieldSelection) -> ProjectedProfile {
    let fields = selection
        .keys()
        .iter()
        .map(|key| {
            let value = raw.field(&key.id).map(str::trim).unwrap_or_default();
            (key.name.clone(), value.to_string())
        })
        .collect();

    let pronouns = selection
        .pronoun_field()
        .and_then(|id| raw.field(id))
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    ProjectedProfile {
        real_name: raw.real_name.clone().unwrap_or_default(),
        display_name: raw.display_name.clone().unwrap_or_default(),
        pronouns,
        image_url: raw.image_url(selection.image_size()).map(str::to_string),
        fields,
    }
}
