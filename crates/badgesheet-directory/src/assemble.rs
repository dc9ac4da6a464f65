use crate::project::{project_profile, ProjectedProfile};
use crate::resolve::resolve_user_id;
use crate::service::{AvatarSource, DirectoryService};
use badgesheet_core::{
    derive_pronouns, format_handle, normalize_annotated, DomainAliases, FieldSelection,
    NormalizedRecord,
};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a per-email pipeline needs, built once per run.
#[derive(Clone)]
pub struct AssemblyContext {
    pub directory: Arc<dyn DirectoryService>,
    pub avatars: Arc<dyn AvatarSource>,
    pub selection: Arc<FieldSelection>,
    pub domain_aliases: Option<DomainAliases>,
    /// Upper bound on pipelines in flight.
    pub concurrency: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    UserNotFound,
    LookupFailed(String),
    ProfileNotFound,
    PipelineFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UserNotFound => f.write_str("user not found"),
            SkipReason::LookupFailed(detail) => write!(f, "directory lookup failed: {detail}"),
            SkipReason::ProfileNotFound => f.write_str("profile not found"),
            SkipReason::PipelineFailed(detail) => write!(f, "pipeline failed: {detail}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEmail {
    pub email: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    pub records: Vec<NormalizedRecord>,
    pub skipped: Vec<SkippedEmail>,
}

/// Builds one record per resolvable email, in roster order.
pub async fn assemble(ctx: &AssemblyContext, emails: &[String]) -> Vec<NormalizedRecord> {
    assemble_with_report(ctx, emails).await.records
}

/// Like [`assemble`], also listing the emails that produced no record.
///
/// Each email runs in its own task so a failing or panicking pipeline only
/// loses its own record.
pub async fn assemble_with_report(ctx: &AssemblyContext, emails: &[String]) -> AssemblyReport {
    let limit = ctx.concurrency.max(1);
    let outcomes: Vec<_> = stream::iter(emails.iter().cloned())
        .map(|email| {
            let handle = tokio::spawn(build_record(ctx.clone(), email.clone()));
            async move { (email, handle.await) }
        })
        .buffered(limit)
        .collect()
        .await;

    let mut report = AssemblyReport::default();
    for (email, outcome) in outcomes {
        let outcome =
            outcome.unwrap_or_else(|err| Err(SkipReason::PipelineFailed(err.to_string())));
        match outcome {
            Ok(record) => report.records.push(record),
            Err(reason) => {
                warn!(email = %email, reason = %reason, "no badge for email");
                report.skipped.push(SkippedEmail { email, reason });
            }
        }
    }
    debug!(
        records = report.records.len(),
        skipped = report.skipped.len(),
        "assembly finished"
    );
    report
}

async fn build_record(ctx: AssemblyContext, email: String) -> Result<NormalizedRecord, SkipReason> {
    let user_id = resolve_user_id(&*ctx.directory, ctx.domain_aliases.as_ref(), &email)
        .await
        .map_err(|err| SkipReason::LookupFailed(err.to_string()))?
        .ok_or(SkipReason::UserNotFound)?;
    let profile = project_profile(&*ctx.directory, &user_id, &ctx.selection)
        .await
        .ok_or(SkipReason::ProfileNotFound)?;

    let avatar = match profile.image_url.as_deref() {
        Some(url) => ctx.avatars.acquire(url, ctx.selection.image_size()).await,
        None => None,
    };
    Ok(finish_record(profile, avatar))
}

fn finish_record(profile: ProjectedProfile, avatar: Option<PathBuf>) -> NormalizedRecord {
    let name = normalize_annotated(&profile.real_name);
    let handle = normalize_annotated(&profile.display_name);
    let pronouns = derive_pronouns(&profile.pronouns, &name.pronouns, &handle.pronouns);

    NormalizedRecord {
        name: name.text,
        handle: format_handle(&handle.text),
        pronouns,
        avatar,
        fields: profile.fields,
    }
}

#[cfg(test)]
mod tests {
    use super::finish_record;
    use crate::project::ProjectedProfile;
    use badgesheet_core::OrderedFields;

    #[test]
    fn pronoun_field_beats_name_annotation() {
        let profile = ProjectedProfile {
            real_name: "Pat Lee (he/him)".to_string(),
            display_name: "plee".to_string(),
            pronouns: "She/Her".to_string(),
            image_url: None,
            fields: OrderedFields::new(),
        };
        let record = finish_record(profile, None);
        assert_eq!(record.name, "Pat Lee");
        assert_eq!(record.handle, "@plee");
        assert_eq!(record.pronouns, "she/her");
    }

    #[test]
    fn name_annotation_fills_missing_pronoun_field() {
        let profile = ProjectedProfile {
            real_name: "Pat Lee (they/them)".to_string(),
            display_name: "plee (xe/xem)".to_string(),
            ..ProjectedProfile::default()
        };
        let record = finish_record(profile, None);
        assert_eq!(record.pronouns, "they/them");
        assert_eq!(record.handle, "@plee");
    }

    #[test]
    fn handle_annotation_is_last_resort() {
        let profile = ProjectedProfile {
            real_name: "Pat Lee (OOO til 5/11)".to_string(),
            display_name: "plee (Xe/Xem)".to_string(),
            ..ProjectedProfile::default()
        };
        let record = finish_record(profile, None);
        assert_eq!(record.name, "Pat Lee");
        assert_eq!(record.pronouns, "xe/xem");
    }
}
