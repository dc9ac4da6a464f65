use crate::service::DirectoryService;
use crate::Result;
use badgesheet_core::{email_domain, substitute_domain, DomainAliases};
use tracing::{debug, warn};

/// Finds the directory user id for `email`.
///
/// When the literal address misses and its domain is one of the aliased pair,
/// the counterpart domain is tried exactly once. The first successful answer
/// wins. `Ok(None)` means the directory answered and knows neither address;
/// a failed call is only returned when no attempt found the user.
pub async fn resolve_user_id(
    directory: &dyn DirectoryService,
    aliases: Option<&DomainAliases>,
    email: &str,
) -> Result<Option<String>> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(None);
    }

    let first = match lookup(directory, email).await {
        Ok(Some(id)) => return Ok(Some(id)),
        other => other,
    };

    let alternate = aliases.and_then(|aliases| {
        let counterpart = email_domain(email).and_then(|domain| aliases.counterpart(domain))?;
        substitute_domain(email, counterpart)
    });
    let Some(alternate) = alternate else {
        return first;
    };
    debug!(email = %email, alternate = %alternate, "retrying lookup with aliased domain");
    match lookup(directory, &alternate).await {
        Ok(None) => first,
        second => second,
    }
}

async fn lookup(directory: &dyn DirectoryService, email: &str) -> Result<Option<String>> {
    let found = directory.find_user_id(email).await;
    match &found {
        Ok(Some(_)) => {}
        Ok(None) => debug!(email = %email, source = directory.source_name(), "no directory user"),
        Err(err) => warn!(
            email = %email,
            source = directory.source_name(),
            error = %err,
            "directory lookup failed"
        ),
    }
    found
}
