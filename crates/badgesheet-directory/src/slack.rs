use crate::service::DirectoryService;
use crate::{DirectoryError, Result};
use async_trait::async_trait;
use badgesheet_core::{ImageSize, RawProfile};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use url::Url;

const NOT_FOUND_ERRORS: [&str; 2] = ["users_not_found", "user_not_found"];

/// `DirectoryService` backed by the Slack Web API.
#[derive(Debug, Clone)]
pub struct SlackDirectory {
    client: Client,
    api_base: Url,
    token: String,
}

impl SlackDirectory {
    pub fn new(client: Client, api_base: &str, token: impl Into<String>) -> Result<Self> {
        let mut api_base = Url::parse(api_base.trim_end_matches('/'))?;
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }
        Ok(Self {
            client,
            api_base,
            token: token.into(),
        })
    }

    pub fn http_client(timeout: Duration) -> Result<Client> {
        Ok(Client::builder()
            .user_agent("badgesheet")
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()?)
    }

    async fn call(&self, method: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = self.api_base.join(method)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl DirectoryService for SlackDirectory {
    fn source_name(&self) -> &'static str {
        "slack"
    }

    async fn find_user_id(&self, email: &str) -> Result<Option<String>> {
        let body = self
            .call("users.lookupByEmail", &[("email", email)])
            .await?;
        parse_lookup(&body)
    }

    async fn profile(&self, user_id: &str) -> Result<Option<RawProfile>> {
        let body = self.call("users.profile.get", &[("user", user_id)]).await?;
        parse_profile(&body)
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    ok: bool,
    error: Option<String>,
    user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
struct SlackUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    ok: bool,
    error: Option<String>,
    profile: Option<SlackProfile>,
}

#[derive(Debug, Deserialize)]
struct SlackProfile {
    real_name_normalized: Option<String>,
    display_name_normalized: Option<String>,
    #[serde(default)]
    fields: Value,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

pub(crate) fn parse_lookup(body: &str) -> Result<Option<String>> {
    let response: LookupResponse = serde_json::from_str(body)?;
    if !response.ok {
        return api_failure(response.error);
    }
    Ok(response
        .user
        .map(|user| user.id)
        .filter(|id| !id.trim().is_empty()))
}

pub(crate) fn parse_profile(body: &str) -> Result<Option<RawProfile>> {
    let response: ProfileResponse = serde_json::from_str(body)?;
    if !response.ok {
        return api_failure(response.error);
    }
    Ok(response.profile.map(into_raw_profile))
}

fn api_failure<T>(error: Option<String>) -> Result<Option<T>> {
    match error {
        Some(code) if NOT_FOUND_ERRORS.contains(&code.as_str()) => Ok(None),
        Some(code) => Err(DirectoryError::Api(code)),
        None => Err(DirectoryError::Api("unknown error".to_string())),
    }
}

fn into_raw_profile(profile: SlackProfile) -> RawProfile {
    let mut images = BTreeMap::new();
    for (key, value) in &profile.rest {
        let Some(pixels) = key
            .strip_prefix("image_")
            .and_then(|raw| raw.parse::<u32>().ok())
        else {
            continue;
        };
        let size = ImageSize::from_pixels(pixels);
        if size.pixels() != pixels {
            continue;
        }
        if let Some(url) = value.as_str() {
            images.insert(size, url.to_string());
        }
    }

    // Slack sends `[]` instead of `{}` for profiles without custom fields.
    let mut fields = HashMap::new();
    if let Value::Object(entries) = &profile.fields {
        for (id, field) in entries {
            if let Some(value) = field.get("value").and_then(Value::as_str) {
                fields.insert(id.clone(), value.to_string());
            }
        }
    }

    RawProfile {
        real_name: profile.real_name_normalized,
        display_name: profile.display_name_normalized,
        images,
        fields,
    }
}
