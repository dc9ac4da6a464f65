#![allow(dead_code)]

use async_trait::async_trait;
use badgesheet_core::{DomainAliases, FieldSelection, ImageSize, RawProfile};
use badgesheet_directory::{
    AssemblyContext, AvatarSource, DirectoryError, DirectoryService, Result,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PRONOUN_FIELD: &str = "Xf234CDEFG5H";
pub const TITLE_FIELD: &str = "Xf012ABCDE3F";
pub const HERD_FIELD: &str = "Xf123BCDEF4G";
pub const TEAM_FIELD: &str = "Xf345DEFGH6I";

/// In-memory directory keyed the way the real one is: some people only under
/// one of the two organisational domains.
#[derive(Default)]
pub struct FakeDirectory {
    users: HashMap<String, String>,
    profiles: HashMap<String, RawProfile>,
    failing_emails: Vec<String>,
    panicking_emails: Vec<String>,
    delays: HashMap<String, u64>,
    pub lookups: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeDirectory {
    pub fn standard() -> Self {
        let mut directory = FakeDirectory::default();
        directory.add_user("dosinski@fearless.tech", "A12BC3DEF");
        directory.add_user("tmccullough@fearsol.com", "E56FG7HIJ");
        directory.add_user("mpollich@email.com", "F67GH8IJK");
        directory.add_user("amorar@fearless.tech", "J01KL2MNO");
        directory.add_user("noprofile@email.com", "Z99ZZ9ZZZ");

        directory.add_profile(
            "A12BC3DEF",
            "Dominick Osinski",
            "dosinski",
            &[
                (TITLE_FIELD, "Software Engineer"),
                (HERD_FIELD, "Engineer Herd"),
                (PRONOUN_FIELD, "He/Him"),
                (TEAM_FIELD, "A Team"),
            ],
        );
        directory.add_profile(
            "E56FG7HIJ",
            "Tracy McCullough (She/Her)",
            "tmccullough",
            &[(TITLE_FIELD, "Operations Assistant")],
        );
        directory.add_profile(
            "F67GH8IJK",
            "May Pollich",
            "mpollich (she/her)",
            &[(TITLE_FIELD, "Operations Manager")],
        );
        directory.add_profile(
            "J01KL2MNO",
            "Angelica Morar (OOO til 5/11)",
            "amorar",
            &[(TITLE_FIELD, "Software Engineer"), (PRONOUN_FIELD, "she/her")],
        );
        directory
    }

    pub fn add_user(&mut self, email: &str, id: &str) {
        self.users.insert(email.to_string(), id.to_string());
    }

    pub fn add_profile(&mut self, id: &str, real_name: &str, display: &str, fields: &[(&str, &str)]) {
        let mut profile = RawProfile {
            real_name: Some(real_name.to_string()),
            display_name: Some(display.to_string()),
            ..RawProfile::default()
        };
        for (field, value) in fields {
            profile.fields.insert(field.to_string(), value.to_string());
        }
        for size in [ImageSize::Px72, ImageSize::Px192] {
            profile.images.insert(
                size,
                format!("https://avatars.slack-edge.com/{id}_{}.jpg", size.pixels()),
            );
        }
        self.profiles.insert(id.to_string(), profile);
    }

    pub fn fail_on(mut self, email: &str) -> Self {
        self.failing_emails.push(email.to_string());
        self
    }

    pub fn panic_on(mut self, email: &str) -> Self {
        self.panicking_emails.push(email.to_string());
        self
    }

    pub fn delay(mut self, email: &str, millis: u64) -> Self {
        self.delays.insert(email.to_string(), millis);
        self
    }

    pub fn lookup_log(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectoryService for FakeDirectory {
    fn source_name(&self) -> &'static str {
        "fake"
    }

    async fn find_user_id(&self, email: &str) -> Result<Option<String>> {
        self.lookups.lock().unwrap().push(email.to_string());
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let millis = self.delays.get(email).copied().unwrap_or(5);
        tokio::time::sleep(Duration::from_millis(millis)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panicking_emails.iter().any(|e| e == email) {
            panic!("directory exploded for {email}");
        }
        if self.failing_emails.iter().any(|e| e == email) {
            return Err(DirectoryError::Api("ratelimited".to_string()));
        }
        Ok(self.users.get(email).cloned())
    }

    async fn profile(&self, user_id: &str) -> Result<Option<RawProfile>> {
        Ok(self.profiles.get(user_id).cloned())
    }
}

/// Pretends to store every avatar under `images/<file name>`.
#[derive(Default)]
pub struct FakeAvatars {
    broken_urls: Vec<String>,
}

impl FakeAvatars {
    pub fn broken(urls: &[&str]) -> Self {
        Self {
            broken_urls: urls.iter().map(|url| url.to_string()).collect(),
        }
    }
}

#[async_trait]
impl AvatarSource for FakeAvatars {
    async fn acquire(&self, url: &str, _size: ImageSize) -> Option<PathBuf> {
        if self.broken_urls.iter().any(|broken| broken == url) {
            return None;
        }
        let name = url.rsplit('/').next()?;
        Some(PathBuf::from("images").join(name.replace(".jpg", ".png")))
    }
}

pub fn selection() -> FieldSelection {
    FieldSelection::new(Some(PRONOUN_FIELD.to_string()), ImageSize::Px192)
        .with_field("title", TITLE_FIELD)
        .and_then(|s| s.with_field("herd", HERD_FIELD))
        .and_then(|s| s.with_field("teams", TEAM_FIELD))
        .expect("selection")
}

pub fn aliases() -> DomainAliases {
    DomainAliases::new("fearless.tech", "fearsol.com").expect("aliases")
}

pub fn context(directory: Arc<FakeDirectory>, avatars: FakeAvatars) -> AssemblyContext {
    AssemblyContext {
        directory,
        avatars: Arc::new(avatars),
        selection: Arc::new(selection()),
        domain_aliases: Some(aliases()),
        concurrency: 8,
    }
}

pub fn emails(list: &[&str]) -> Vec<String> {
    list.iter().map(|email| email.to_string()).collect()
}
