use anyhow::{Context as _, Result};
use badgesheet_config::AppConfig;
use badgesheet_directory::{AssemblyContext, AvatarDownloader, SlackDirectory};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::error::invalid_input;

pub mod build;
pub mod completions;
pub mod lookup;
pub mod templates;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn runtime(&self) -> Result<Runtime> {
        Runtime::new().with_context(|| "start async runtime")
    }

    /// Wires the Slack client and avatar downloader from config.
    pub fn assembly_context(&self) -> Result<AssemblyContext> {
        let directory = &self.config.directory;
        let token = directory.resolve_token().ok_or_else(|| {
            invalid_input(format!(
                "no directory token: set directory.token or ${}",
                directory.token_env
            ))
        })?;
        let client = SlackDirectory::http_client(Duration::from_secs(directory.timeout_secs))
            .with_context(|| "build http client")?;
        let slack = SlackDirectory::new(client.clone(), &directory.api_base, token)
            .with_context(|| format!("invalid directory.api_base {}", directory.api_base))?;
        let avatars = AvatarDownloader::new(client, self.config.output.images_dir.clone());

        Ok(AssemblyContext {
            directory: Arc::new(slack),
            avatars: Arc::new(avatars),
            selection: Arc::new(self.config.selection.clone()),
            domain_aliases: directory.domain_aliases.clone(),
            concurrency: directory.concurrency,
        })
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
