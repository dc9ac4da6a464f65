use anyhow::{anyhow, Result};
use badgesheet_directory::{assemble_with_report, SkipReason};

use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};

#[derive(Debug, clap::Args)]
pub struct LookupArgs {
    /// Emails to resolve, in output order
    #[arg(required = true)]
    pub emails: Vec<String>,
}

pub fn lookup(ctx: &Context<'_>, args: LookupArgs) -> Result<()> {
    if args.emails.iter().all(|email| email.trim().is_empty()) {
        return Err(invalid_input("no emails given"));
    }

    let assembly = ctx.assembly_context()?;
    let runtime = ctx.runtime()?;
    let report = runtime.block_on(assemble_with_report(&assembly, &args.emails));

    if ctx.json {
        print_json(&report)?;
    } else {
        for record in &report.records {
            let mut header = record.name.clone();
            if !record.handle.is_empty() {
                header.push_str("  ");
                header.push_str(&record.handle);
            }
            if !record.pronouns.is_empty() {
                header.push_str(&format!("  ({})", record.pronouns));
            }
            println!("{header}");
            for (name, value) in record.fields.iter() {
                if !value.is_empty() {
                    println!("  {name}: {value}");
                }
            }
            if let Some(avatar) = &record.avatar {
                println!("  avatar: {}", avatar.display());
            }
        }
        for skipped in &report.skipped {
            eprintln!("skipped {}: {}", skipped.email, skipped.reason);
        }
    }

    if report.records.is_empty() {
        let failed = report
            .skipped
            .iter()
            .find_map(|skipped| match &skipped.reason {
                SkipReason::LookupFailed(detail) => Some(detail),
                _ => None,
            });
        if let Some(detail) = failed {
            return Err(anyhow!("directory lookups failed: {detail}"));
        }
        return Err(not_found("no email resolved to a directory profile"));
    }
    Ok(())
}
